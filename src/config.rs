// ============================================
// Terrain Config - Конфигурация системы
// ============================================
// Все константы читаются при старте и неизменны в течение сессии.
// Некорректная конфигурация фатальна: лучше упасть сразу, чем получить
// неопределённое поведение выбора LOD.

use std::fmt;

use crate::lod::DetailLevel;

/// Ошибки валидации конфигурации
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    EmptyDetailLevels,
    /// max_distance таблицы LOD обязан строго возрастать
    NonIncreasingDistance { index: usize },
    /// Шаг LOD не может быть нулевым
    ZeroLodStep { index: usize },
    ZeroChunkSize,
    NonPositiveWorldScale,
    NonPositiveTerraformRadius,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyDetailLevels => write!(f, "detail level table is empty"),
            ConfigError::NonIncreasingDistance { index } => {
                write!(f, "detail level {} does not increase max_distance", index)
            }
            ConfigError::ZeroLodStep { index } => write!(f, "detail level {} has step 0", index),
            ConfigError::ZeroChunkSize => write!(f, "chunk grid size is 0"),
            ConfigError::NonPositiveWorldScale => write!(f, "world scale must be positive"),
            ConfigError::NonPositiveTerraformRadius => {
                write!(f, "terraform influence radius must be positive")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Конфигурация terrain. Дистанции задаются в единицах сетки
/// (мировые координаты, поделённые на world_scale).
#[derive(Clone, Debug)]
pub struct TerrainConfig {
    /// Глобальный seed генерации
    pub seed: u64,
    /// Ячеек по стороне чанка при LOD шаге 1
    pub chunk_size: u32,
    /// Мировой масштаб одной ячейки сетки
    pub world_scale: f32,
    /// Изоуровень поверхности для marching cubes
    pub surface_level: f32,
    /// Таблица LOD, по возрастанию дистанции
    pub detail_levels: Vec<DetailLevel>,
    /// Порог смещения наблюдателя, после которого пересчитывается
    /// видимый набор чанков (гистерезис против покадрового трэша)
    pub move_threshold: f32,
    /// Общий радиус влияния точки терраформинга
    pub terraform_radius: f32,
    /// Сторона региона биома (в единицах сетки)
    pub biome_region_size: f32,
    /// Высота водной плоскости-компаньона
    pub sea_height: f32,
    /// Размещать ли ассеты на чанках самого детального уровня
    pub place_assets: bool,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 26,
            chunk_size: 102,
            world_scale: 1.0,
            surface_level: 10.0,
            detail_levels: vec![
                DetailLevel::new(1, 200.0),
                DetailLevel::new(2, 400.0),
                DetailLevel::new(4, 700.0),
                DetailLevel::new(8, 1000.0),
            ],
            move_threshold: 10.0,
            terraform_radius: 8.0,
            biome_region_size: 2040.0,
            sea_height: 127.5,
            place_assets: true,
        }
    }
}

impl TerrainConfig {
    /// Фатальная проверка при старте
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.detail_levels.is_empty() {
            return Err(ConfigError::EmptyDetailLevels);
        }
        let mut prev = 0.0f32;
        for (i, level) in self.detail_levels.iter().enumerate() {
            if level.step == 0 {
                return Err(ConfigError::ZeroLodStep { index: i });
            }
            if level.max_distance <= prev {
                return Err(ConfigError::NonIncreasingDistance { index: i });
            }
            prev = level.max_distance;
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.world_scale <= 0.0 {
            return Err(ConfigError::NonPositiveWorldScale);
        }
        if self.terraform_radius <= 0.0 {
            return Err(ConfigError::NonPositiveTerraformRadius);
        }
        Ok(())
    }

    /// Мировая длина стороны чанка
    pub fn chunk_world_length(&self) -> f32 {
        self.chunk_size as f32 * self.world_scale
    }

    /// Квадрат порога смещения наблюдателя
    pub fn sqr_move_threshold(&self) -> f32 {
        self.move_threshold * self.move_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(TerrainConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_table_rejected() {
        let mut config = TerrainConfig::default();
        config.detail_levels.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyDetailLevels));
    }

    #[test]
    fn test_non_increasing_distance_rejected() {
        let mut config = TerrainConfig::default();
        config.detail_levels = vec![DetailLevel::new(1, 100.0), DetailLevel::new(2, 100.0)];
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonIncreasingDistance { index: 1 })
        );
    }

    #[test]
    fn test_zero_step_rejected() {
        let mut config = TerrainConfig::default();
        config.detail_levels = vec![DetailLevel::new(0, 100.0)];
        assert_eq!(config.validate(), Err(ConfigError::ZeroLodStep { index: 0 }));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let mut config = TerrainConfig::default();
        config.chunk_size = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroChunkSize));
    }
}
