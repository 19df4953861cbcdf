// ============================================
// Biome Types - Типы биомов
// ============================================

use serde::{Deserialize, Serialize};

/// ID биома
pub type BiomeId = u8;

pub const BIOME_ISLAND: BiomeId = 0;
pub const BIOME_DUNES: BiomeId = 1;
pub const BIOME_MOUNTAINS: BiomeId = 2;
pub const BIOME_ROCK_OCEAN: BiomeId = 3;

/// Октава шума: пара (частота, амплитуда)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseOctave {
    pub frequency: f32,
    pub amplitude: f32,
}

impl NoiseOctave {
    pub const fn new(frequency: f32, amplitude: f32) -> Self {
        Self { frequency, amplitude }
    }
}

/// Определение биома. Формула накопления плотности - данные, не код:
/// density = (base_height - y) * height_weight + sum(amp_i * noise(p * freq_i))
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BiomeDefinition {
    pub id: BiomeId,
    pub name: String,
    /// Октавы мультиоктавного шума, порядок значим для смещений
    pub octaves: Vec<NoiseOctave>,
    /// Базовая высота поверхности
    pub base_height: f32,
    /// Вес вертикального градиента (крутизна перехода воздух/грунт)
    pub height_weight: f32,
}

impl BiomeDefinition {
    pub fn new(id: BiomeId, name: &str, octaves: Vec<NoiseOctave>) -> Self {
        Self {
            id,
            name: name.to_string(),
            octaves,
            base_height: 20.0,
            height_weight: 1.0,
        }
    }

    pub fn with_surface(mut self, base_height: f32, height_weight: f32) -> Self {
        self.base_height = base_height;
        self.height_weight = height_weight;
        self
    }
}
