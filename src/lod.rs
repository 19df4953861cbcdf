// ============================================
// LOD Selector - Уровни детализации по дистанции
// ============================================

/// Уровень детализации: шаг сетки и максимальная дистанция действия.
/// Последний уровень таблицы задаёт общий радиус обзора.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetailLevel {
    /// Шаг выборки плотностного поля (1 = полная детализация)
    pub step: u32,
    /// Дистанция (в единицах сетки), до которой действует уровень
    pub max_distance: f32,
}

impl DetailLevel {
    pub const fn new(step: u32, max_distance: f32) -> Self {
        Self { step, max_distance }
    }
}

/// Результат выбора LOD для чанка
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LodChoice {
    pub step: u32,
    /// Самый детальный уровень: только на нём размещаются ассеты
    pub is_finest: bool,
}

/// Селектор LOD: сканирует таблицу по возрастанию дистанции.
/// Квадраты дистанций предвычислены, сравнение без sqrt.
#[derive(Clone, Debug)]
pub struct LodSelector {
    steps: Vec<u32>,
    sqr_distances: Vec<f32>,
}

impl LodSelector {
    /// Таблица должна быть провалидирована через TerrainConfig::validate
    pub fn new(levels: &[DetailLevel]) -> Self {
        Self {
            steps: levels.iter().map(|l| l.step).collect(),
            sqr_distances: levels.iter().map(|l| l.max_distance * l.max_distance).collect(),
        }
    }

    /// Первый уровень, чей max_distance^2 превышает дистанцию кандидата;
    /// иначе - самый грубый (последний)
    pub fn select(&self, sqr_distance: f32) -> LodChoice {
        for (i, &sqr_max) in self.sqr_distances.iter().enumerate() {
            if sqr_distance < sqr_max {
                return LodChoice { step: self.steps[i], is_finest: i == 0 };
            }
        }
        LodChoice {
            step: *self.steps.last().unwrap_or(&1),
            is_finest: self.steps.len() <= 1,
        }
    }

    /// Квадрат радиуса обзора (последний уровень таблицы)
    pub fn sqr_view_distance(&self) -> f32 {
        *self.sqr_distances.last().unwrap_or(&0.0)
    }

    pub fn view_distance(&self) -> f32 {
        self.sqr_view_distance().sqrt()
    }

    pub fn level_count(&self) -> usize {
        self.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_table() -> LodSelector {
        LodSelector::new(&[DetailLevel::new(1, 50.0), DetailLevel::new(2, 100.0)])
    }

    #[test]
    fn test_scenario_distances() {
        let lod = scenario_table();
        // Дистанция 30 -> шаг 1 (самый детальный)
        let near = lod.select(30.0 * 30.0);
        assert_eq!(near.step, 1);
        assert!(near.is_finest);
        // Дистанция 80 -> шаг 2
        let mid = lod.select(80.0 * 80.0);
        assert_eq!(mid.step, 2);
        assert!(!mid.is_finest);
        // Дистанция 150 за радиусом обзора - чанк вообще не материализуется,
        // но селектор обязан вернуть самый грубый шаг
        assert_eq!(lod.select(150.0 * 150.0).step, 2);
    }

    #[test]
    fn test_monotonic_in_distance() {
        let lod = LodSelector::new(&[
            DetailLevel::new(1, 50.0),
            DetailLevel::new(2, 100.0),
            DetailLevel::new(4, 200.0),
            DetailLevel::new(8, 400.0),
        ]);
        let mut prev = 0;
        for d in (0..450).step_by(5) {
            let step = lod.select((d * d) as f32).step;
            assert!(step >= prev, "step decreased at distance {}", d);
            prev = step;
        }
    }

    #[test]
    fn test_view_distance_is_last_entry() {
        let lod = scenario_table();
        assert_eq!(lod.sqr_view_distance(), 100.0 * 100.0);
    }
}
