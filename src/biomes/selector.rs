// ============================================
// Biome Selector - Выбор биома по региону
// ============================================

use ultraviolet::Vec2;

use crate::noise::{white_noise, NoiseField};

use super::registry::{biome_registry, BiomeRegistry};
use super::types::{BiomeDefinition, BiomeId};

/// Селектор биомов: хеширует планарную координату региона через
/// white noise и делит [0,1) на равные корзины по числу биомов
#[derive(Clone, Debug)]
pub struct BiomeSelector {
    registry: BiomeRegistry,
    noise: NoiseField,
    region_size: f32,
}

impl BiomeSelector {
    pub fn new(seed: u64, region_size: f32) -> Self {
        Self {
            registry: biome_registry().clone(),
            noise: NoiseField::new(seed),
            region_size,
        }
    }

    /// Селектор с собственным реестром (для тестов и data-driven миров)
    pub fn with_registry(registry: BiomeRegistry, seed: u64, region_size: f32) -> Self {
        Self {
            registry,
            noise: NoiseField::new(seed),
            region_size,
        }
    }

    /// Биом для мировой планарной координаты
    #[inline]
    pub fn select(&self, origin: Vec2) -> BiomeId {
        let coord = Vec2::new(
            (origin.x / self.region_size).floor() + self.noise.seed_jitter(0) as f32,
            (origin.y / self.region_size).floor() + self.noise.seed_jitter(1) as f32,
        );
        let value = white_noise(coord).clamp(0.0, 1.0 - f32::EPSILON);
        let bucket = (value * self.registry.count() as f32) as usize;
        bucket.min(self.registry.count() - 1) as BiomeId
    }

    #[inline]
    pub fn definition_at(&self, origin: Vec2) -> &BiomeDefinition {
        self.registry.get(self.select(origin))
    }

    pub fn registry(&self) -> &BiomeRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_within_region() {
        let selector = BiomeSelector::new(26, 2040.0);
        // Две точки в одном регионе дают один биом
        let a = selector.select(Vec2::new(10.0, 10.0));
        let b = selector.select(Vec2::new(2000.0, 2000.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_seed_stable() {
        let a = BiomeSelector::new(26, 2040.0);
        let b = BiomeSelector::new(26, 2040.0);
        for i in -5..5 {
            let p = Vec2::new(i as f32 * 3000.0, i as f32 * -7000.0);
            assert_eq!(a.select(p), b.select(p));
        }
    }

    #[test]
    fn test_all_buckets_reachable() {
        let selector = BiomeSelector::new(26, 2040.0);
        let mut seen = [false; 4];
        for x in -40..40 {
            for z in -40..40 {
                let id = selector.select(Vec2::new(x as f32 * 2040.0, z as f32 * 2040.0));
                seen[id as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "not all biomes selected: {:?}", seen);
    }
}
