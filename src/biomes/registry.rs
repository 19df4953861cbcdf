// ============================================
// Biome Registry - Реестр биомов
// ============================================

use std::path::Path;
use std::sync::OnceLock;

use super::types::*;

/// Реестр всех биомов
#[derive(Clone, Debug)]
pub struct BiomeRegistry {
    biomes: Vec<BiomeDefinition>,
}

/// Базовая октавная таблица из исходного генератора плотности
fn base_octaves() -> Vec<NoiseOctave> {
    vec![
        NoiseOctave::new(0.09, 1.0),
        NoiseOctave::new(0.042, 3.94),
        NoiseOctave::new(0.022, 11.34),
        NoiseOctave::new(0.009, 21.4),
        NoiseOctave::new(0.0047, 68.0),
        NoiseOctave::new(0.0022, 123.0),
    ]
}

impl BiomeRegistry {
    pub fn new() -> Self {
        let mut registry = Self { biomes: Vec::new() };
        registry.register_default_biomes();
        registry
    }

    fn register_default_biomes(&mut self) {
        // Острова - пологий terrain с крупными перепадами
        self.register(
            BiomeDefinition::new(BIOME_ISLAND, "island", base_octaves())
                .with_surface(20.0, 1.0),
        );

        // Дюны - сглаженные низкочастотные волны
        self.register(
            BiomeDefinition::new(
                BIOME_DUNES,
                "dunes",
                vec![
                    NoiseOctave::new(0.03, 6.0),
                    NoiseOctave::new(0.011, 24.0),
                    NoiseOctave::new(0.0045, 52.0),
                ],
            )
            .with_surface(24.0, 1.3),
        );

        // Горы - сильные высокоамплитудные октавы, нависания от 3D шума
        self.register(
            BiomeDefinition::new(
                BIOME_MOUNTAINS,
                "mountains",
                vec![
                    NoiseOctave::new(0.09, 2.0),
                    NoiseOctave::new(0.03, 16.0),
                    NoiseOctave::new(0.012, 48.0),
                    NoiseOctave::new(0.005, 110.0),
                    NoiseOctave::new(0.0021, 190.0),
                ],
            )
            .with_surface(12.0, 0.8),
        );

        // Скалистый океан - низкое дно с резкими пиками
        self.register(
            BiomeDefinition::new(
                BIOME_ROCK_OCEAN,
                "rock_ocean",
                vec![
                    NoiseOctave::new(0.07, 4.0),
                    NoiseOctave::new(0.02, 30.0),
                    NoiseOctave::new(0.006, 90.0),
                ],
            )
            .with_surface(-10.0, 1.1),
        );
    }

    pub fn register(&mut self, biome: BiomeDefinition) {
        let id = biome.id as usize;
        if id >= self.biomes.len() {
            self.biomes.resize(id + 1, biome.clone());
        }
        self.biomes[id] = biome;
    }

    /// Загрузить биомы из JSON (массив определений)
    pub fn load_from_json(&mut self, json: &str) -> Result<usize, String> {
        let defs: Vec<BiomeDefinition> =
            serde_json::from_str(json).map_err(|e| format!("biome JSON parse error: {}", e))?;
        let count = defs.len();
        for def in defs {
            self.register(def);
        }
        Ok(count)
    }

    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, String> {
        let json = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("cannot read {}: {}", path.as_ref().display(), e))?;
        self.load_from_json(&json)
    }

    #[inline]
    pub fn get(&self, id: BiomeId) -> &BiomeDefinition {
        self.biomes.get(id as usize).unwrap_or(&self.biomes[0])
    }

    pub fn count(&self) -> usize {
        self.biomes.len()
    }
}

impl Default for BiomeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static BIOME_REGISTRY: OnceLock<BiomeRegistry> = OnceLock::new();

pub fn biome_registry() -> &'static BiomeRegistry {
    BIOME_REGISTRY.get_or_init(BiomeRegistry::new)
}
