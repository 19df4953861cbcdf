// ============================================
// Isoterra - Стриминг бесконечного воксельного terrain
// ============================================
// Marching cubes выполняется на внешнем параллельном исполнителе (GPU),
// здесь живёт вся CPU-сторона:
// - ChunkIndex: жизненный цикл чанков вокруг наблюдателя (пул + переработка)
// - LodSelector: дискретные уровни детализации по дистанции
// - DensityFieldBuilder: шум + биомы + терраформинг -> скалярный объём
// - MeshExtractionScheduler: асинхронный трёхстадийный конвейер извлечения
// - TerrainSystem: покадровый оркестратор

pub mod assets;
pub mod biomes;
pub mod chunk;
pub mod config;
pub mod culling;
pub mod density;
pub mod index;
pub mod kernel;
pub mod lod;
pub mod mesh;
pub mod noise;
pub mod scheduler;
pub mod system;
pub mod terraform;

// Реэкспорт основных типов
pub use assets::AssetPlacer;
pub use chunk::{Chunk, ChunkId};
pub use config::{ConfigError, TerrainConfig};
pub use density::{DensityFieldBuilder, DensityFieldRequest, ScalarVolume};
pub use index::ChunkIndex;
pub use kernel::{CellClassification, IsosurfaceKernel, KernelError};
pub use lod::{DetailLevel, LodChoice, LodSelector};
pub use mesh::MeshArtifact;
pub use scheduler::MeshExtractionScheduler;
pub use system::TerrainSystem;
pub use terraform::{TerraformKind, TerraformPoint, TerraformStore};
