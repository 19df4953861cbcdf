// ============================================
// Biomes Module - Система биомов
// ============================================
//
// Биом выбирается low-frequency white noise хешем координаты региона:
// выход [0,1) делится на равные корзины по числу биомов.
// Каждый биом - это data-driven набор параметров плотности:
// список октав (частота, амплитуда), базовая высота и вертикальный вес.

mod registry;
mod selector;
mod types;

pub use registry::*;
pub use selector::*;
pub use types::*;
