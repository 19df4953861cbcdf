// ============================================
// Asset Placer - Внешний разбрасыватель ассетов
// ============================================
// Рейкасты по готовому мешу и сам скаттеринг живут снаружи;
// планировщик дергает этот трейт для чанков самого детального LOD
// с непустым мешем.

use ultraviolet::Vec3;

pub trait AssetPlacer {
    /// Разместить ассеты на чанке: мировое начало и мировая длина стороны
    fn place_assets(&mut self, chunk_origin: Vec3, chunk_world_length: f32);
}
