// ============================================
// Chunk - Чанк terrain и его идентификатор
// ============================================

use std::sync::Arc;

use ultraviolet::{Vec2, Vec3};

use crate::mesh::MeshArtifact;

/// Координата чанка на стриминговой сетке: (chunk_x, chunk_z)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ChunkId {
    pub x: i32,
    pub z: i32,
}

impl ChunkId {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Мировое начало чанка (в мировых единицах)
    pub fn world_origin(&self, chunk_size: f32, world_scale: f32) -> Vec3 {
        Vec3::new(
            self.x as f32 * chunk_size * world_scale,
            0.0,
            self.z as f32 * chunk_size * world_scale,
        )
    }

    /// Центр чанка в единицах сетки (позиция наблюдателя уже поделена на scale)
    pub fn grid_center(&self, chunk_size: f32) -> Vec2 {
        Vec2::new(
            self.x as f32 * chunk_size + chunk_size * 0.5,
            self.z as f32 * chunk_size + chunk_size * 0.5,
        )
    }

    /// Квадрат планарной дистанции от наблюдателя до центра чанка
    pub fn sqr_distance_from(&self, viewer: Vec2, chunk_size: f32) -> f32 {
        (viewer - self.grid_center(chunk_size)).mag_sq()
    }
}

/// Живой чанк. Экземпляры переиспользуются через пул: при переработке
/// все поля перезаписываются, а generation растёт, чтобы устаревшие
/// асинхронные результаты можно было отличить и отбросить.
#[derive(Debug)]
pub struct Chunk {
    pub id: ChunkId,
    pub generation: u64,
    pub lod_step: u32,
    pub origin: Vec3,
    pub mesh: Option<Arc<MeshArtifact>>,
    pub place_assets: bool,
    pub has_collision: bool,
}

impl Chunk {
    pub fn new(id: ChunkId, generation: u64, lod_step: u32, origin: Vec3, place_assets: bool) -> Self {
        Self {
            id,
            generation,
            lod_step,
            origin,
            mesh: None,
            place_assets,
            has_collision: false,
        }
    }

    /// Переиспользовать экземпляр из пула под новую координату.
    /// Перезаписывает все поля целиком.
    pub fn recycle(&mut self, id: ChunkId, generation: u64, lod_step: u32, origin: Vec3, place_assets: bool) {
        self.id = id;
        self.generation = generation;
        self.lod_step = lod_step;
        self.origin = origin;
        self.mesh = None;
        self.place_assets = place_assets;
        self.has_collision = false;
    }

    /// Чанк отрисовываемый: меш привязан (пустой меш тоже считается)
    pub fn is_renderable(&self) -> bool {
        self.mesh.is_some()
    }
}
