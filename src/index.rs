// ============================================
// Chunk Index - Жизненный цикл чанков вокруг наблюдателя
// ============================================
// Владеет множеством живых чанков по ChunkId: материализует, перерабатывает
// через пул и вытесняет при каждом пересечении порога движения наблюдателя.
// Дистанционное и frustum-отсечение выполняются здесь же.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use ultraviolet::{Vec2, Vec3};

use crate::chunk::{Chunk, ChunkId};
use crate::config::TerrainConfig;
use crate::culling::is_aabb_visible;
use crate::lod::LodSelector;
use crate::mesh::MeshArtifact;
use crate::scheduler::MeshExtractionScheduler;

/// Вертикальный охват чанка в длинах стороны (три вертикальные секции)
const VERTICAL_SECTIONS: f32 = 3.0;

/// Компаньон чанка: водная плоскость на фиксированной высоте.
/// Вытесняется и перерабатывается в ногу со своим чанком.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaterSheet {
    pub origin: Vec3,
    pub side: f32,
}

/// Индекс живых чанков
pub struct ChunkIndex {
    chunks: HashMap<ChunkId, Chunk>,
    recyclable: VecDeque<Chunk>,
    waters: HashMap<ChunkId, WaterSheet>,
    recyclable_waters: VecDeque<WaterSheet>,
    /// Счётчик поколений: каждый материализованный чанк получает новое,
    /// чтобы отличать устаревшие асинхронные результаты
    next_generation: u64,

    chunk_size: f32,
    world_scale: f32,
    sea_height: f32,
    sqr_view_distance: f32,
    chunks_in_view: i32,
    place_assets_enabled: bool,
}

impl ChunkIndex {
    pub fn new(config: &TerrainConfig, lod: &LodSelector) -> Self {
        let chunk_size = config.chunk_size as f32;
        Self {
            chunks: HashMap::new(),
            recyclable: VecDeque::new(),
            waters: HashMap::new(),
            recyclable_waters: VecDeque::new(),
            next_generation: 0,
            chunk_size,
            world_scale: config.world_scale,
            sea_height: config.sea_height,
            sqr_view_distance: lod.sqr_view_distance(),
            chunks_in_view: (lod.view_distance() / chunk_size).ceil() as i32,
            place_assets_enabled: config.place_assets,
        }
    }

    /// Пересчитать видимый набор чанков. Вызывается оркестратором только
    /// после того, как наблюдатель сместился за порог (гистерезис).
    /// Порядок обхода окна кандидатов стабильный (row-major), поэтому
    /// порядок очереди извлечения воспроизводим.
    pub fn update_visible_chunks(
        &mut self,
        viewer: Vec2,
        planes: &[[f32; 4]; 6],
        lod: &LodSelector,
        scheduler: &mut MeshExtractionScheduler,
    ) {
        // 1. Вытеснение чанков за радиусом обзора
        let evicted: Vec<ChunkId> = self
            .chunks
            .keys()
            .filter(|id| id.sqr_distance_from(viewer, self.chunk_size) > self.sqr_view_distance)
            .copied()
            .collect();
        for id in evicted {
            if let Some(mut chunk) = self.chunks.remove(&id) {
                // Меш и коллизия освобождаются сразу при выходе из обзора,
                // а не при переиспользовании экземпляра
                chunk.mesh = None;
                chunk.has_collision = false;
                self.recyclable.push_back(chunk);
            }
            if let Some(water) = self.waters.remove(&id) {
                self.recyclable_waters.push_back(water);
            }
        }

        // 2. Окно кандидатов вокруг округлённой координаты наблюдателя
        let current_x = (viewer.x / self.chunk_size).round() as i32;
        let current_z = (viewer.y / self.chunk_size).round() as i32;
        let n = self.chunks_in_view;

        for dz in -n..=n {
            for dx in -n..=n {
                let id = ChunkId::new(current_x + dx, current_z + dz);
                let sqr_dist = id.sqr_distance_from(viewer, self.chunk_size);

                if let Some(chunk) = self.chunks.get_mut(&id) {
                    // 4. Уже в индексе: пересмотр LOD
                    let choice = lod.select(sqr_dist);
                    let place = choice.is_finest && self.place_assets_enabled;
                    if chunk.lod_step != choice.step {
                        chunk.lod_step = choice.step;
                        chunk.place_assets = place;
                        scheduler.enqueue(id, chunk.generation);
                    } else if chunk.place_assets != place {
                        // Сменился только флаг ассетов: меш не переизвлекаем
                        chunk.place_assets = place;
                    }
                    continue;
                }

                // 3. Кандидат не в индексе: дистанция + frustum
                if sqr_dist >= self.sqr_view_distance {
                    continue;
                }
                let (min, max) = self.chunk_bounds(id);
                if !is_aabb_visible(planes, min, max) {
                    continue;
                }

                let choice = lod.select(sqr_dist);
                let place = choice.is_finest && self.place_assets_enabled;
                let generation = self.next_generation();
                let origin = id.world_origin(self.chunk_size, self.world_scale);

                let chunk = match self.recyclable.pop_front() {
                    Some(mut recycled) => {
                        recycled.recycle(id, generation, choice.step, origin, place);
                        recycled
                    }
                    None => Chunk::new(id, generation, choice.step, origin, place),
                };
                self.chunks.insert(id, chunk);

                // Компаньон-вода: переиспользуем из пула, если есть
                let water = match self.recyclable_waters.pop_front() {
                    Some(mut recycled) => {
                        recycled.origin = self.water_origin(id);
                        recycled.side = self.chunk_size * self.world_scale;
                        recycled
                    }
                    None => WaterSheet {
                        origin: self.water_origin(id),
                        side: self.chunk_size * self.world_scale,
                    },
                };
                self.waters.insert(id, water);

                scheduler.enqueue(id, generation);
            }
        }
    }

    /// Привязать готовый меш. Возвращает None, если чанк вытеснен или
    /// переработан (устаревший результат отбрасывается молча).
    pub fn attach_mesh(
        &mut self,
        id: ChunkId,
        generation: u64,
        artifact: Arc<MeshArtifact>,
    ) -> Option<&Chunk> {
        match self.chunks.get_mut(&id) {
            Some(chunk) if chunk.generation == generation => {
                chunk.has_collision = chunk.place_assets && !artifact.is_empty();
                chunk.mesh = Some(artifact);
                Some(&*chunk)
            }
            _ => {
                log::debug!(
                    "stale mesh result dropped: chunk ({}, {}) generation {}",
                    id.x,
                    id.z,
                    generation
                );
                None
            }
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    /// AABB чанка в мировых координатах
    fn chunk_bounds(&self, id: ChunkId) -> (Vec3, Vec3) {
        let len = self.chunk_size * self.world_scale;
        let min = id.world_origin(self.chunk_size, self.world_scale);
        let max = min + Vec3::new(len, len * VERTICAL_SECTIONS, len);
        (min, max)
    }

    /// Центр водной плоскости чанка на высоте моря
    fn water_origin(&self, id: ChunkId) -> Vec3 {
        let len = self.chunk_size * self.world_scale;
        id.world_origin(self.chunk_size, self.world_scale)
            + Vec3::new(len * 0.5, self.sea_height, len * 0.5)
    }

    pub fn get(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks.get(&id)
    }

    pub fn water(&self, id: ChunkId) -> Option<&WaterSheet> {
        self.waters.get(&id)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn pool_len(&self) -> usize {
        self.recyclable.len()
    }

    pub fn chunk_world_length(&self) -> f32 {
        self.chunk_size * self.world_scale
    }
}
