// ============================================
// Mesh Extraction Scheduler - Асинхронный конвейер извлечения
// ============================================
// Одновременно в конвейере не больше одного запроса: осознанный
// backpressure, меняющий пропускную способность на ограниченную
// GPU-нагрузку на кадр. Остальные запросы ждут в FIFO очереди.
// Состояния слота: Idle -> Requesting -> AwaitingVertices ->
// AwaitingTriangles -> Idle; Requesting схлопывается в один тик
// (классификация читает счётчики синхронно).

use std::collections::VecDeque;
use std::sync::Arc;

use crate::assets::AssetPlacer;
use crate::chunk::ChunkId;
use crate::config::TerrainConfig;
use crate::density::DensityFieldBuilder;
use crate::index::ChunkIndex;
use crate::kernel::{CellClassification, IsosurfaceKernel, VertexOutput};
use crate::mesh::MeshArtifact;
use crate::terraform::TerraformStore;

/// Запрос извлечения: чанк и его поколение на момент постановки
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshRequest {
    pub chunk: ChunkId,
    pub generation: u64,
}

/// Состояние единственного слота конвейера
enum PipelineState {
    Idle,
    AwaitingVertices {
        request: MeshRequest,
        classification: CellClassification,
    },
    AwaitingTriangles {
        request: MeshRequest,
        vertices: VertexOutput,
    },
}

/// Планировщик извлечения мешей
pub struct MeshExtractionScheduler {
    queue: VecDeque<MeshRequest>,
    state: PipelineState,
    surface_level: f32,
    chunk_world_length: f32,
}

impl MeshExtractionScheduler {
    pub fn new(config: &TerrainConfig) -> Self {
        Self {
            queue: VecDeque::new(),
            state: PipelineState::Idle,
            surface_level: config.surface_level,
            chunk_world_length: config.chunk_world_length(),
        }
    }

    /// Поставить чанк в очередь на извлечение
    pub fn enqueue(&mut self, chunk: ChunkId, generation: u64) {
        self.queue.push_back(MeshRequest { chunk, generation });
    }

    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Занят ли слот конвейера (инвариант: не больше одного запроса
    /// за пределами Idle)
    pub fn in_flight(&self) -> bool {
        !matches!(self.state, PipelineState::Idle)
    }

    /// Один тик конвейера. Никогда не блокируется: readback стадии
    /// опрашиваются и при неготовности откладываются до следующего тика.
    pub fn pump(
        &mut self,
        index: &mut ChunkIndex,
        builder: &DensityFieldBuilder,
        store: &TerraformStore,
        kernel: &mut dyn IsosurfaceKernel,
        assets: Option<&mut dyn AssetPlacer>,
    ) {
        let state = std::mem::replace(&mut self.state, PipelineState::Idle);
        self.state = match state {
            PipelineState::Idle => self.try_start(index, builder, store, kernel),

            PipelineState::AwaitingVertices { request, classification } => {
                match kernel.poll_vertices() {
                    None => PipelineState::AwaitingVertices { request, classification },
                    Some(vertices) => match kernel.emit_triangles(&classification) {
                        Ok(()) => PipelineState::AwaitingTriangles { request, vertices },
                        Err(e) => {
                            log::warn!(
                                "triangle stage failed for chunk ({}, {}): {}",
                                request.chunk.x,
                                request.chunk.z,
                                e
                            );
                            PipelineState::Idle
                        }
                    },
                }
            }

            PipelineState::AwaitingTriangles { request, vertices } => {
                match kernel.poll_triangles() {
                    None => PipelineState::AwaitingTriangles { request, vertices },
                    Some(output) => {
                        self.finalize(index, request, vertices, output.indices, assets);
                        PipelineState::Idle
                    }
                }
            }
        };
    }

    /// Попытка занять слот следующим запросом из очереди.
    /// Устаревшие запросы пропускаются без траты тика: слот достаётся
    /// первому живому запросу.
    fn try_start(
        &mut self,
        index: &mut ChunkIndex,
        builder: &DensityFieldBuilder,
        store: &TerraformStore,
        kernel: &mut dyn IsosurfaceKernel,
    ) -> PipelineState {
        while let Some(request) = self.queue.pop_front() {
            // Чанк мог быть вытеснен или переработан, пока запрос ждал в очереди
            let chunk = match index.get(request.chunk) {
                Some(chunk) if chunk.generation == request.generation => chunk,
                _ => {
                    log::debug!(
                        "queued request dropped: chunk ({}, {}) no longer live",
                        request.chunk.x,
                        request.chunk.z
                    );
                    continue;
                }
            };

            let field_request = builder.request_for(chunk, store);
            let volume = builder.build_field(&field_request);

            let classification =
                match kernel.classify_cells(&volume, field_request.lod_step, self.surface_level) {
                    Ok(classification) => classification,
                    Err(e) => {
                        log::warn!(
                            "classify failed for chunk ({}, {}): {}",
                            request.chunk.x,
                            request.chunk.z,
                            e
                        );
                        return PipelineState::Idle;
                    }
                };

            // Ноль треугольников - валидный результат: чанк существует,
            // отрисовывается пустым, стадии вершин/индексов не запускаются
            if classification.is_empty() {
                index.attach_mesh(request.chunk, request.generation, Arc::new(MeshArtifact::empty()));
                return PipelineState::Idle;
            }

            return match kernel.emit_vertices(&classification) {
                Ok(()) => PipelineState::AwaitingVertices { request, classification },
                Err(e) => {
                    log::warn!(
                        "vertex stage failed for chunk ({}, {}): {}",
                        request.chunk.x,
                        request.chunk.z,
                        e
                    );
                    PipelineState::Idle
                }
            };
        }
        PipelineState::Idle
    }

    /// Сборка артефакта и привязка к чанку-инициатору
    fn finalize(
        &self,
        index: &mut ChunkIndex,
        request: MeshRequest,
        vertices: VertexOutput,
        indices: Vec<u32>,
        assets: Option<&mut dyn AssetPlacer>,
    ) {
        let artifact = MeshArtifact {
            positions: vertices.positions,
            normals: vertices.normals,
            indices,
        };
        let non_empty = !artifact.is_empty();

        // Проверка устаревания по идентичности и поколению чанка
        if let Some(chunk) = index.attach_mesh(request.chunk, request.generation, Arc::new(artifact)) {
            if chunk.place_assets && non_empty {
                if let Some(placer) = assets {
                    placer.place_assets(chunk.origin, self.chunk_world_length);
                }
            }
        }
    }
}
