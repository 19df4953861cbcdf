// ============================================
// Isosurface Kernel - Контракт внешнего исполнителя
// ============================================
// Трёхстадийный параллельный конвейер marching cubes живёт на внешнем
// исполнителе (GPU compute). Здесь только контракт стадий:
// 1. classify_cells: классификация ячеек, счётчики треугольников/вершин
// 2. emit_vertices: выгрузка вершин и нормалей (неблокирующий readback)
// 3. emit_triangles: выгрузка индексов (неблокирующий readback)
// Буферы аллоцируются исполнителем под размеры конкретного запроса;
// нулевое число треугольников валидно и завершает конвейер досрочно.

use std::fmt;

use crate::density::ScalarVolume;

/// Результат первой стадии: счётчики, по которым исполнитель
/// аллоцирует буферы вершин и индексов
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellClassification {
    pub triangle_count: u32,
    pub vertex_count: u32,
    /// Число непустых ячеек в append-списке случаев
    pub case_count: u32,
}

impl CellClassification {
    pub fn is_empty(&self) -> bool {
        self.triangle_count == 0
    }
}

/// Выход стадии вершин
#[derive(Clone, Debug, Default)]
pub struct VertexOutput {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
}

/// Выход стадии индексов. Длина всегда 3 * triangle_count.
#[derive(Clone, Debug, Default)]
pub struct IndexOutput {
    pub indices: Vec<u32>,
}

/// Ошибки исполнителя
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// Исполнитель не смог аллоцировать буфер под запрошенный размер
    Allocation { what: &'static str, count: u32 },
    /// Прочие ошибки backend-а
    Backend(String),
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::Allocation { what, count } => {
                write!(f, "kernel failed to allocate {} buffer for {} elements", what, count)
            }
            KernelError::Backend(msg) => write!(f, "kernel backend error: {}", msg),
        }
    }
}

impl std::error::Error for KernelError {}

/// Контракт внешнего исполнителя извлечения изоповерхности.
/// poll-методы неблокирующие: None означает "readback ещё не готов",
/// вызывающий поток никогда не ждёт GPU.
pub trait IsosurfaceKernel {
    /// Стадия 1: классификация ячеек объёма
    fn classify_cells(
        &mut self,
        volume: &ScalarVolume,
        lod_step: u32,
        surface_level: f32,
    ) -> Result<CellClassification, KernelError>;

    /// Стадия 2: запустить генерацию вершин/нормалей
    fn emit_vertices(&mut self, classification: &CellClassification) -> Result<(), KernelError>;

    /// Неблокирующий опрос readback-а вершин
    fn poll_vertices(&mut self) -> Option<VertexOutput>;

    /// Стадия 3: запустить генерацию индексов треугольников
    fn emit_triangles(&mut self, classification: &CellClassification) -> Result<(), KernelError>;

    /// Неблокирующий опрос readback-а индексов
    fn poll_triangles(&mut self) -> Option<IndexOutput>;
}

#[cfg(test)]
pub mod mock {
    //! Скриптуемый исполнитель для тестов конвейера

    use super::*;

    /// Мок исполнителя: отдаёт заранее заданную геометрию с задержкой
    /// в `latency` опросов на каждую readback-стадию
    pub struct MockKernel {
        pub triangle_count: u32,
        pub latency: u32,
        pub fail_classify: bool,
        pub fail_emit_vertices: bool,

        pub classify_calls: u32,
        pub emit_vertex_calls: u32,
        pub emit_triangle_calls: u32,

        vertex_countdown: Option<u32>,
        triangle_countdown: Option<u32>,
        pending: Option<CellClassification>,
    }

    impl MockKernel {
        pub fn new(triangle_count: u32, latency: u32) -> Self {
            Self {
                triangle_count,
                latency,
                fail_classify: false,
                fail_emit_vertices: false,
                classify_calls: 0,
                emit_vertex_calls: 0,
                emit_triangle_calls: 0,
                vertex_countdown: None,
                triangle_countdown: None,
                pending: None,
            }
        }
    }

    impl IsosurfaceKernel for MockKernel {
        fn classify_cells(
            &mut self,
            _volume: &ScalarVolume,
            _lod_step: u32,
            _surface_level: f32,
        ) -> Result<CellClassification, KernelError> {
            self.classify_calls += 1;
            if self.fail_classify {
                return Err(KernelError::Allocation { what: "cases", count: 0 });
            }
            let classification = CellClassification {
                triangle_count: self.triangle_count,
                vertex_count: self.triangle_count.min(3),
                case_count: self.triangle_count,
            };
            self.pending = Some(classification);
            Ok(classification)
        }

        fn emit_vertices(&mut self, classification: &CellClassification) -> Result<(), KernelError> {
            self.emit_vertex_calls += 1;
            if self.fail_emit_vertices {
                return Err(KernelError::Allocation {
                    what: "vertices",
                    count: classification.vertex_count,
                });
            }
            self.vertex_countdown = Some(self.latency);
            Ok(())
        }

        fn poll_vertices(&mut self) -> Option<VertexOutput> {
            match self.vertex_countdown.as_mut() {
                Some(0) => {
                    self.vertex_countdown = None;
                    let count = self.pending.map(|c| c.vertex_count).unwrap_or(0) as usize;
                    Some(VertexOutput {
                        positions: vec![[1.0, 2.0, 3.0]; count],
                        normals: vec![[0.0, 1.0, 0.0]; count],
                    })
                }
                Some(n) => {
                    *n -= 1;
                    None
                }
                None => None,
            }
        }

        fn emit_triangles(&mut self, _classification: &CellClassification) -> Result<(), KernelError> {
            self.emit_triangle_calls += 1;
            self.triangle_countdown = Some(self.latency);
            Ok(())
        }

        fn poll_triangles(&mut self) -> Option<IndexOutput> {
            match self.triangle_countdown.as_mut() {
                Some(0) => {
                    self.triangle_countdown = None;
                    let tris = self.pending.map(|c| c.triangle_count).unwrap_or(0) as usize;
                    Some(IndexOutput {
                        indices: vec![0; tris * 3],
                    })
                }
                Some(n) => {
                    *n -= 1;
                    None
                }
                None => None,
            }
        }
    }
}
