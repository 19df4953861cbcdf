// ============================================
// Mesh Artifact - Результат извлечения изоповерхности
// ============================================

/// Вершина terrain в формате, пригодном для прямой заливки в GPU буфер
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable, Default)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Неизменяемый меш чанка. Владение передаётся чанку, запросившему извлечение.
/// Пустой меш - валидное состояние (чанк без геометрии всё равно существует).
#[derive(Debug, Default)]
pub struct MeshArtifact {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshArtifact {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Интерлив позиций и нормалей для загрузки вершинного буфера
    pub fn vertex_stream(&self) -> Vec<TerrainVertex> {
        self.positions
            .iter()
            .zip(self.normals.iter())
            .map(|(p, n)| TerrainVertex { position: *p, normal: *n })
            .collect()
    }
}
