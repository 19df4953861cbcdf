// ============================================
// Terraform Store - Хранение правок terrain
// ============================================
// Пользовательские точки правок поверх процедурной генерации.
// Точки append-only: никогда не мутируются, только добавляются и
// раскладываются по корзинам чанков, которые накрывает их радиус.
// Персистентности нет - правки живут в памяти сессии.

use std::collections::HashMap;

use ultraviolet::Vec3;

use crate::chunk::ChunkId;

/// Направление правки
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerraformKind {
    /// Вырезать породу (уменьшить плотность)
    Carve,
    /// Нарастить породу (увеличить плотность)
    Build,
}

/// Точка правки: мировая позиция и знаковый вес.
/// Положительный вес вырезает, отрицательный наращивает.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerraformPoint {
    pub position: Vec3,
    pub weight: f32,
}

/// Хранилище правок, разложенных по чанкам
pub struct TerraformStore {
    /// Сторона чанка в единицах сетки
    chunk_size: f32,
    /// Общий радиус влияния точки (в единицах сетки)
    radius: f32,
    buckets: HashMap<ChunkId, Vec<TerraformPoint>>,
    /// Версия правок (инкрементируется при каждой правке)
    version: u64,
}

impl TerraformStore {
    pub fn new(chunk_size: f32, radius: f32) -> Self {
        Self {
            chunk_size,
            radius,
            buckets: HashMap::new(),
            version: 0,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Добавить правку. Возвращает затронутые чанки, чтобы вызывающий
    /// мог немедленно поставить их на переизвлечение меша.
    pub fn add_edit(&mut self, position: Vec3, kind: TerraformKind) -> Vec<ChunkId> {
        let weight = match kind {
            TerraformKind::Carve => 1.0,
            TerraformKind::Build => -1.0,
        };
        let point = TerraformPoint { position, weight };

        let affected = self.chunks_in_range(position);
        for id in &affected {
            self.buckets.entry(*id).or_default().push(point);
        }
        self.version += 1;
        affected
    }

    /// Точки, зарегистрированные на чанк (пусто, если правок не было)
    pub fn points_for(&self, id: ChunkId) -> &[TerraformPoint] {
        self.buckets.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn point_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Чанки, чей footprint пересекает радиус влияния точки.
    /// Границы чанков считаются замкнутыми: точка ровно на общей
    /// границе принадлежит обоим соседям.
    fn chunks_in_range(&self, position: Vec3) -> Vec<ChunkId> {
        let (min_x, max_x) = self.axis_range(position.x);
        let (min_z, max_z) = self.axis_range(position.z);

        let mut out = Vec::with_capacity(((max_x - min_x + 1) * (max_z - min_z + 1)) as usize);
        for z in min_z..=max_z {
            for x in min_x..=max_x {
                out.push(ChunkId::new(x, z));
            }
        }
        out
    }

    fn axis_range(&self, coord: f32) -> (i32, i32) {
        let lo = coord - self.radius;
        let hi = coord + self.radius;
        let mut min = (lo / self.chunk_size).floor() as i32;
        // Нижняя граница интервала ровно на стыке чанков: стык замкнут
        // сверху у предыдущего чанка
        if lo == min as f32 * self.chunk_size {
            min -= 1;
        }
        let max = (hi / self.chunk_size).floor() as i32;
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_inside_single_chunk() {
        let mut store = TerraformStore::new(100.0, 5.0);
        let affected = store.add_edit(Vec3::new(50.0, 10.0, 50.0), TerraformKind::Carve);
        assert_eq!(affected, vec![ChunkId::new(0, 0)]);
        assert_eq!(store.points_for(ChunkId::new(0, 0)).len(), 1);
        assert!(store.points_for(ChunkId::new(1, 0)).is_empty());
    }

    #[test]
    fn test_edit_on_shared_boundary_hits_both() {
        // Точка ровно на общей границе чанков (0,0) и (1,0)
        let mut store = TerraformStore::new(100.0, 5.0);
        let affected = store.add_edit(Vec3::new(100.0, 10.0, 50.0), TerraformKind::Carve);
        assert!(affected.contains(&ChunkId::new(0, 0)));
        assert!(affected.contains(&ChunkId::new(1, 0)));
    }

    #[test]
    fn test_boundary_with_zero_overlap_radius() {
        // Даже при радиусе, не пересекающем соседнюю ячейку, стык замкнут
        let mut store = TerraformStore::new(100.0, 0.0001);
        let affected = store.add_edit(Vec3::new(100.0, 0.0, 50.0), TerraformKind::Carve);
        assert!(affected.contains(&ChunkId::new(0, 0)));
        assert!(affected.contains(&ChunkId::new(1, 0)));
    }

    #[test]
    fn test_corner_edit_hits_four_chunks() {
        let mut store = TerraformStore::new(100.0, 5.0);
        let affected = store.add_edit(Vec3::new(100.0, 0.0, 100.0), TerraformKind::Build);
        assert_eq!(affected.len(), 4);
    }

    #[test]
    fn test_carve_and_build_signs() {
        let mut store = TerraformStore::new(100.0, 5.0);
        store.add_edit(Vec3::new(10.0, 0.0, 10.0), TerraformKind::Carve);
        store.add_edit(Vec3::new(20.0, 0.0, 20.0), TerraformKind::Build);
        let points = store.points_for(ChunkId::new(0, 0));
        assert_eq!(points[0].weight, 1.0);
        assert_eq!(points[1].weight, -1.0);
        assert_eq!(store.version(), 2);
    }
}
