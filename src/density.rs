// ============================================
// Density Field Builder - Скалярный объём чанка
// ============================================
// Композиция шума, биома и точек терраформинга в плотностное поле.
// Поле - чистая функция (origin, resolution, lod, seed, points):
// одинаковые входы дают бит-в-бит одинаковый объём.

use ndshape::{RuntimeShape, Shape};
use rayon::prelude::*;
use ultraviolet::{Vec2, Vec3};

use crate::biomes::{BiomeDefinition, BiomeSelector};
use crate::chunk::Chunk;
use crate::noise::NoiseField;
use crate::terraform::{TerraformPoint, TerraformStore};

/// Амплитуда влияния одной точки терраформинга в центре её радиуса
const TERRAFORM_STRENGTH: f32 = 40.0;

/// Скалярный объём: dim^3 сэмплов, x растёт быстрее всего.
/// Объём дополнен одной ячейкой с каждой стороны, чтобы нормали
/// соседних чанков сшивались на границах LOD.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarVolume {
    values: Vec<f32>,
    dim: u32,
}

impl ScalarVolume {
    pub fn new(dim: u32) -> Self {
        let shape = RuntimeShape::<u32, 3>::new([dim, dim, dim]);
        Self {
            values: vec![0.0; shape.size() as usize],
            dim,
        }
    }

    pub fn dim(&self) -> u32 {
        self.dim
    }

    #[inline]
    pub fn value(&self, x: u32, y: u32, z: u32) -> f32 {
        let shape = RuntimeShape::<u32, 3>::new([self.dim, self.dim, self.dim]);
        self.values[shape.linearize([x, y, z]) as usize]
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// Запрос на построение поля. Всё в единицах сетки.
#[derive(Clone, Debug)]
pub struct DensityFieldRequest {
    /// Начало чанка в единицах сетки
    pub origin: Vec3,
    /// Ячеек по стороне при данном LOD
    pub resolution: u32,
    pub lod_step: u32,
    pub biome: BiomeDefinition,
    /// Точки терраформинга из корзины этого чанка
    pub points: Vec<TerraformPoint>,
}

/// Строитель плотностных полей
pub struct DensityFieldBuilder {
    noise: NoiseField,
    selector: BiomeSelector,
    chunk_size: u32,
    sqr_terraform_radius: f32,
}

impl DensityFieldBuilder {
    pub fn new(seed: u64, chunk_size: u32, biome_region_size: f32, terraform_radius: f32) -> Self {
        Self {
            noise: NoiseField::new(seed),
            selector: BiomeSelector::new(seed, biome_region_size),
            chunk_size,
            sqr_terraform_radius: terraform_radius * terraform_radius,
        }
    }

    pub fn with_selector(mut self, selector: BiomeSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn selector(&self) -> &BiomeSelector {
        &self.selector
    }

    /// Собрать запрос для живого чанка
    pub fn request_for(&self, chunk: &Chunk, store: &TerraformStore) -> DensityFieldRequest {
        let size = self.chunk_size as f32;
        let origin = Vec3::new(chunk.id.x as f32 * size, 0.0, chunk.id.z as f32 * size);
        let resolution = self.chunk_size.div_ceil(chunk.lod_step);
        DensityFieldRequest {
            origin,
            resolution,
            lod_step: chunk.lod_step,
            biome: self.selector.definition_at(Vec2::new(origin.x, origin.z)).clone(),
            points: store.points_for(chunk.id).to_vec(),
        }
    }

    /// Построить объём. Детерминирован для идентичных запросов.
    pub fn build_field(&self, request: &DensityFieldRequest) -> ScalarVolume {
        // +1 сэмпл на ячейку сетки, плюс паддинг по одной ячейке с каждой стороны
        let dim = request.resolution + 3;
        let mut volume = ScalarVolume::new(dim);
        let step = request.lod_step as f32;
        let layer = (dim * dim) as usize;

        volume.values.par_chunks_mut(layer).enumerate().for_each(|(z, slice)| {
            for y in 0..dim {
                for x in 0..dim {
                    // Сдвиг на -1: первый сэмпл лежит за границей чанка
                    let p = request.origin
                        + Vec3::new(x as f32 - 1.0, y as f32 - 1.0, z as f32 - 1.0) * step;
                    slice[(y * dim + x) as usize] = self.sample(p, request);
                }
            }
        });

        volume
    }

    #[inline]
    fn sample(&self, p: Vec3, request: &DensityFieldRequest) -> f32 {
        let biome = &request.biome;
        let mut density = (biome.base_height - p.y) * biome.height_weight;
        for (i, octave) in biome.octaves.iter().enumerate() {
            density += octave.amplitude * self.noise.sample_octave(p, octave.frequency, i as u32);
        }
        density + self.terraform_influence(p, &request.points)
    }

    /// Вклад точек терраформинга: гладкий радиальный спад до нуля
    /// на границе радиуса. Точки вне корзины чанка сюда не попадают.
    #[inline]
    fn terraform_influence(&self, p: Vec3, points: &[TerraformPoint]) -> f32 {
        let mut influence = 0.0;
        for point in points {
            let sqr_dist = (p - point.position).mag_sq();
            if sqr_dist < self.sqr_terraform_radius {
                let falloff = 1.0 - sqr_dist / self.sqr_terraform_radius;
                influence -= point.weight * TERRAFORM_STRENGTH * falloff;
            }
        }
        influence
    }
}
