// ============================================
// Terrain System - Покадровый оркестратор
// ============================================
// Однопоточный кооперативный цикл: тик конвейера извлечения, затем
// пересчёт видимого набора, если наблюдатель сместился за порог.
// Позиция наблюдателя передаётся явно каждый вызов; глобальна только
// неизменяемая конфигурация.

use ultraviolet::{Vec2, Vec3};

use crate::assets::AssetPlacer;
use crate::chunk::ChunkId;
use crate::config::{ConfigError, TerrainConfig};
use crate::culling::extract_frustum_planes;
use crate::density::DensityFieldBuilder;
use crate::index::ChunkIndex;
use crate::kernel::IsosurfaceKernel;
use crate::lod::LodSelector;
use crate::scheduler::MeshExtractionScheduler;
use crate::terraform::{TerraformKind, TerraformStore};

pub struct TerrainSystem {
    config: TerrainConfig,
    lod: LodSelector,
    index: ChunkIndex,
    scheduler: MeshExtractionScheduler,
    store: TerraformStore,
    builder: DensityFieldBuilder,

    last_viewer: Vec2,
    /// Первый вызов update всегда пересчитывает видимый набор
    primed: bool,
}

impl TerrainSystem {
    /// Конфигурация проверяется один раз; дальше она неизменна
    pub fn new(config: TerrainConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let lod = LodSelector::new(&config.detail_levels);
        let index = ChunkIndex::new(&config, &lod);
        let scheduler = MeshExtractionScheduler::new(&config);
        let store = TerraformStore::new(config.chunk_size as f32, config.terraform_radius);
        let builder = DensityFieldBuilder::new(
            config.seed,
            config.chunk_size,
            config.biome_region_size,
            config.terraform_radius,
        );
        Ok(Self {
            config,
            lod,
            index,
            scheduler,
            store,
            builder,
            last_viewer: Vec2::zero(),
            primed: false,
        })
    }

    /// Покадровый тик. Наблюдатель - в мировых координатах,
    /// view_proj - его текущая view-projection матрица.
    pub fn update(
        &mut self,
        viewer_world: Vec3,
        view_proj: &[[f32; 4]; 4],
        kernel: &mut dyn IsosurfaceKernel,
        assets: Option<&mut dyn AssetPlacer>,
    ) {
        // 1. Тик конвейера извлечения
        self.scheduler.pump(&mut self.index, &self.builder, &self.store, kernel, assets);

        // 2. Видимый набор пересчитывается только после смещения за порог
        let viewer = Vec2::new(viewer_world.x, viewer_world.z) / self.config.world_scale;
        let moved_enough =
            (self.last_viewer - viewer).mag_sq() > self.config.sqr_move_threshold();
        if self.primed && !moved_enough {
            return;
        }
        self.last_viewer = viewer;
        self.primed = true;

        let planes = extract_frustum_planes(view_proj);
        self.index.update_visible_chunks(viewer, &planes, &self.lod, &mut self.scheduler);
    }

    /// Правка terrain. Затронутые живые чанки немедленно ставятся на
    /// переизвлечение, не дожидаясь следующего прохода видимости.
    pub fn terraform(&mut self, position_world: Vec3, kind: TerraformKind) -> Vec<ChunkId> {
        let position = position_world / self.config.world_scale;
        let affected = self.store.add_edit(position, kind);
        for id in &affected {
            if let Some(chunk) = self.index.get(*id) {
                self.scheduler.enqueue(*id, chunk.generation);
            }
        }
        affected
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn chunks(&self) -> &ChunkIndex {
        &self.index
    }

    pub fn scheduler(&self) -> &MeshExtractionScheduler {
        &self.scheduler
    }

    pub fn terraform_store(&self) -> &TerraformStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::mock::MockKernel;
    use crate::lod::DetailLevel;

    /// VP матрица, пропускающая всё: используется в headless-тестах
    const OPEN_VIEW: [[f32; 4]; 4] = [
        [0.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];

    fn test_config() -> TerrainConfig {
        let mut config = TerrainConfig::default();
        config.chunk_size = 10;
        config.detail_levels = vec![DetailLevel::new(1, 15.0), DetailLevel::new(2, 30.0)];
        config.move_threshold = 10.0;
        config
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut config = test_config();
        config.detail_levels.clear();
        assert!(TerrainSystem::new(config).is_err());
    }

    #[test]
    fn test_first_update_materializes_chunks() {
        let mut system = TerrainSystem::new(test_config()).unwrap();
        let mut kernel = MockKernel::new(0, 0);
        system.update(Vec3::new(5.0, 0.0, 5.0), &OPEN_VIEW, &mut kernel, None);
        assert!(system.chunks().len() > 0);
    }

    #[test]
    fn test_hysteresis_skips_small_moves() {
        let mut system = TerrainSystem::new(test_config()).unwrap();
        let mut kernel = MockKernel::new(0, 0);
        system.update(Vec3::new(5.0, 0.0, 5.0), &OPEN_VIEW, &mut kernel, None);
        let count = system.chunks().len();
        let queued = system.scheduler().queued_len();

        // Смещение меньше порога: набор и очередь не трогаются
        system.update(Vec3::new(7.0, 0.0, 5.0), &OPEN_VIEW, &mut kernel, None);
        assert_eq!(system.chunks().len(), count);
        // Конвейер при этом работал: один запрос ушёл из очереди в слот
        assert!(system.scheduler().queued_len() < queued);
    }

    #[test]
    fn test_large_move_reevaluates() {
        let mut system = TerrainSystem::new(test_config()).unwrap();
        let mut kernel = MockKernel::new(0, 0);
        system.update(Vec3::new(5.0, 0.0, 5.0), &OPEN_VIEW, &mut kernel, None);
        assert!(system.chunks().get(ChunkId::new(0, 0)).is_some());

        system.update(Vec3::new(500.0, 0.0, 500.0), &OPEN_VIEW, &mut kernel, None);
        assert!(system.chunks().get(ChunkId::new(0, 0)).is_none());
        assert!(system.chunks().get(ChunkId::new(50, 50)).is_some());
    }

    #[test]
    fn test_terraform_requeues_affected_chunks() {
        let mut system = TerrainSystem::new(test_config()).unwrap();
        let mut kernel = MockKernel::new(0, 0);
        system.update(Vec3::new(5.0, 0.0, 5.0), &OPEN_VIEW, &mut kernel, None);

        // Досушиваем очередь первого прохода
        for _ in 0..200 {
            system.update(Vec3::new(5.0, 0.0, 5.0), &OPEN_VIEW, &mut kernel, None);
        }
        let drained = system.scheduler().queued_len();
        assert_eq!(drained, 0);

        // Правка на общей границе чанков (0,0) и (1,0)
        let affected = system.terraform(Vec3::new(10.0, 5.0, 5.0), TerraformKind::Carve);
        assert!(affected.contains(&ChunkId::new(0, 0)));
        assert!(affected.contains(&ChunkId::new(1, 0)));
        // Оба живых чанка немедленно в очереди на переизвлечение
        assert!(system.scheduler().queued_len() >= 2);
    }

    #[test]
    fn test_pipeline_attaches_meshes_over_ticks() {
        let mut system = TerrainSystem::new(test_config()).unwrap();
        let mut kernel = MockKernel::new(6, 0);
        for _ in 0..600 {
            system.update(Vec3::new(5.0, 0.0, 5.0), &OPEN_VIEW, &mut kernel, None);
        }
        // Весь видимый набор дорисован
        assert!(system.chunks().iter().all(|c| c.is_renderable()));
        assert!(!system.scheduler().in_flight());
    }
}
