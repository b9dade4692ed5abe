// ============================================
// Streaming Controller - Загрузка/выгрузка вокруг игрока
// ============================================
// Загрузка: квадрат [-r, r]². Выгрузка: евклидово расстояние > r + 1.
// Сначала выгрузка, потом загрузка: пик памяти не превышает рабочий набор.

use rayon::prelude::*;
use ultraviolet::Vec3;

use crate::config::{ConfigError, WorldConfig};
use crate::world::cache::{world_to_chunk, ChunkCoord};
use crate::world::chunk::{Chunk, ChunkBuilder, ChunkLayout};
use crate::world::collision;
use crate::world::generation::ZoneSample;
use crate::world::sink::ChunkSink;
use crate::world::store::{ChunkStore, StoreError};

use super::retry::RetryQueue;

/// Что изменилось за один проход
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamReport {
    pub center: ChunkCoord,
    pub loaded: Vec<ChunkCoord>,
    pub evicted: Vec<ChunkCoord>,
    pub failed: Vec<ChunkCoord>,
}

impl StreamReport {
    pub(super) fn new(center: ChunkCoord) -> Self {
        Self {
            center,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty() && self.evicted.is_empty() && self.failed.is_empty()
    }
}

/// Реактивный контроллер над хранилищем чанков; единственный писатель
pub struct StreamingController<S: ChunkSink> {
    config: WorldConfig,
    builder: ChunkBuilder,
    store: ChunkStore<S>,
    current: Option<ChunkCoord>,
    retries: RetryQueue,
    pass: u64,
}

impl<S: ChunkSink> StreamingController<S> {
    pub fn new(config: WorldConfig, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            builder: ChunkBuilder::new(&config),
            store: ChunkStore::new(sink),
            current: None,
            retries: RetryQueue::new(config.max_retry_backoff),
            pass: 0,
            config,
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn builder(&self) -> &ChunkBuilder {
        &self.builder
    }

    pub fn layout(&self) -> &ChunkLayout {
        self.builder.layout()
    }

    pub fn store(&self) -> &ChunkStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ChunkStore<S> {
        &mut self.store
    }

    /// Последний известный чанк игрока
    pub fn current_chunk(&self) -> Option<ChunkCoord> {
        self.current
    }

    pub fn load_radius(&self) -> i32 {
        self.config.load_radius
    }

    pub fn pending_retries(&self) -> usize {
        self.retries.len()
    }

    /// Сколько раз подряд не удалось выделить ресурсы для координаты
    pub fn retry_failures(&self, coord: ChunkCoord) -> u32 {
        self.retries.failures(coord)
    }

    pub fn world_to_chunk(&self, position: Vec3) -> ChunkCoord {
        world_to_chunk(position, self.config.chunk_size)
    }

    /// Начальная загрузка вокруг точки спавна
    pub fn initialize(&mut self, position: Vec3) -> StreamReport {
        let center = self.world_to_chunk(position);
        self.pass += 1;

        let mut report = StreamReport::new(center);
        self.load_missing(center, &mut report);
        self.current = Some(center);

        log::info!(
            "Streaming initialized at {}: {} chunks loaded, {} failed",
            center,
            report.loaded.len(),
            report.failed.len()
        );
        report
    }

    /// Вызывается каждый кадр с позицией игрока
    pub fn on_player_moved(&mut self, position: Vec3) -> StreamReport {
        let player_chunk = self.world_to_chunk(position);
        self.pass += 1;

        let mut report = StreamReport::new(player_chunk);
        if self.current == Some(player_chunk) && !self.retries.has_due(self.pass) {
            return report;
        }

        self.evict_far(player_chunk, &mut report);
        self.load_missing(player_chunk, &mut report);
        self.current = Some(player_chunk);

        if !report.is_empty() {
            log::debug!(
                "Streaming pass at {}: +{} -{} ({} failed, {} resident)",
                player_chunk,
                report.loaded.len(),
                report.evicted.len(),
                report.failed.len(),
                self.store.len()
            );
        }
        report
    }

    pub(super) fn begin_pass(&mut self, center: ChunkCoord) -> StreamReport {
        self.pass += 1;
        self.current = Some(center);
        StreamReport::new(center)
    }

    /// Выгрузка всего, что дальше r + 1 по евклиду
    pub(super) fn evict_far(&mut self, center: ChunkCoord, report: &mut StreamReport) {
        let margin = self.config.load_radius as i64 + 1;
        let limit = margin * margin;

        let mut far: Vec<_> = self
            .store
            .coordinates()
            .into_iter()
            .filter(|c| c.distance_squared(center) > limit)
            .collect();
        far.sort_unstable();

        for coord in far {
            let removed = self.store.remove(coord);
            debug_assert!(removed, "evicting chunk {} that is not loaded", coord);
            log::debug!("Unloaded chunk {}", coord);
            report.evicted.push(coord);
        }

        let radius = self.config.load_radius as i64;
        self.retries.retain(|c| c.chebyshev_distance(center) <= radius);
    }

    /// Координаты квадрата, которых нет в хранилище и которые не ждут повтора
    pub(super) fn missing_around(&self, center: ChunkCoord) -> Vec<ChunkCoord> {
        center
            .square_around(self.config.load_radius)
            .filter(|c| !self.store.has(*c) && !self.retries.is_waiting(*c, self.pass))
            .collect()
    }

    fn load_missing(&mut self, center: ChunkCoord, report: &mut StreamReport) {
        let missing = self.missing_around(center);
        if missing.is_empty() {
            return;
        }

        // Сборка чистая - параллельно; вставка - последовательно
        let builder = &self.builder;
        let chunks: Vec<Chunk> = missing.par_iter().map(|c| builder.build(*c)).collect();

        self.commit(chunks, report);
    }

    /// Закоммитить собранные чанки в хранилище (в порядке списка)
    pub(super) fn commit(&mut self, chunks: Vec<Chunk>, report: &mut StreamReport) {
        for chunk in chunks {
            let coord = chunk.coord;
            match self.store.insert(coord, chunk) {
                Ok(()) => {
                    self.retries.clear(coord);
                    report.loaded.push(coord);
                }
                Err(StoreError::Allocation { source, .. }) => {
                    let next = self.retries.schedule(coord, self.pass);
                    log::warn!(
                        "Chunk {} allocation failed ({}), retry at pass {}",
                        coord,
                        source,
                        next
                    );
                    report.failed.push(coord);
                }
                Err(StoreError::Occupied(_)) => {
                    log::debug!("Chunk {} already loaded, skipping", coord);
                }
            }
        }
    }

    /// Все ли координаты квадрата вокруг центра загружены
    pub fn is_fully_loaded(&self, center: ChunkCoord) -> bool {
        center
            .square_around(self.config.load_radius)
            .all(|c| self.store.has(c))
    }

    /// Сильнейшая зона в мировой точке
    pub fn dream_effect_at(&self, position: Vec3) -> Option<ZoneSample> {
        let size = self.config.chunk_size;
        self.store
            .iter()
            .filter_map(|chunk| {
                let zone = chunk.zone?;
                let origin = chunk.coord.origin(size);
                zone.sample_at(position.x - origin[0], position.z - origin[2])
            })
            .max_by(|a, b| a.strength().total_cmp(&b.strength()))
    }

    /// Коллизия со стенами загруженных чанков (чанк игрока и соседи)
    pub fn is_blocked(&self, position: Vec3, radius: f32) -> bool {
        let center = self.world_to_chunk(position);
        let nearby = center.square_around(1).filter_map(|c| self.store.get(c));
        collision::is_blocked(nearby, self.layout(), position, radius)
    }
}
