// ============================================
// Background Streamer - Генерация чанков в фоне
// ============================================
// Сборка в рабочем потоке (rayon внутри), коммит только в потоке владельца

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use rayon::prelude::*;
use ultraviolet::Vec3;

use crate::config::{ConfigError, WorldConfig};
use crate::world::cache::ChunkCoord;
use crate::world::chunk::Chunk;
use crate::world::sink::ChunkSink;

use super::controller::{StreamReport, StreamingController};

/// Запрос на сборку
struct BuildRequest {
    center: ChunkCoord,
    coords: Vec<ChunkCoord>,
}

/// Собранные чанки
struct BuiltBatch {
    center: ChunkCoord,
    chunks: Vec<Chunk>,
}

/// Асинхронный стример: выгрузка сразу, загрузка по готовности
pub struct BackgroundStreamer<S: ChunkSink> {
    controller: StreamingController<S>,
    request_tx: Option<Sender<BuildRequest>>,
    result_rx: Receiver<BuiltBatch>,
    worker: Option<JoinHandle<()>>,
    pending: bool,
}

impl<S: ChunkSink> BackgroundStreamer<S> {
    pub fn new(config: WorldConfig, sink: S) -> Result<Self, ConfigError> {
        let controller = StreamingController::new(config, sink)?;
        let builder = controller.builder().clone();

        let (request_tx, request_rx) = channel::<BuildRequest>();
        let (result_tx, result_rx) = channel::<BuiltBatch>();

        let worker = thread::spawn(move || loop {
            match request_rx.recv() {
                Ok(request) => {
                    let chunks: Vec<Chunk> = request
                        .coords
                        .par_iter()
                        .map(|c| builder.build(*c))
                        .collect();
                    let batch = BuiltBatch {
                        center: request.center,
                        chunks,
                    };
                    if result_tx.send(batch).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        Ok(Self {
            controller,
            request_tx: Some(request_tx),
            result_rx,
            worker: Some(worker),
            pending: false,
        })
    }

    pub fn controller(&self) -> &StreamingController<S> {
        &self.controller
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Позиция игрока за кадр: выгрузка и, если воркер свободен, новый запрос
    pub fn update(&mut self, position: Vec3) -> StreamReport {
        let center = self.controller.world_to_chunk(position);
        let moved = self.controller.current_chunk() != Some(center);

        let mut report = self.controller.begin_pass(center);
        if moved {
            self.controller.evict_far(center, &mut report);
        }

        if let (false, Some(tx)) = (self.pending, &self.request_tx) {
            let coords = self.controller.missing_around(center);
            if !coords.is_empty() {
                log::debug!("Requesting {} chunks around {}", coords.len(), center);
                if tx.send(BuildRequest { center, coords }).is_ok() {
                    self.pending = true;
                }
            }
        }

        report
    }

    /// Забрать готовые чанки, не блокируя
    pub fn poll(&mut self) -> StreamReport {
        match self.result_rx.try_recv() {
            Ok(batch) => self.apply(batch),
            Err(TryRecvError::Empty) => self.empty_report(),
            Err(TryRecvError::Disconnected) => {
                self.pending = false;
                self.empty_report()
            }
        }
    }

    /// Дождаться текущего запроса (если есть)
    pub fn wait(&mut self) -> StreamReport {
        if !self.pending {
            return self.empty_report();
        }
        match self.result_rx.recv() {
            Ok(batch) => self.apply(batch),
            Err(_) => {
                self.pending = false;
                self.empty_report()
            }
        }
    }

    fn empty_report(&self) -> StreamReport {
        StreamReport::new(self.controller.current_chunk().unwrap_or_default())
    }

    /// Коммит с отбрасыванием устаревшего: уже загруженное или вне квадрата
    fn apply(&mut self, batch: BuiltBatch) -> StreamReport {
        self.pending = false;

        let center = self.controller.current_chunk().unwrap_or(batch.center);
        let radius = self.controller.load_radius() as i64;
        let store = self.controller.store();

        let total = batch.chunks.len();
        let fresh: Vec<Chunk> = batch
            .chunks
            .into_iter()
            .filter(|c| c.coord.chebyshev_distance(center) <= radius && !store.has(c.coord))
            .collect();
        if fresh.len() < total {
            log::debug!(
                "Dropped {} stale chunks built around {}",
                total - fresh.len(),
                batch.center
            );
        }

        let mut report = StreamReport::new(center);
        self.controller.commit(fresh, &mut report);
        report
    }

    /// Остановить воркер: закрыть канал запросов и дождаться потока.
    /// Недособранный запрос отбрасывается
    pub fn shutdown(&mut self) {
        self.request_tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Background chunk worker panicked");
            }
        }
        self.pending = false;
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

impl<S: ChunkSink> Drop for BackgroundStreamer<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::sink::NullSink;

    fn config() -> WorldConfig {
        WorldConfig::default().with_radius(2).with_seed(7)
    }

    #[test]
    fn test_background_matches_synchronous() {
        let mut sync = StreamingController::new(config(), NullSink).unwrap();
        let mut bg = BackgroundStreamer::new(config(), NullSink).unwrap();

        let spawn = Vec3::new(3.0, 0.0, -20.0);
        sync.initialize(spawn);
        bg.update(spawn);
        assert!(bg.is_pending());
        let report = bg.wait();
        assert_eq!(report.loaded.len(), 25);
        assert_eq!(bg.controller().store().coordinates(), sync.store().coordinates());

        let target = Vec3::new(40.0, 0.0, 5.0);
        sync.on_player_moved(target);
        bg.update(target);
        bg.wait();
        assert_eq!(bg.controller().store().coordinates(), sync.store().coordinates());

        for coord in sync.store().coordinates() {
            assert_eq!(bg.controller().store().get(coord), sync.store().get(coord));
        }
    }

    #[test]
    fn test_stale_batch_is_dropped() {
        let mut bg = BackgroundStreamer::new(config(), NullSink).unwrap();
        bg.update(Vec3::new(0.0, 0.0, 0.0));

        // Игрок телепортировался до того, как воркер закончил
        let far = Vec3::new(16.0 * 100.0, 0.0, 0.0);
        bg.update(far);
        let report = bg.wait();
        assert!(report.loaded.is_empty());
        assert!(bg.controller().store().is_empty());

        bg.update(far);
        bg.wait();
        let center = ChunkCoord::new(100, 0);
        assert_eq!(bg.controller().store().len(), 25);
        assert!(bg.controller().is_fully_loaded(center));
    }

    #[test]
    fn test_shutdown_joins_worker_mid_request() {
        let mut bg = BackgroundStreamer::new(config(), NullSink).unwrap();
        bg.update(Vec3::new(0.0, 0.0, 0.0));
        assert!(bg.is_pending());

        bg.shutdown();
        assert!(!bg.is_running());
        assert!(!bg.is_pending());

        // После остановки запросы не отправляются, выгрузка продолжает работать
        let report = bg.update(Vec3::new(16.0 * 10.0, 0.0, 0.0));
        assert!(report.loaded.is_empty());
        assert!(!bg.is_pending());
        assert!(bg.poll().is_empty());
        assert!(bg.wait().is_empty());
    }

    #[test]
    fn test_drop_with_pending_request_returns() {
        for _ in 0..8 {
            let mut bg = BackgroundStreamer::new(config().with_radius(4), NullSink).unwrap();
            bg.update(Vec3::new(5.0, 0.0, 5.0));
            drop(bg);
        }
    }

    #[test]
    fn test_poll_without_request_is_empty() {
        let mut bg = BackgroundStreamer::new(config(), NullSink).unwrap();
        assert!(bg.poll().is_empty());
        assert!(bg.wait().is_empty());
    }
}
