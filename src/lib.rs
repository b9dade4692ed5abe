// ============================================
// Backrooms World - Бесконечный мир из чанков
// ============================================
// Детерминированная генерация + стриминг вокруг игрока

pub mod config;
pub mod world;

pub use config::{ConfigError, WorldConfig};
pub use world::{
    world_to_chunk, Chunk, ChunkBuilder, ChunkCoord, ChunkSink, ChunkStore, StreamReport,
    StreamingController,
};
