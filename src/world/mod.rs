// ============================================
// World Module - Чанковый мир Backrooms
// ============================================

pub mod cache;
pub mod generation;
pub mod chunk;
pub mod instance;
pub mod sink;
pub mod store;
pub mod collision;
pub mod streaming;

// Re-exports
pub use cache::{world_to_chunk, ChunkCoord};
pub use chunk::{build_chunk, Chunk, ChunkBuilder, ChunkLayout, Direction, FloorTile, WallSegment};
pub use generation::{CellKind, DreamEffect, DreamZone, ZoneSample};
pub use instance::{ChunkInstances, FloorInstance, WallInstance};
pub use sink::{ChunkSink, InstanceSink, NullSink, SinkError};
pub use store::{ChunkStore, StoreError};
pub use streaming::{BackgroundStreamer, StreamReport, StreamingController};
