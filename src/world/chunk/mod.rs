mod layout;
mod types;
mod builder;

pub use builder::{build_chunk, ChunkBuilder};
pub use layout::ChunkLayout;
pub use types::{Chunk, Direction, FloorTile, WallSegment};
