mod chunk_coord;

pub use chunk_coord::{world_to_chunk, ChunkCoord};
