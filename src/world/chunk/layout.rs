// ============================================
// Chunk Layout - Размеры геометрии чанка
// ============================================

use crate::config::WorldConfig;

/// Общие размеры, нужные билдеру, рендеру и коллизиям
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkLayout {
    pub chunk_size: f32,
    pub segments_per_side: u32,
    pub tiles_per_side: u32,
    pub wall_height: f32,
}

impl ChunkLayout {
    pub fn from_config(config: &WorldConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            segments_per_side: config.wall_segments_per_side,
            tiles_per_side: config.floor_tiles_per_side,
            wall_height: config.wall_height,
        }
    }

    #[inline]
    pub fn segment_length(&self) -> f32 {
        self.chunk_size / self.segments_per_side as f32
    }

    #[inline]
    pub fn tile_spacing(&self) -> f32 {
        self.chunk_size / self.tiles_per_side as f32
    }

    pub fn walls_per_chunk(&self) -> usize {
        self.segments_per_side as usize * 4
    }

    pub fn tiles_per_chunk(&self) -> usize {
        (self.tiles_per_side * self.tiles_per_side) as usize
    }
}

impl Default for ChunkLayout {
    fn default() -> Self {
        Self::from_config(&WorldConfig::default())
    }
}
