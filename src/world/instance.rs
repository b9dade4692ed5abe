// ============================================
// Instances - Per-instance данные для рендера
// ============================================

use crate::world::chunk::{Chunk, ChunkLayout};

/// Толщина стены в мировых единицах
pub const WALL_THICKNESS: f32 = 0.2;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable, Default, PartialEq)]
pub struct WallInstance {
    /// Центр бокса стены в мировых координатах
    pub position: [f32; 3],
    pub yaw: f32,
    pub scale: [f32; 3],
    pub tint: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable, Default, PartialEq)]
pub struct FloorInstance {
    pub position: [f32; 3],
    pub cell: u32,
    pub tint: f32,
}

/// Все инстансы одного чанка
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkInstances {
    pub walls: Vec<WallInstance>,
    pub floor: Vec<FloorInstance>,
}

impl ChunkInstances {
    /// Проёмы не дают инстанса стены
    pub fn from_chunk(chunk: &Chunk, layout: &ChunkLayout) -> Self {
        let origin = chunk.coord.origin(layout.chunk_size);
        let seg_len = layout.segment_length();

        let walls = chunk
            .walls
            .iter()
            .filter(|w| !w.doorway)
            .map(|w| {
                let height = layout.wall_height * w.height_scale;
                WallInstance {
                    position: [
                        origin[0] + w.local_position[0],
                        height * 0.5,
                        origin[2] + w.local_position[2],
                    ],
                    yaw: w.direction.yaw(),
                    scale: [seg_len, height, WALL_THICKNESS],
                    tint: w.tint,
                }
            })
            .collect();

        let floor = chunk
            .floor
            .iter()
            .map(|t| FloorInstance {
                position: [
                    origin[0] + t.local_position[0],
                    0.0,
                    origin[2] + t.local_position[2],
                ],
                cell: t.cell.code(),
                tint: t.tint,
            })
            .collect();

        Self { walls, floor }
    }

    pub fn wall_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.walls)
    }

    pub fn floor_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.floor)
    }

    /// Размер буферов в байтах
    pub fn byte_len(&self) -> usize {
        self.wall_bytes().len() + self.floor_bytes().len()
    }
}
