// ============================================
// Chunk Builder - Генерация геометрии чанка
// ============================================
// Чистая функция: никаких аллокаций движка, никакого RNG

use std::f32::consts::TAU;

use crate::config::WorldConfig;
use crate::world::cache::ChunkCoord;
use crate::world::generation::{classify_tile, coord_key, hash_coord, stream, unit, DreamZone};

use super::layout::ChunkLayout;
use super::types::{Chunk, Direction, FloorTile, WallSegment};

const HEIGHT_SALT: u64 = 0x4845_4947_4854_0001;
const TINT_SALT: u64 = 0x5449_4E54_0000_0002;
const FLOOR_TINT_SALT: u64 = 0x464C_4F4F_5200_0003;
const DOOR_X_SALT: u64 = 0x444F_4F52_5800_0004;
const DOOR_Z_SALT: u64 = 0x444F_4F52_5A00_0005;

/// Шанс дополнительного проёма сверх обязательного
const EXTRA_DOORWAY_CHANCE: f32 = 0.25;

/// Генератор чанков; параметры неизменны после создания
#[derive(Debug, Clone)]
pub struct ChunkBuilder {
    seed: u32,
    layout: ChunkLayout,
    height_amplitude: f32,
}

impl ChunkBuilder {
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            seed: config.world_seed,
            layout: ChunkLayout::from_config(config),
            height_amplitude: config.height_amplitude,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn layout(&self) -> &ChunkLayout {
        &self.layout
    }

    pub fn build(&self, coord: ChunkCoord) -> Chunk {
        let key = coord_key(coord, self.seed);

        Chunk {
            coord,
            variation_seed: hash_coord(coord, self.seed),
            walls: self.build_walls(coord, key),
            floor: self.build_floor(coord, key),
            zone: DreamZone::for_chunk(key, self.layout.chunk_size),
        }
    }

    fn build_walls(&self, coord: ChunkCoord, key: u64) -> Vec<WallSegment> {
        let n = self.layout.segments_per_side;
        let size = self.layout.chunk_size;
        let seg_len = self.layout.segment_length();
        let mut walls = Vec::with_capacity(self.layout.walls_per_chunk());

        for (side, direction) in Direction::ALL.into_iter().enumerate() {
            let doors = self.edge_doorways(coord, direction);

            for i in 0..n {
                let index = side as u32 * n + i;
                let along = seg_len * (i as f32 + 0.5);
                let local_position = match direction {
                    Direction::South => [along, 0.0, 0.0],
                    Direction::East => [size, 0.0, along],
                    Direction::North => [along, 0.0, size],
                    Direction::West => [0.0, 0.0, along],
                };

                let height_phase = unit(stream(key, HEIGHT_SALT, index)) * TAU;
                let tint_phase = unit(stream(key, TINT_SALT, index)) * 2.0 * TAU;

                walls.push(WallSegment {
                    local_position,
                    direction,
                    height_scale: 1.0 + self.height_amplitude * height_phase.sin(),
                    tint: 0.85 + 0.15 * (tint_phase + 1.3).sin(),
                    doorway: doors[i as usize],
                });
            }
        }

        walls
    }

    /// Проёмы на краю. Край идентифицируется независимо от того,
    /// с какой стороны на него смотрят: North(x, z) == South(x, z + 1)
    fn edge_doorways(&self, coord: ChunkCoord, direction: Direction) -> Vec<bool> {
        let (edge, salt) = match direction {
            Direction::South => (coord, DOOR_X_SALT),
            Direction::North => (coord.offset(0, 1), DOOR_X_SALT),
            Direction::West => (coord, DOOR_Z_SALT),
            Direction::East => (coord.offset(1, 0), DOOR_Z_SALT),
        };

        let n = self.layout.segments_per_side;
        let edge_key = coord_key(edge, self.seed);
        let guaranteed = (stream(edge_key, salt, 0) % n as u64) as u32;

        (0..n)
            .map(|i| i == guaranteed || unit(stream(edge_key, salt, i + 1)) < EXTRA_DOORWAY_CHANCE)
            .collect()
    }

    fn build_floor(&self, coord: ChunkCoord, key: u64) -> Vec<FloorTile> {
        let n = self.layout.tiles_per_side;
        let spacing = self.layout.tile_spacing();
        let mut floor = Vec::with_capacity(self.layout.tiles_per_chunk());

        for tz in 0..n {
            for tx in 0..n {
                let tile_x = coord.x as i64 * n as i64 + tx as i64;
                let tile_z = coord.z as i64 * n as i64 + tz as i64;
                let index = tz * n + tx;
                let tint_phase = unit(stream(key, FLOOR_TINT_SALT, index)) * TAU;

                floor.push(FloorTile {
                    local_position: [
                        spacing * (tx as f32 + 0.5),
                        0.0,
                        spacing * (tz as f32 + 0.5),
                    ],
                    cell: classify_tile(tile_x, tile_z, self.seed),
                    tint: 0.9 + 0.05 * (tint_phase * 3.0 + 0.7).sin(),
                });
            }
        }

        floor
    }
}

/// Сборка с параметрами по умолчанию
pub fn build_chunk(coord: ChunkCoord, seed: u32) -> Chunk {
    ChunkBuilder::new(&WorldConfig::default().with_seed(seed)).build(coord)
}
