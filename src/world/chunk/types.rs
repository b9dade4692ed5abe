// ============================================
// Chunk Types - Дескрипторы геометрии чанка
// ============================================

use crate::world::cache::ChunkCoord;
use crate::world::generation::{CellKind, DreamZone};

/// Сторона периметра чанка
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Край z = 0
    South,
    /// Край x = chunk_size
    East,
    /// Край z = chunk_size
    North,
    /// Край x = 0
    West,
}

impl Direction {
    /// Порядок сторон в дескрипторах чанка
    pub const ALL: [Direction; 4] = [
        Direction::South,
        Direction::East,
        Direction::North,
        Direction::West,
    ];

    /// Поворот вокруг Y: 0 для стен вдоль X, pi/2 для стен вдоль Z
    pub fn yaw(self) -> f32 {
        match self {
            Direction::South | Direction::North => 0.0,
            Direction::East | Direction::West => std::f32::consts::FRAC_PI_2,
        }
    }

    /// Стена идёт вдоль оси X
    pub fn runs_along_x(self) -> bool {
        matches!(self, Direction::South | Direction::North)
    }
}

/// Сегмент стены по периметру
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSegment {
    /// Центр сегмента у пола, относительно угла чанка
    pub local_position: [f32; 3],
    pub direction: Direction,
    /// 1.0 +- амплитуда
    pub height_scale: f32,
    pub tint: f32,
    /// Проём: общий край двух чанков решает одинаково с обеих сторон
    pub doorway: bool,
}

/// Плитка пола
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorTile {
    /// Центр плитки, относительно угла чанка
    pub local_position: [f32; 3],
    pub cell: CellKind,
    pub tint: f32,
}

/// Чанк: чистая функция (координата, сид мира)
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub coord: ChunkCoord,
    pub variation_seed: u32,
    pub walls: Vec<WallSegment>,
    pub floor: Vec<FloorTile>,
    pub zone: Option<DreamZone>,
}

impl Chunk {
    /// Стены одной стороны, в порядке вдоль края
    pub fn walls_on(&self, direction: Direction) -> impl Iterator<Item = &WallSegment> {
        self.walls.iter().filter(move |w| w.direction == direction)
    }

    pub fn doorway_count(&self) -> usize {
        self.walls.iter().filter(|w| w.doorway).count()
    }
}
