// ============================================
// Collision - Боксы стен для физики
// ============================================

use ultraviolet::Vec3;

use crate::world::chunk::{Chunk, ChunkLayout};
use crate::world::instance::WALL_THICKNESS;

/// Axis-aligned бокс в мировых координатах
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Расширить по X/Z (радиус игрока)
    pub fn inflate_xz(&self, radius: f32) -> Self {
        Self {
            min: Vec3::new(self.min.x - radius, self.min.y, self.min.z - radius),
            max: Vec3::new(self.max.x + radius, self.max.y, self.max.z + radius),
        }
    }
}

/// Боксы сплошных сегментов стен (проёмы пропускаются)
pub fn wall_aabbs(chunk: &Chunk, layout: &ChunkLayout) -> Vec<Aabb> {
    let origin = chunk.coord.origin(layout.chunk_size);
    let half_len = layout.segment_length() * 0.5;
    let half_thick = WALL_THICKNESS * 0.5;

    chunk
        .walls
        .iter()
        .filter(|w| !w.doorway)
        .map(|w| {
            let cx = origin[0] + w.local_position[0];
            let cz = origin[2] + w.local_position[2];
            let (hx, hz) = if w.direction.runs_along_x() {
                (half_len, half_thick)
            } else {
                (half_thick, half_len)
            };
            Aabb::new(
                Vec3::new(cx - hx, 0.0, cz - hz),
                Vec3::new(cx + hx, layout.wall_height * w.height_scale, cz + hz),
            )
        })
        .collect()
}

/// Пересекает ли точка (с радиусом) стены данных чанков
pub fn is_blocked<'a>(
    chunks: impl IntoIterator<Item = &'a Chunk>,
    layout: &ChunkLayout,
    position: Vec3,
    radius: f32,
) -> bool {
    chunks.into_iter().any(|chunk| {
        wall_aabbs(chunk, layout)
            .iter()
            .any(|b| b.inflate_xz(radius).contains(position))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::cache::ChunkCoord;
    use crate::world::chunk::{build_chunk, Direction};

    #[test]
    fn test_aabbs_skip_doorways() {
        let layout = ChunkLayout::default();
        let chunk = build_chunk(ChunkCoord::new(0, 0), 12);
        let boxes = wall_aabbs(&chunk, &layout);
        assert_eq!(boxes.len(), chunk.walls.len() - chunk.doorway_count());
    }

    #[test]
    fn test_solid_wall_blocks_and_doorway_does_not() {
        let layout = ChunkLayout::default();
        let chunk = build_chunk(ChunkCoord::new(2, -3), 4);
        let origin = chunk.coord.origin(layout.chunk_size);

        for wall in chunk.walls_on(Direction::South) {
            let p = Vec3::new(
                origin[0] + wall.local_position[0],
                1.0,
                origin[2] + wall.local_position[2],
            );
            assert_eq!(is_blocked([&chunk], &layout, p, 0.3), !wall.doorway);
        }

        let centre = Vec3::new(origin[0] + 8.0, 1.0, origin[2] + 8.0);
        assert!(!is_blocked([&chunk], &layout, centre, 0.3));
    }

    #[test]
    fn test_aabb_contains() {
        let b = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 1.0));
        assert!(b.contains(Vec3::new(0.5, 1.0, 0.5)));
        assert!(!b.contains(Vec3::new(1.5, 1.0, 0.5)));
        assert!(b.inflate_xz(0.6).contains(Vec3::new(1.5, 1.0, 0.5)));
    }
}
