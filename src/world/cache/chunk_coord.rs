// ============================================
// Chunk Coord - Идентификатор чанка
// ============================================

use std::fmt;

use ultraviolet::Vec3;

/// Координата чанка на бесконечной сетке: (chunk_x, chunk_z)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Новая координата со смещением (исходная не меняется)
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x.wrapping_add(dx), self.z.wrapping_add(dz))
    }

    /// Разность по осям в той же заворачивающейся арифметике, что и `offset`:
    /// сосед i32::MAX по +x это i32::MIN на расстоянии 1
    #[inline]
    fn delta(self, other: ChunkCoord) -> (i64, i64) {
        (
            self.x.wrapping_sub(other.x) as i64,
            self.z.wrapping_sub(other.z) as i64,
        )
    }

    /// Расстояние Чебышёва (квадратная зона загрузки)
    pub fn chebyshev_distance(self, other: ChunkCoord) -> i64 {
        let (dx, dz) = self.delta(other);
        dx.abs().max(dz.abs())
    }

    /// Квадрат евклидова расстояния, в целых, без погрешности float
    pub fn distance_squared(self, other: ChunkCoord) -> i64 {
        let (dx, dz) = self.delta(other);
        (dx * dx).saturating_add(dz * dz)
    }

    /// Все координаты квадрата [-radius, radius]² вокруг центра, построчно (z, затем x)
    pub fn square_around(self, radius: i32) -> impl Iterator<Item = ChunkCoord> {
        (-radius..=radius)
            .flat_map(move |dz| (-radius..=radius).map(move |dx| self.offset(dx, dz)))
    }

    /// Мировая позиция угла чанка (минимальные x, z)
    pub fn origin(self, chunk_size: f32) -> [f32; 3] {
        [self.x as f32 * chunk_size, 0.0, self.z as f32 * chunk_size]
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from((x, z): (i32, i32)) -> Self {
        Self::new(x, z)
    }
}

/// Мировая позиция -> чанк: floor-деление по осям X и Z
#[inline]
pub fn world_to_chunk(position: Vec3, chunk_size: f32) -> ChunkCoord {
    ChunkCoord::new(
        (position.x / chunk_size).floor() as i32,
        (position.z / chunk_size).floor() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_to_chunk_floors_negative_positions() {
        assert_eq!(world_to_chunk(Vec3::new(0.0, 0.0, 0.0), 16.0), ChunkCoord::new(0, 0));
        assert_eq!(world_to_chunk(Vec3::new(17.0, 5.0, 0.0), 16.0), ChunkCoord::new(1, 0));
        assert_eq!(world_to_chunk(Vec3::new(-0.5, 0.0, -16.0), 16.0), ChunkCoord::new(-1, -1));
        assert_eq!(world_to_chunk(Vec3::new(15.99, 0.0, -16.01), 16.0), ChunkCoord::new(0, -2));
    }

    #[test]
    fn test_square_around_covers_sweep() {
        let center = ChunkCoord::new(3, -4);
        let coords: Vec<_> = center.square_around(2).collect();
        assert_eq!(coords.len(), 25);
        assert!(coords.iter().all(|c| c.chebyshev_distance(center) <= 2));
        assert_eq!(coords[0], ChunkCoord::new(1, -6));
        assert_eq!(coords[24], ChunkCoord::new(5, -2));

        assert_eq!(center.square_around(0).collect::<Vec<_>>(), vec![center]);
    }

    #[test]
    fn test_distances() {
        let a = ChunkCoord::new(0, 0);
        let b = ChunkCoord::new(3, -4);
        assert_eq!(a.distance_squared(b), 25);
        assert_eq!(a.chebyshev_distance(b), 4);
    }

    #[test]
    fn test_distances_agree_with_offset_at_i32_edge() {
        let edge = ChunkCoord::new(i32::MAX, i32::MIN);
        let wrapped = edge.offset(1, -1);
        assert_eq!(wrapped, ChunkCoord::new(i32::MIN, i32::MAX));
        assert_eq!(edge.chebyshev_distance(wrapped), 1);
        assert_eq!(edge.distance_squared(wrapped), 2);
        assert!(edge.square_around(2).all(|c| c.chebyshev_distance(edge) <= 2));
    }
}
