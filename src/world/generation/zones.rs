// ============================================
// Dream Zones - Зоны "психо-эффектов"
// ============================================
// Зона целиком выводится из ключа чанка

use super::noise::{stream, unit};

/// Шанс появления зоны в чанке
pub const ZONE_CHANCE: f32 = 0.12;
pub const ZONE_MIN_RADIUS: f32 = 3.0;
pub const ZONE_MAX_RADIUS: f32 = 8.0;

const ZONE_SALT: u64 = 0x0D2E_A3D0_0000_0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DreamEffect {
    Slow,
    Fast,
    Float,
    Glitch,
}

impl DreamEffect {
    pub const ALL: [DreamEffect; 4] = [
        DreamEffect::Slow,
        DreamEffect::Fast,
        DreamEffect::Float,
        DreamEffect::Glitch,
    ];
}

/// Круглая зона с эффектом; центр в локальных координатах чанка
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DreamZone {
    pub center: [f32; 3],
    pub radius: f32,
    pub effect: DreamEffect,
    pub intensity: f32,
}

impl DreamZone {
    /// Детерминированная зона для чанка (или None)
    pub fn for_chunk(key: u64, chunk_size: f32) -> Option<Self> {
        if unit(stream(key, ZONE_SALT, 0)) >= ZONE_CHANCE {
            return None;
        }

        let cx = unit(stream(key, ZONE_SALT, 1)) * chunk_size;
        let cz = unit(stream(key, ZONE_SALT, 2)) * chunk_size;
        let radius =
            ZONE_MIN_RADIUS + (ZONE_MAX_RADIUS - ZONE_MIN_RADIUS) * unit(stream(key, ZONE_SALT, 3));
        let effect = DreamEffect::ALL[(stream(key, ZONE_SALT, 4) % 4) as usize];
        let intensity = 0.3 + 0.5 * unit(stream(key, ZONE_SALT, 5));

        Some(Self {
            center: [cx, 0.0, cz],
            radius,
            effect,
            intensity,
        })
    }

    /// Спад к краю (r - d) / r в точке (локальные x, z); 0 вне зоны
    pub fn falloff_at(&self, local_x: f32, local_z: f32) -> f32 {
        let dx = local_x - self.center[0];
        let dz = local_z - self.center[2];
        let distance = (dx * dx + dz * dz).sqrt();
        if distance >= self.radius {
            return 0.0;
        }
        (self.radius - distance) / self.radius
    }

    /// Спад и интенсивность зоны в точке, по отдельности
    pub fn sample_at(&self, local_x: f32, local_z: f32) -> Option<ZoneSample> {
        let falloff = self.falloff_at(local_x, local_z);
        (falloff > 0.0).then_some(ZoneSample {
            effect: self.effect,
            falloff,
            intensity: self.intensity,
        })
    }
}

/// Эффект зоны в точке
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneSample {
    pub effect: DreamEffect,
    /// (r - d) / r
    pub falloff: f32,
    /// Интенсивность зоны, без учёта расстояния
    pub intensity: f32,
}

impl ZoneSample {
    /// Итоговая сила: спад, умноженный на интенсивность
    pub fn strength(&self) -> f32 {
        self.falloff * self.intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::cache::ChunkCoord;
    use crate::world::generation::noise::coord_key;

    #[test]
    fn test_zone_frequency_is_roughly_chance() {
        let mut count = 0;
        for x in 0..50 {
            for z in 0..50 {
                if DreamZone::for_chunk(coord_key(ChunkCoord::new(x, z), 5), 16.0).is_some() {
                    count += 1;
                }
            }
        }
        // 2500 * 0.12 = 300
        assert!((200..400).contains(&count), "count = {}", count);
    }

    #[test]
    fn test_zone_parameters_in_range() {
        for x in 0..200 {
            let key = coord_key(ChunkCoord::new(x, -x), 1);
            if let Some(zone) = DreamZone::for_chunk(key, 16.0) {
                assert!((ZONE_MIN_RADIUS..=ZONE_MAX_RADIUS).contains(&zone.radius));
                assert!((0.3..=0.8).contains(&zone.intensity));
                assert!((0.0..16.0).contains(&zone.center[0]));
                assert_eq!(zone, DreamZone::for_chunk(key, 16.0).unwrap());
            }
        }
    }

    #[test]
    fn test_strength_falls_off() {
        let zone = DreamZone {
            center: [8.0, 0.0, 8.0],
            radius: 4.0,
            effect: DreamEffect::Glitch,
            intensity: 0.5,
        };
        assert_eq!(zone.falloff_at(8.0, 8.0), 1.0);
        assert_eq!(zone.falloff_at(10.0, 8.0), 0.5);
        assert_eq!(zone.falloff_at(12.0, 8.0), 0.0);
        assert_eq!(zone.falloff_at(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_sample_keeps_intensity_separate() {
        let zone = DreamZone {
            center: [8.0, 0.0, 8.0],
            radius: 4.0,
            effect: DreamEffect::Slow,
            intensity: 0.5,
        };
        let sample = zone.sample_at(10.0, 8.0).unwrap();
        assert_eq!(sample.effect, DreamEffect::Slow);
        assert_eq!(sample.falloff, 0.5);
        assert_eq!(sample.intensity, 0.5);
        assert_eq!(sample.strength(), 0.25);
        assert_eq!(zone.sample_at(12.0, 8.0), None);
    }
}
