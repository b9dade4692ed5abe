// ============================================
// Noise Functions - Детерминированная вариация
// ============================================
// Никакого глобального RNG: всё выводится из (координата, сид)

use crate::world::cache::ChunkCoord;

const GOLDEN: u64 = 0x9E37_79B9_7F4A_7C15;
const SEED_SALT: u64 = 0xD6E8_FEB8_6659_FD93;

/// Финализатор murmur3: биекция u64 -> u64 с хорошей лавиной
#[inline(always)]
fn fmix64(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    h ^= h >> 33;
    h = h.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    h ^= h >> 33;
    h
}

/// 64-битный ключ координаты. Инъективен по (x, z) при фиксированном сиде
#[inline(always)]
pub fn coord_key(coord: ChunkCoord, seed: u32) -> u64 {
    let packed = ((coord.x as u32 as u64) << 32) | coord.z as u32 as u64;
    let seed_mix = fmix64((seed as u64).wrapping_mul(GOLDEN) ^ SEED_SALT);
    fmix64(packed ^ seed_mix)
}

/// Хэш координаты в диапазоне 0..2^31
#[inline]
pub fn hash_coord(coord: ChunkCoord, seed: u32) -> u32 {
    (coord_key(coord, seed) >> 33) as u32
}

/// Вариация чанка в диапазоне 0.0..1.0
#[inline]
pub fn variation(coord: ChunkCoord, seed: u32) -> f32 {
    unit(coord_key(coord, seed))
}

/// Независимый поток значений из ключа: (salt, index) -> u64
#[inline(always)]
pub fn stream(key: u64, salt: u64, index: u32) -> u64 {
    fmix64(key ^ salt.wrapping_add(index as u64).wrapping_mul(GOLDEN))
}

/// Старшие 24 бита -> 0.0..1.0 (точно представимо в f32, 1.0 недостижимо)
#[inline(always)]
pub fn unit(h: u64) -> f32 {
    (h >> 40) as f32 / (1u32 << 24) as f32
}

#[inline(always)]
fn hash2d(x: i32, y: i32, seed: u32) -> f32 {
    unit(coord_key(ChunkCoord::new(x, y), seed))
}

#[inline(always)]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// 2D Value Noise с сидом
#[inline]
pub fn noise2d(x: f32, y: f32, seed: u32) -> f32 {
    let xi = x.floor() as i32;
    let yi = y.floor() as i32;
    let xf = smoothstep(x - x.floor());
    let yf = smoothstep(y - y.floor());

    let n00 = hash2d(xi, yi, seed);
    let n10 = hash2d(xi.wrapping_add(1), yi, seed);
    let n01 = hash2d(xi, yi.wrapping_add(1), seed);
    let n11 = hash2d(xi.wrapping_add(1), yi.wrapping_add(1), seed);

    let nx0 = n00 + xf * (n10 - n00);
    let nx1 = n01 + xf * (n11 - n01);

    nx0 + yf * (nx1 - nx0)
}

/// FBM 2D - несколько октав шума
#[inline]
pub fn fbm2d(x: f32, y: f32, octaves: u32, seed: u32) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for octave in 0..octaves {
        value += amplitude * noise2d(x * frequency, y * frequency, seed.wrapping_add(octave));
        max_value += amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }

    value / max_value
}
