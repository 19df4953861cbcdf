// ============================================
// Noise Functions - Шумовые функции для генерации
// ============================================

use ultraviolet::{Vec2, Vec3};

/// Hash3D возвращает значение в диапазоне 0.0..1.0
#[inline(always)]
pub fn hash3d(x: i32, y: i32, z: i32) -> f32 {
    let n = x.wrapping_mul(374761393)
        .wrapping_add(y.wrapping_mul(668265263))
        .wrapping_add(z.wrapping_mul(1274126177));
    let n = (n ^ (n >> 13)).wrapping_mul(1911520717);
    ((n as u32) as f32) / (u32::MAX as f32)
}

#[inline(always)]
pub fn hash2d(x: i32, y: i32) -> f32 {
    let n = x.wrapping_mul(374761393).wrapping_add(y.wrapping_mul(668265263));
    let n = (n ^ (n >> 13)).wrapping_mul(1274126177);
    ((n as u32) as f32) / (u32::MAX as f32)
}

#[inline(always)]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// 3D Value Noise - быстрее Simplex, достаточно для плотностного поля
#[inline]
pub fn noise3d(x: f32, y: f32, z: f32) -> f32 {
    let xi = x.floor() as i32;
    let yi = y.floor() as i32;
    let zi = z.floor() as i32;

    let xf = smoothstep(x - x.floor());
    let yf = smoothstep(y - y.floor());
    let zf = smoothstep(z - z.floor());

    let n000 = hash3d(xi, yi, zi);
    let n100 = hash3d(xi + 1, yi, zi);
    let n010 = hash3d(xi, yi + 1, zi);
    let n110 = hash3d(xi + 1, yi + 1, zi);
    let n001 = hash3d(xi, yi, zi + 1);
    let n101 = hash3d(xi + 1, yi, zi + 1);
    let n011 = hash3d(xi, yi + 1, zi + 1);
    let n111 = hash3d(xi + 1, yi + 1, zi + 1);

    let nx00 = n000 + xf * (n100 - n000);
    let nx10 = n010 + xf * (n110 - n010);
    let nx01 = n001 + xf * (n101 - n001);
    let nx11 = n011 + xf * (n111 - n011);

    let nxy0 = nx00 + yf * (nx10 - nx00);
    let nxy1 = nx01 + yf * (nx11 - nx01);

    nxy0 + zf * (nxy1 - nxy0)
}

/// White noise для выбора биома (классический sin-dot-frac хеш)
#[inline]
pub fn white_noise(uv: Vec2) -> f32 {
    let dot = uv.dot(Vec2::new(12.9898, 78.233));
    let v = dot.sin() * 43758.5453;
    v - v.floor()
}

/// Детерминированный мультиоктавный эвалюатор, привязанный к глобальному seed.
/// Смещения октав выводятся из seed и никогда не меняются в течение сессии.
#[derive(Clone, Copy, Debug)]
pub struct NoiseField {
    seed: u64,
}

/// Диапазон смещений октав (как в исходном генераторе плотности)
const OFFSET_RANGE: f32 = 99_999.0;

impl NoiseField {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// 3D смещение для октавы с индексом `octave`
    #[inline]
    pub fn octave_offset(&self, octave: u32) -> Vec3 {
        let s = (self.seed ^ (self.seed >> 32)) as i32;
        let i = octave as i32;
        Vec3::new(
            (hash3d(s, i, 0) * 2.0 - 1.0) * OFFSET_RANGE,
            (hash3d(s, i, 1) * 2.0 - 1.0) * OFFSET_RANGE,
            (hash3d(s, i, 2) * 2.0 - 1.0) * OFFSET_RANGE,
        )
    }

    /// Одна октава: шум в диапазоне -1..1 в точке p с частотой freq
    #[inline]
    pub fn sample_octave(&self, p: Vec3, frequency: f32, octave: u32) -> f32 {
        let q = (p + self.octave_offset(octave)) * frequency;
        noise3d(q.x, q.y, q.z) * 2.0 - 1.0
    }

    /// Целочисленный джиттер координат биома, выводимый из seed
    #[inline]
    pub fn seed_jitter(&self, axis: i32) -> i32 {
        let s = (self.seed ^ (self.seed >> 32)) as i32;
        (hash2d(s, axis) * 200.0) as i32 - 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise3d_range() {
        for i in 0..200 {
            let t = i as f32 * 0.37;
            let v = noise3d(t, t * 1.7, -t * 0.9);
            assert!((0.0..=1.0).contains(&v), "out of range: {}", v);
        }
    }

    #[test]
    fn test_white_noise_range() {
        for i in 0..200 {
            let v = white_noise(Vec2::new(i as f32 * 3.1, -(i as f32) * 1.3));
            assert!((0.0..1.0).contains(&v), "out of range: {}", v);
        }
    }

    #[test]
    fn test_octave_offsets_deterministic() {
        let a = NoiseField::new(26);
        let b = NoiseField::new(26);
        for i in 0..8 {
            assert_eq!(a.octave_offset(i), b.octave_offset(i));
        }
        // Разный seed - разные смещения
        let c = NoiseField::new(27);
        assert_ne!(a.octave_offset(0), c.octave_offset(0));
    }

    #[test]
    fn test_octave_sample_deterministic() {
        let field = NoiseField::new(1996);
        let p = Vec3::new(12.5, -3.0, 44.0);
        assert_eq!(field.sample_octave(p, 0.09, 0), field.sample_octave(p, 0.09, 0));
    }
}
