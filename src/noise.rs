//! Deterministic pseudo-random helpers.
//!
//! These are hash and trigonometric functions, not a statistical RNG:
//! identical inputs always produce identical outputs, which is what lets the
//! compositor rebuild a frame from nothing but its seeds.

/// Hash two scalars into `[0, 1)`.
pub fn hash01(a: f32, b: f32) -> f32 {
    let x = ((a as f64) * 12.9898 + (b as f64) * 78.233).sin() * 43_758.545_3;
    let r = x - x.floor();
    if r >= 1.0 { 0.0 } else { r as f32 }
}

/// Map a hash of `(a, b)` onto `0..len`, or `None` when `len` is zero.
pub fn hash_index(a: f32, b: f32, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let i = (hash01(a, b) * len as f32) as usize;
    Some(i.min(len - 1))
}

/// Fixed-frequency wave in `[-1, 1]`: `sin(k * frequency + scale * phase)`.
pub fn wave(k: f32, scale: f32, frequency: f32, phase: f32) -> f32 {
    (k * frequency + scale * phase).sin()
}
