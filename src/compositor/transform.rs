use std::f32::consts::PI;

use glam::{Mat4, Vec3, Vec4};

use crate::audio::Spectrum;
use crate::config::CompositorConfig;
use crate::noise::{hash01, wave};
use crate::types::Mesh;

/// Seed size that maps to a file scale of 1.
pub const FULL_SCALE_SIZE: f32 = 300_000.0;
pub const MIN_FILE_SCALE: f32 = 0.4;
pub const MAX_FILE_SCALE: f32 = 1.0;
/// Clones per seed at full file scale.
pub const MAX_CLONES: u32 = 4;

/// Clone colours, picked per clone by hashing `(size, k)`.
pub const PALETTE: [Vec4; 6] = [
    Vec4::new(0.96, 0.26, 0.21, 1.0),
    Vec4::new(1.0, 0.76, 0.03, 1.0),
    Vec4::new(0.30, 0.69, 0.31, 1.0),
    Vec4::new(0.13, 0.59, 0.95, 1.0),
    Vec4::new(0.61, 0.15, 0.69, 1.0),
    Vec4::new(0.93, 0.93, 0.93, 1.0),
];

const ROTATION_FREQUENCY: f32 = 1.7;
const ROTATION_PHASE: Vec3 = Vec3::new(1.3, 2.1, 3.7);
const TRANSLATION_FREQUENCY: f32 = 2.3;
const TRANSLATION_PHASE: Vec3 = Vec3::new(0.7, 4.1, 5.3);

/// `size / 300000` clamped to `[0.4, 1.0]`. NaN sizes take the minimum.
pub fn file_scale(size: f32) -> f32 {
    if size.is_nan() {
        return MIN_FILE_SCALE;
    }
    (size / FULL_SCALE_SIZE).clamp(MIN_FILE_SCALE, MAX_FILE_SCALE)
}

/// `floor(file_scale * 4)`, so 1 to 4 clones per seed.
pub fn clone_count(file_scale: f32) -> u32 {
    ((file_scale * MAX_CLONES as f32).floor() as u32).clamp(1, MAX_CLONES)
}

pub fn palette_color(size: f32, k: u32) -> Vec4 {
    let i = (hash01(size, k as f32) * PALETTE.len() as f32) as usize;
    PALETTE[i.min(PALETTE.len() - 1)]
}

/// Placement of clone `k` of one seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloneTransform {
    pub color: Vec4,
    pub scale: f32,
    /// Euler angles in radians.
    pub rotation: Vec3,
    pub translation: Vec3,
}

impl CloneTransform {
    /// Transform for clone `k` given the spectrum `magnitude` sampled for it.
    ///
    /// Uniform scale is `file_scale * 4 * (1 + magnitude * gain)`. Angles and
    /// offsets come from fixed-frequency waves of `(k, file_scale)` and the
    /// angles are biased by the magnitude, so a silent frame is stable.
    pub fn for_clone(size: f32, k: u32, magnitude: f32, config: &CompositorConfig) -> Self {
        let fs = file_scale(size);
        let kf = k as f32;
        let axis_wave = |frequency: f32, phase: Vec3| {
            Vec3::new(
                wave(kf, fs, frequency, phase.x),
                wave(kf, fs, frequency, phase.y),
                wave(kf, fs, frequency, phase.z),
            )
        };

        Self {
            color: palette_color(size, k),
            scale: fs * MAX_CLONES as f32 * (1.0 + magnitude * config.audio_gain),
            rotation: axis_wave(ROTATION_FREQUENCY, ROTATION_PHASE) * PI + Vec3::splat(magnitude),
            translation: axis_wave(TRANSLATION_FREQUENCY, TRANSLATION_PHASE)
                * config.translation_range,
        }
    }

    /// `T * Rx * Ry * Rz * S`.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_rotation_z(self.rotation.z)
            * Mat4::from_scale(Vec3::splat(self.scale))
    }

    /// Transformed, single-coloured copy of `source`.
    pub fn apply(&self, source: &Mesh, recompute_normals: bool) -> Mesh {
        let matrix = self.matrix();
        let mut clone = source.clone();
        clone.transform_positions(&matrix);
        if recompute_normals {
            clone.recompute_normals_for(&matrix);
        }
        clone.fill_color(self.color);
        clone
    }
}

/// All clones of one seed, merged in clone order.
pub fn compose_seed(
    size: f32,
    source: &Mesh,
    spectrum: &Spectrum,
    config: &CompositorConfig,
) -> Mesh {
    let k_max = clone_count(file_scale(size));
    let mut out = Mesh::with_capacity(
        source.vertex_count() * k_max as usize,
        source.index_count() * k_max as usize,
    );
    for k in 0..k_max {
        let magnitude = spectrum.magnitude_for(k, k_max);
        let clone = CloneTransform::for_clone(size, k, magnitude, config);
        out.append(&clone.apply(source, config.recompute_normals));
    }
    out
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::{disk, tetrahedron};

    #[test]
    fn file_scale_clamps() {
        assert_eq!(file_scale(0.0), 0.4);
        assert_eq!(file_scale(300_000.0), 1.0);
        assert_eq!(file_scale(10_000_000.0), 1.0);
        assert_eq!(file_scale(-5.0), 0.4);
        assert_eq!(file_scale(f32::NAN), 0.4);
        assert_eq!(file_scale(150_000.0), 0.5);
    }

    #[test]
    fn clone_counts() {
        assert_eq!(clone_count(file_scale(150_000.0)), 2);
        assert_eq!(clone_count(file_scale(1_502.0)), 1);
        assert_eq!(clone_count(file_scale(300_000.0)), 4);
        assert_eq!(clone_count(file_scale(240_000.0)), 3);
    }

    #[test]
    fn clone_transform_is_deterministic() {
        let config = CompositorConfig::default();
        let a = CloneTransform::for_clone(90_000.0, 1, 0.02, &config);
        let b = CloneTransform::for_clone(90_000.0, 1, 0.02, &config);
        assert_eq!(a, b);
        assert!(PALETTE.contains(&a.color));
    }

    #[test]
    fn scale_follows_magnitude() {
        let config = CompositorConfig::default();
        let quiet = CloneTransform::for_clone(150_000.0, 0, 0.0, &config);
        let loud = CloneTransform::for_clone(150_000.0, 0, 0.1, &config);
        assert_abs_diff_eq!(quiet.scale, 2.0, epsilon = 1e-6);
        // 0.5 * 4 * (1 + 0.1 * 50)
        assert_abs_diff_eq!(loud.scale, 12.0, epsilon = 1e-4);
    }

    #[test]
    fn translation_stays_in_range() {
        let config = CompositorConfig::default();
        for k in 0..4 {
            let t = CloneTransform::for_clone(300_000.0, k, 0.0, &config);
            assert!(t.translation.abs().max_element() <= config.translation_range + 1e-4);
        }
    }

    #[test]
    fn matrix_scales_before_translating() {
        let t = CloneTransform {
            color: Vec4::ONE,
            scale: 2.0,
            rotation: Vec3::ZERO,
            translation: Vec3::new(1.0, 0.0, 0.0),
        };
        let p = t.matrix().transform_point3(Vec3::new(1.0, 1.0, 1.0));
        assert_abs_diff_eq!(p.x, 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn compose_seed_counts_and_colours() {
        let source = tetrahedron(10.0);
        let spectrum = Spectrum::silence(16);
        let config = CompositorConfig::default();
        let mesh = compose_seed(300_000.0, &source, &spectrum, &config);

        assert_eq!(mesh.vertex_count(), 4 * source.vertex_count());
        assert_eq!(mesh.triangle_count(), 4 * source.triangle_count());
        assert!(mesh.validate().is_ok());

        let v = source.vertex_count();
        for k in 0..4 {
            let clone_colors = &mesh.colors[k * v..(k + 1) * v];
            assert!(clone_colors.iter().all(|c| *c == clone_colors[0]));
            assert_eq!(clone_colors[0], palette_color(300_000.0, k as u32));
        }
    }

    #[test]
    fn compose_seed_is_reproducible() {
        let source = tetrahedron(10.0);
        let spectrum = Spectrum::new(vec![0.01, 0.03, 0.02, 0.05]);
        let config = CompositorConfig::default();
        let a = compose_seed(240_000.0, &source, &spectrum, &config);
        let b = compose_seed(240_000.0, &source, &spectrum, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn normals_untouched_unless_recomputed() {
        let source = tetrahedron(10.0);
        let spectrum = Spectrum::default();
        let mut config = CompositorConfig::default();
        let plain = compose_seed(1_502.0, &source, &spectrum, &config);
        assert_eq!(plain.normals, source.normals);

        config.recompute_normals = true;
        let fixed = compose_seed(1_502.0, &source, &spectrum, &config);
        for n in &fixed.normals {
            assert_abs_diff_eq!(n.length(), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn fan_sources_merge_as_triangles() {
        let source = disk(5.0, 8);
        let mesh = compose_seed(150_000.0, &source, &Spectrum::default(), &CompositorConfig::default());
        assert_eq!(mesh.vertex_count(), 2 * source.vertex_count());
        assert_eq!(mesh.triangle_count(), 2 * source.triangle_count());
        assert!(mesh.validate().is_ok());
    }
}
