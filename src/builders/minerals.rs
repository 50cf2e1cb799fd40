use glam::{Quat, Vec3};

use super::{CopyTransform, clone_merge};
use crate::types::{Mesh, Shape};

/// Fan/spiral layout of a mineral cluster.
///
/// Copy `j` of `n` is scaled by `1 - j/n`, turned `twist * j/n` degrees about
/// Z and placed at `((spread - d)/3, d/2, 0)`, where `d` accumulates
/// `spread * (1 - (j+1)/n)` per copy: later copies shrink, drift up and
/// slide back towards the axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanLayout {
    pub spread: f32,
    /// Degrees.
    pub twist: f32,
}

impl Default for FanLayout {
    fn default() -> Self {
        Self {
            spread: 25.0,
            twist: 1.5,
        }
    }
}

impl FanLayout {
    pub fn transforms(&self, copies: u32) -> Vec<CopyTransform> {
        let n = copies as f32;
        let mut travelled = 0.0;
        (0..copies)
            .map(|j| {
                let t = j as f32 / n;
                let translation = Vec3::new((self.spread - travelled) / 3.0, travelled / 2.0, 0.0);
                travelled += self.spread * (1.0 - (j + 1) as f32 / n);
                CopyTransform {
                    scale: Vec3::splat(1.0 - t),
                    rotation: Quat::from_rotation_z((self.twist * t).to_radians()),
                    translation,
                }
            })
            .collect()
    }
}

/// Cluster of `copies` shrinking clones of `geom` in the default fan layout.
pub fn minerals(geom: &Mesh, copies: u32) -> Shape {
    minerals_with_layout(geom, copies, &FanLayout::default())
}

pub fn minerals_with_layout(geom: &Mesh, copies: u32, layout: &FanLayout) -> Shape {
    Shape::new(clone_merge(geom, layout.transforms(copies.max(1))))
}
