//! Composite builders: clone a base mesh, bake a per-copy affine transform
//! into each clone and merge the clones into one static mesh.

pub mod creatures;
pub mod leg;
pub mod minerals;

use glam::{Mat3, Mat4, Quat, Vec3};

use crate::types::Mesh;

pub use creatures::{antenna, petal, tentacle, tentacle_straight};
pub use leg::leg;
pub use minerals::{FanLayout, minerals};

/// Placement of one baked copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CopyTransform {
    pub scale: Vec3,
    pub rotation: Quat,
    pub translation: Vec3,
}

impl CopyTransform {
    /// `T * R * S`.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for CopyTransform {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            rotation: Quat::IDENTITY,
            translation: Vec3::ZERO,
        }
    }
}

/// Merge one transformed clone of `geom` per entry of `copies`.
///
/// Positions get the full matrix; normals get the rotation only.
pub fn clone_merge(geom: &Mesh, copies: impl IntoIterator<Item = CopyTransform>) -> Mesh {
    let mut merged = Mesh::default();
    for copy in copies {
        let clone = geom
            .clone()
            .transformed(&copy.matrix(), &Mat3::from_quat(copy.rotation));
        merged.append(&clone);
    }
    merged
}
