//! Primitive generators: pure functions from numeric parameters to a [`Mesh`].
//!
//! All generators emit CCW-wound triangles (viewed from the outward normal
//! side) and, where they emit normals, exactly one normal per vertex.
//! Degenerate parameters are clamped rather than rejected.
//!
//! [`Mesh`]: crate::types::Mesh

pub mod disk;
pub mod grid;
pub mod polyhedra;
pub mod solids;
pub mod sweep;
pub mod tube;

use tracing::warn;

pub use disk::disk;
pub use polyhedra::{octahedron, tetrahedron};
pub use solids::{
    CylinderParams, TorusKnotParams, TorusParams, cuboid, cylinder, lathe, sphere, torus,
    torus_knot,
};
pub use sweep::{RingFrame, sweep_rings};
pub use tube::{TubeParams, UpAxis, tube};

/// Fewest segments that still close a ring around an axis.
pub const MIN_RADIAL_SEGMENTS: u32 = 3;

/// Raise `value` to `min`, logging when a clamp happens.
pub(crate) fn clamp_segments(param: &'static str, value: u32, min: u32) -> u32 {
    if value < min {
        warn!(param, value, min, "Segment count below minimum, clamping");
        min
    } else {
        value
    }
}

/// Negative radii are treated as their magnitude; non-finite ones as zero.
pub(crate) fn sanitize_radius(param: &'static str, value: f32) -> f32 {
    if !value.is_finite() {
        warn!(param, "Non-finite radius, using 0");
        return 0.0;
    }
    if value < 0.0 {
        warn!(param, value, "Negative radius, using magnitude");
    }
    value.abs()
}
