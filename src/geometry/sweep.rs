use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use super::{MIN_RADIAL_SEGMENTS, clamp_segments, sanitize_radius};
use crate::types::Mesh;

/// Cross-section frame of one swept ring.
///
/// `(normal, binormal, tangent)` must form a right-handed orthonormal basis,
/// with the tangent pointing towards the next ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingFrame {
    pub center: Vec3,
    pub normal: Vec3,
    pub binormal: Vec3,
}

/// Sweep a circle of `radius` through `frames`, one ring of
/// `radial_segments` vertices per frame.
///
/// Rings are stitched into quads (two triangles each) wound CCW when seen from
/// outside the tube. An open sweep stitches `frames.len() - 1` segments; a
/// closed one also joins the last ring back to the first.
pub fn sweep_rings(frames: &[RingFrame], radius: f32, radial_segments: u32, closed: bool) -> Mesh {
    let segments = clamp_segments("radial_segments", radial_segments, MIN_RADIAL_SEGMENTS);
    let radius = sanitize_radius("radius", radius);
    let ring_count = frames.len();

    let mut mesh = Mesh::with_capacity(ring_count * segments as usize, ring_count * segments as usize * 6);

    for (i, frame) in frames.iter().enumerate() {
        for j in 0..segments {
            let theta = TAU * j as f32 / segments as f32;
            let direction = theta.cos() * frame.normal + theta.sin() * frame.binormal;
            mesh.add_vertex(frame.center + radius * direction);
            mesh.add_normal(direction);
            mesh.add_tex_coord(Vec2::new(
                j as f32 / segments as f32,
                i as f32 / ring_count as f32,
            ));
        }
    }

    let stitched = match (closed, ring_count) {
        (_, 0 | 1) => 0,
        (true, n) if n >= 3 => n,
        (_, n) => n - 1,
    };

    for i in 0..stitched {
        let next = (i + 1) % ring_count;
        for j in 0..segments {
            let next_segment = (j + 1) % segments;
            let current = (i as u32) * segments + j;
            let current_next_segment = (i as u32) * segments + next_segment;
            let next_ring = (next as u32) * segments + j;
            let next_ring_next_segment = (next as u32) * segments + next_segment;

            mesh.add_triangle(current, current_next_segment, next_ring_next_segment);
            mesh.add_triangle(current, next_ring_next_segment, next_ring);
        }
    }

    mesh
}
