use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use super::{MIN_RADIAL_SEGMENTS, clamp_segments, sanitize_radius};
use crate::types::{DEFAULT_COLOR, Mesh, PrimitiveMode};

/// Flat disk in the XY plane facing +Z, as a non-indexed triangle fan:
/// the centre followed by `resolution + 1` rim vertices (first and last
/// coincide so the fan closes).
pub fn disk(radius: f32, resolution: u32) -> Mesh {
    let radius = sanitize_radius("radius", radius);
    let resolution = clamp_segments("resolution", resolution, MIN_RADIAL_SEGMENTS);

    let mut mesh = Mesh::new(PrimitiveMode::TriangleFan);
    mesh.add_vertex(Vec3::ZERO);
    mesh.add_normal(Vec3::Z);
    mesh.add_tex_coord(Vec2::splat(0.5));
    mesh.add_color(DEFAULT_COLOR);

    for i in 0..=resolution {
        let angle = i as f32 / resolution as f32 * TAU;
        let (sin, cos) = angle.sin_cos();
        mesh.add_vertex(Vec3::new(cos * radius, sin * radius, 0.0));
        mesh.add_normal(Vec3::Z);
        mesh.add_tex_coord(Vec2::new(0.5 + 0.5 * cos, 0.5 + 0.5 * sin));
        mesh.add_color(DEFAULT_COLOR);
    }

    mesh
}
