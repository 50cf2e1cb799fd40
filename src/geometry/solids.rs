//! Revolved and parametric solids.
//!
//! Axis conventions: torus and torus knot lie in the XY plane around +Z;
//! cylinders, cones, spheres and lathes revolve around +Y.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Vec2, Vec3};

use super::grid::stitch_grid;
use super::sweep::{RingFrame, sweep_rings};
use super::tube::frame_from_tangent;
use super::{MIN_RADIAL_SEGMENTS, clamp_segments, sanitize_radius};
use crate::types::Mesh;

/// Torus parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusParams {
    /// Distance from the centre to the middle of the tube.
    pub major_radius: f32,
    /// Tube radius.
    pub minor_radius: f32,
    /// Segments around the tube cross-section.
    pub radial_segments: u32,
    /// Segments around the ring.
    pub tubular_segments: u32,
}

impl Default for TorusParams {
    fn default() -> Self {
        Self {
            major_radius: 20.0,
            minor_radius: 5.0,
            radial_segments: 12,
            tubular_segments: 32,
        }
    }
}

/// Torus knot parameters: the curve winds `p` times around the Z axis and
/// `q` times through the hole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusKnotParams {
    pub radius: f32,
    pub tube: f32,
    pub tubular_segments: u32,
    pub radial_segments: u32,
    pub p: u32,
    pub q: u32,
}

impl Default for TorusKnotParams {
    fn default() -> Self {
        Self {
            radius: 20.0,
            tube: 3.0,
            tubular_segments: 96,
            radial_segments: 8,
            p: 2,
            q: 3,
        }
    }
}

/// Cylinder or cone along +Y, centred at the origin.
///
/// Either radius may be zero, which collapses that end into an apex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderParams {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub radial_segments: u32,
    pub height_segments: u32,
    pub capped: bool,
}

impl CylinderParams {
    /// Straight cylinder.
    pub fn cylinder(radius: f32, height: f32, radial_segments: u32, height_segments: u32) -> Self {
        Self {
            radius_top: radius,
            radius_bottom: radius,
            height,
            radial_segments,
            height_segments,
            capped: true,
        }
    }

    /// Cone with its apex at the top.
    pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Self {
        Self {
            radius_top: 0.0,
            radius_bottom: radius,
            height,
            radial_segments,
            height_segments: 1,
            capped: true,
        }
    }
}

pub fn torus(params: &TorusParams) -> Mesh {
    let major = sanitize_radius("major_radius", params.major_radius);
    let minor = sanitize_radius("minor_radius", params.minor_radius);
    let radial = clamp_segments("radial_segments", params.radial_segments, MIN_RADIAL_SEGMENTS);
    let tubular = clamp_segments("tubular_segments", params.tubular_segments, MIN_RADIAL_SEGMENTS);

    let verts = ((radial + 1) * (tubular + 1)) as usize;
    let mut mesh = Mesh::with_capacity(verts, (radial * tubular * 6) as usize);

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let normal = Vec3::new(v.cos() * u.cos(), v.cos() * u.sin(), v.sin());
            let ring_center = Vec3::new(major * u.cos(), major * u.sin(), 0.0);
            mesh.add_vertex(ring_center + minor * normal);
            mesh.add_normal(normal);
            mesh.add_tex_coord(Vec2::new(
                i as f32 / tubular as f32,
                j as f32 / radial as f32,
            ));
        }
    }

    stitch_grid(&mut mesh, 0, tubular, radial);
    mesh
}

/// Point on the torus-knot curve at parameter `u`.
fn knot_point(u: f32, p: f32, q: f32, radius: f32) -> Vec3 {
    let qu_over_p = q / p * u;
    let cs = qu_over_p.cos();
    Vec3::new(
        radius * (2.0 + cs) * 0.5 * u.cos(),
        radius * (2.0 + cs) * 0.5 * u.sin(),
        radius * qu_over_p.sin() * 0.5,
    )
}

/// Closed tube swept along a `(p, q)` torus knot.
pub fn torus_knot(params: &TorusKnotParams) -> Mesh {
    let radius = sanitize_radius("radius", params.radius);
    let tubular = clamp_segments("tubular_segments", params.tubular_segments, MIN_RADIAL_SEGMENTS);
    let p = params.p.max(1) as f32;
    let q = params.q as f32;

    let frames: Vec<RingFrame> = (0..tubular)
        .map(|i| {
            let u = i as f32 / tubular as f32 * p * TAU;
            let p1 = knot_point(u, p, q, radius);
            let p2 = knot_point(u + 0.01, p, q, radius);

            let tangent = (p2 - p1).normalize_or(Vec3::X);
            let binormal = tangent.cross(p2 + p1);
            let (normal, binormal) = match binormal.try_normalize() {
                Some(b) => (b.cross(tangent).normalize(), b),
                None => frame_from_tangent(tangent, Vec3::Z),
            };

            RingFrame {
                center: p1,
                normal,
                binormal,
            }
        })
        .collect();

    sweep_rings(&frames, params.tube, params.radial_segments, true)
}

pub fn cylinder(params: &CylinderParams) -> Mesh {
    let top = sanitize_radius("radius_top", params.radius_top);
    let bottom = sanitize_radius("radius_bottom", params.radius_bottom);
    let radial = clamp_segments("radial_segments", params.radial_segments, MIN_RADIAL_SEGMENTS);
    let rows = params.height_segments.max(1);
    let height = params.height;
    let half = height * 0.5;
    let slope = top - bottom;

    let mut mesh = Mesh::default();

    for j in 0..=rows {
        let v = j as f32 / rows as f32;
        let r = bottom + slope * v;
        let y = -half + v * height;
        for i in 0..=radial {
            let u = i as f32 / radial as f32 * TAU;
            let (sin, cos) = u.sin_cos();
            mesh.add_vertex(Vec3::new(r * sin, y, r * cos));
            mesh.add_normal(Vec3::new(height * sin, -slope, height * cos).normalize_or(Vec3::Y));
            mesh.add_tex_coord(Vec2::new(i as f32 / radial as f32, v));
        }
    }
    stitch_grid(&mut mesh, 0, radial, rows);

    if params.capped {
        if top > 0.0 {
            add_cap(&mut mesh, top, half, radial, true);
        }
        if bottom > 0.0 {
            add_cap(&mut mesh, bottom, -half, radial, false);
        }
    }

    mesh
}

fn add_cap(mesh: &mut Mesh, radius: f32, y: f32, radial: u32, top: bool) {
    let normal = if top { Vec3::Y } else { Vec3::NEG_Y };
    let center = mesh.vertex_count() as u32;

    mesh.add_vertex(Vec3::new(0.0, y, 0.0));
    mesh.add_normal(normal);
    mesh.add_tex_coord(Vec2::splat(0.5));

    for i in 0..=radial {
        let u = i as f32 / radial as f32 * TAU;
        let (sin, cos) = u.sin_cos();
        mesh.add_vertex(Vec3::new(radius * sin, y, radius * cos));
        mesh.add_normal(normal);
        mesh.add_tex_coord(Vec2::new(0.5 + 0.5 * sin, 0.5 + 0.5 * cos));
    }

    for i in 0..radial {
        let a = center + 1 + i;
        if top {
            mesh.add_triangle(center, a, a + 1);
        } else {
            mesh.add_triangle(center, a + 1, a);
        }
    }
}

/// UV sphere with `resolution` latitude bands and twice as many longitude
/// segments.
pub fn sphere(radius: f32, resolution: u32) -> Mesh {
    let radius = sanitize_radius("radius", radius);
    let rows = clamp_segments("resolution", resolution, 2);
    let columns = rows * 2;

    let mut mesh = Mesh::default();
    for j in 0..=rows {
        let phi = -FRAC_PI_2 + j as f32 / rows as f32 * PI;
        let ring = phi.cos();
        for i in 0..=columns {
            let u = i as f32 / columns as f32 * TAU;
            let direction = Vec3::new(ring * u.sin(), phi.sin(), ring * u.cos());
            mesh.add_vertex(radius * direction);
            mesh.add_normal(direction.normalize_or(Vec3::Y));
            mesh.add_tex_coord(Vec2::new(
                i as f32 / columns as f32,
                j as f32 / rows as f32,
            ));
        }
    }
    stitch_grid(&mut mesh, 0, columns, rows);
    mesh
}

/// Revolve a profile of `(radius, height)` points around +Y.
///
/// Normals come from the profile tangent (central differences inside, one
/// sided at the ends). Profiles with fewer than two points yield an empty mesh.
pub fn lathe(profile: &[Vec2], segments: u32) -> Mesh {
    let segments = clamp_segments("segments", segments, MIN_RADIAL_SEGMENTS);
    let mut mesh = Mesh::default();
    if profile.len() < 2 {
        return mesh;
    }
    let last = profile.len() - 1;

    for (j, point) in profile.iter().enumerate() {
        let d = profile[(j + 1).min(last)] - profile[j.saturating_sub(1)];
        let n2 = Vec2::new(d.y, -d.x).normalize_or(Vec2::X);
        for i in 0..=segments {
            let u = i as f32 / segments as f32 * TAU;
            let (sin, cos) = u.sin_cos();
            mesh.add_vertex(Vec3::new(point.x * sin, point.y, point.x * cos));
            mesh.add_normal(Vec3::new(n2.x * sin, n2.y, n2.x * cos));
            mesh.add_tex_coord(Vec2::new(i as f32 / segments as f32, j as f32 / last as f32));
        }
    }
    stitch_grid(&mut mesh, 0, segments, last as u32);
    mesh
}

/// Axis-aligned box with flat-shaded faces (4 vertices per face).
pub fn cuboid(width: f32, height: f32, depth: f32) -> Mesh {
    let half = Vec3::new(width.abs(), height.abs(), depth.abs()) * 0.5;
    // (outward normal, u, v) with u x v = normal
    let faces = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];
    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut mesh = Mesh::with_capacity(24, 36);
    for (normal, u, v) in faces {
        let base = mesh.vertex_count() as u32;
        for (su, sv) in corners {
            mesh.add_vertex((normal + su * u + sv * v) * half);
            mesh.add_normal(normal);
            mesh.add_tex_coord(Vec2::new((su + 1.0) * 0.5, (sv + 1.0) * 0.5));
        }
        mesh.add_triangle(base, base + 1, base + 2);
        mesh.add_triangle(base, base + 2, base + 3);
    }
    mesh
}
