use glam::Vec3;

use super::sweep::{RingFrame, sweep_rings};
use crate::types::Mesh;

const PARALLEL_EPSILON: f32 = 1e-6;

/// Fixed world axis the tube frames are built against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpAxis {
    Y,
    #[default]
    Z,
}

impl UpAxis {
    pub fn vector(self) -> Vec3 {
        match self {
            UpAxis::Y => Vec3::Y,
            UpAxis::Z => Vec3::Z,
        }
    }
}

/// Tube cross-section parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeParams {
    pub radius: f32,
    pub radial_segments: u32,
    pub up: UpAxis,
    /// Join the last point back to the first.
    pub closed: bool,
}

impl Default for TubeParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            radial_segments: 8,
            up: UpAxis::Z,
            closed: false,
        }
    }
}

/// Sweep a circular cross-section along `points`.
///
/// Produces `points.len() * radial_segments` vertices and
/// `2 * radial_segments` triangles per stitched segment.
pub fn tube(points: &[Vec3], params: &TubeParams) -> Mesh {
    let frames = tube_frames(points, params.up.vector(), params.closed);
    sweep_rings(&frames, params.radius, params.radial_segments, params.closed)
}

/// One frame per polyline point.
///
/// The tangent at a point is the direction to the next point. The last point
/// of an open line reuses the previous tangent; a closed line wraps to the
/// first point. Coincident points inherit the nearest valid tangent.
pub fn tube_frames(points: &[Vec3], up: Vec3, closed: bool) -> Vec<RingFrame> {
    tangents(points, closed)
        .into_iter()
        .zip(points)
        .map(|(tangent, &center)| {
            let (normal, binormal) = frame_from_tangent(tangent, up);
            RingFrame {
                center,
                normal,
                binormal,
            }
        })
        .collect()
}

/// Perpendicular pair `(normal, binormal)` for `tangent`:
/// `normal = tangent × up`, `binormal = tangent × normal`.
///
/// When the tangent is parallel to `up` the world axis least aligned with the
/// tangent stands in for it.
pub fn frame_from_tangent(tangent: Vec3, up: Vec3) -> (Vec3, Vec3) {
    let mut normal = tangent.cross(up);
    if normal.length_squared() < PARALLEL_EPSILON {
        normal = tangent.cross(least_aligned_axis(tangent));
    }
    let normal = normal.normalize();
    let binormal = tangent.cross(normal).normalize();
    (normal, binormal)
}

fn least_aligned_axis(v: Vec3) -> Vec3 {
    let a = v.abs();
    if a.x <= a.y && a.x <= a.z {
        Vec3::X
    } else if a.y <= a.z {
        Vec3::Y
    } else {
        Vec3::Z
    }
}

fn tangents(points: &[Vec3], closed: bool) -> Vec<Vec3> {
    let n = points.len();
    let mut raw: Vec<Option<Vec3>> = (0..n)
        .map(|i| {
            let next = if i + 1 < n {
                points[i + 1]
            } else if closed {
                points[0]
            } else {
                return None;
            };
            (next - points[i]).try_normalize()
        })
        .collect();

    // Forward fill (covers the open end and repeated points), then back fill
    // any leading gaps.
    let mut last = None;
    for t in raw.iter_mut() {
        match t {
            Some(v) => last = Some(*v),
            None => *t = last,
        }
    }
    let mut next = None;
    for t in raw.iter_mut().rev() {
        match t {
            Some(v) => next = Some(*v),
            None => *t = next,
        }
    }

    raw.into_iter().map(|t| t.unwrap_or(Vec3::X)).collect()
}
