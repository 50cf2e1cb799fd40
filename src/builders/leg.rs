use glam::{Quat, Vec3};

use super::{CopyTransform, clone_merge};
use crate::geometry::{TubeParams, UpAxis, tube};
use crate::types::Shape;

const LEG_RADIAL_SEGMENTS: u32 = 7;
const LEG_STRANDS: u32 = 2;

/// Zig-zag path of a leg strand: `(-30 i, -40 sin 2i, 0)`.
pub fn leg_path(points: u32) -> Vec<Vec3> {
    (0..points)
        .map(|i| {
            let i = i as f32;
            Vec3::new(-30.0 * i, -40.0 * (2.0 * i).sin(), 0.0)
        })
        .collect()
}

/// Two tube strands along [`leg_path`]; strand `j` is turned `sin j` degrees
/// about `normalize(sin j + 1, sin j + 0.5, 1)`, so the first strand stays put
/// and the second crosses it.
pub fn leg(points: u32, radius: f32) -> Shape {
    let strand = tube(
        &leg_path(points),
        &TubeParams {
            radius,
            radial_segments: LEG_RADIAL_SEGMENTS,
            up: UpAxis::Z,
            closed: false,
        },
    );

    let copies = (0..LEG_STRANDS).map(|j| {
        let s = (j as f32).sin();
        let axis = Vec3::new(s + 1.0, s + 0.5, 1.0).normalize();
        CopyTransform {
            rotation: Quat::from_axis_angle(axis, s.to_radians()),
            ..Default::default()
        }
    });

    Shape::new(clone_merge(&strand, copies))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leg_has_two_strands() {
        let shape = leg(10, 8.0);
        let strand_vertices = 10 * LEG_RADIAL_SEGMENTS as usize;
        let strand_triangles = 9 * LEG_RADIAL_SEGMENTS as usize * 2;
        assert_eq!(shape.mesh.vertex_count(), 2 * strand_vertices);
        assert_eq!(shape.mesh.triangle_count(), 2 * strand_triangles);
        assert!(shape.mesh.validate().is_ok());
    }

    #[test]
    fn first_strand_is_unrotated() {
        let path = leg_path(3);
        let shape = leg(3, 1.0);
        // First ring is centred on the first path point
        let ring: Vec3 = shape.mesh.vertices[..LEG_RADIAL_SEGMENTS as usize]
            .iter()
            .copied()
            .sum::<Vec3>()
            / LEG_RADIAL_SEGMENTS as f32;
        assert!((ring - path[0]).length() < 1e-4);
    }

    #[test]
    fn second_strand_differs() {
        let shape = leg(4, 2.0);
        let half = shape.mesh.vertex_count() / 2;
        let moved = (0..half)
            .filter(|&i| (shape.mesh.vertices[i] - shape.mesh.vertices[i + half]).length() > 1e-3)
            .count();
        assert!(moved > 0);
    }

    #[test]
    fn second_strand_turns_under_a_degree() {
        let points = 6;
        let shape = leg(points, 2.0);
        let half = shape.mesh.vertex_count() / 2;
        let s = 1.0f32.sin();
        let axis = Vec3::new(s + 1.0, s + 0.5, 1.0).normalize();
        let rotation = Quat::from_axis_angle(axis, s.to_radians());
        for i in 0..half {
            let expected = rotation * shape.mesh.vertices[i];
            assert!((shape.mesh.vertices[i + half] - expected).length() < 1e-3);
        }
        // Far end of the leg moves by about 0.84 degrees of arc, not tens of units
        let tip = shape.mesh.vertices[half - 1];
        let moved = (shape.mesh.vertices[2 * half - 1] - tip).length();
        assert!(moved < tip.length() * 0.02, "moved {moved}");
    }

    #[test]
    fn normals_stay_unit_after_rotation() {
        let shape = leg(5, 3.0);
        for n in &shape.mesh.normals {
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }
}
