//! Single-tube and lathed creature parts.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::geometry::{TubeParams, UpAxis, lathe, tube};
use crate::types::Shape;

/// Wavy antenna: `num` points along X with `15 sin(i * num)` wiggle in Y.
pub fn antenna(num: u32) -> Shape {
    let path: Vec<Vec3> = (0..num)
        .map(|i| {
            let i = i as f32;
            Vec3::new(20.0 * i, 15.0 * (i * num as f32).sin(), 0.0)
        })
        .collect();

    Shape::new(tube(
        &path,
        &TubeParams {
            radius: 5.0,
            radial_segments: 6,
            up: UpAxis::Z,
            closed: false,
        },
    ))
}

/// Straight 200-unit tentacle hanging down -Y, framed against +Y.
pub fn tentacle_straight() -> Shape {
    let path = [Vec3::ZERO, Vec3::new(0.0, -200.0, 0.0)];
    Shape::new(tube(
        &path,
        &TubeParams {
            radius: 2.0,
            radial_segments: 8,
            up: UpAxis::Y,
            closed: false,
        },
    ))
}

/// Tentacle hanging down -Y that curls outward as it descends.
pub fn tentacle(num: u32) -> Shape {
    let count = num.max(2);
    let path: Vec<Vec3> = (0..count)
        .map(|i| {
            let t = i as f32 / (count - 1) as f32;
            let curl = 1.5 * PI * t * t;
            let reach = 40.0 * t;
            Vec3::new(reach * curl.cos(), -120.0 * t, reach * curl.sin())
        })
        .collect();

    Shape::new(tube(
        &path,
        &TubeParams {
            radius: 4.0,
            radial_segments: 8,
            up: UpAxis::Z,
            closed: false,
        },
    ))
}

/// Lathed petal: a leaf-shaped profile revolved around +Y.
pub fn petal() -> Shape {
    let profile = [
        Vec2::new(0.0, 0.0),
        Vec2::new(8.0, 10.0),
        Vec2::new(14.0, 25.0),
        Vec2::new(10.0, 40.0),
        Vec2::new(0.0, 50.0),
    ];
    Shape::new(lathe(&profile, 12))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn antenna_counts() {
        let shape = antenna(20);
        assert_eq!(shape.mesh.vertex_count(), 20 * 6);
        assert_eq!(shape.mesh.triangle_count(), 19 * 6 * 2);
        assert!(shape.mesh.validate().is_ok());
    }

    #[test]
    fn straight_tentacle_has_finite_geometry() {
        let shape = tentacle_straight();
        assert_eq!(shape.mesh.vertex_count(), 16);
        assert_eq!(shape.mesh.triangle_count(), 16);
        assert!(shape.mesh.validate().is_ok());
    }

    #[test]
    fn tentacle_descends() {
        let shape = tentacle(20);
        let (min, max) = shape.mesh.bounds().unwrap();
        assert!(min.y < -115.0);
        assert!(max.y > -5.0);
        assert!(shape.mesh.validate().is_ok());
    }

    #[test]
    fn petal_is_closed_lathe() {
        let shape = petal();
        assert_eq!(shape.mesh.vertex_count(), 5 * 13);
        assert_eq!(shape.mesh.triangle_count(), 4 * 12 * 2);
        assert!(shape.mesh.validate().is_ok());
    }
}
