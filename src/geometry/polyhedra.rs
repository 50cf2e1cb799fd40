use glam::Vec3;

use crate::types::Mesh;

/// Regular tetrahedron inscribed in the cube `[-size, size]^3`.
///
/// Normals point along each vertex direction (smooth look).
pub fn tetrahedron(size: f32) -> Mesh {
    let corners = [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
    ];
    let faces = [[0, 2, 1], [0, 3, 2], [0, 1, 3], [1, 2, 3]];
    indexed_solid(&corners, &faces, size)
}

/// Regular octahedron with vertices on the axes at distance `size`.
pub fn octahedron(size: f32) -> Mesh {
    let corners = [Vec3::Z, Vec3::X, Vec3::Y, Vec3::NEG_X, Vec3::NEG_Y, Vec3::NEG_Z];
    let faces = [
        [0, 1, 2],
        [0, 2, 3],
        [0, 3, 4],
        [0, 4, 1],
        [5, 2, 1],
        [5, 3, 2],
        [5, 4, 3],
        [5, 1, 4],
    ];
    indexed_solid(&corners, &faces, size)
}

fn indexed_solid(corners: &[Vec3], faces: &[[u32; 3]], size: f32) -> Mesh {
    let mut mesh = Mesh::with_capacity(corners.len(), faces.len() * 3);
    for &corner in corners {
        mesh.add_vertex(corner * size);
        mesh.add_normal(corner.normalize());
    }
    for &[a, b, c] in faces {
        mesh.add_triangle(a, b, c);
    }
    mesh
}
