use crate::types::Mesh;

/// Stitch a `(columns + 1) x (rows + 1)` vertex grid into triangles.
///
/// The grid starts at vertex `base` and is laid out row by row with the `u`
/// parameter varying fastest. Each quad `(i,j) (i+1,j) (i+1,j+1) (i,j+1)` is
/// split into two triangles whose winding follows `dP/du x dP/dv`, so a
/// parametrisation with that cross product pointing outward yields
/// outward-facing triangles.
pub fn stitch_grid(mesh: &mut Mesh, base: u32, columns: u32, rows: u32) {
    let stride = columns + 1;
    for j in 0..rows {
        for i in 0..columns {
            let a = base + j * stride + i;
            let b = a + 1;
            let d = a + stride;
            let c = d + 1;
            mesh.add_triangle(a, b, c);
            mesh.add_triangle(a, c, d);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn flat_grid_faces_follow_u_cross_v() {
        let (columns, rows) = (3, 2);
        let mut mesh = Mesh::default();
        for j in 0..=rows {
            for i in 0..=columns {
                mesh.add_vertex(Vec3::new(i as f32, j as f32, 0.0));
            }
        }
        stitch_grid(&mut mesh, 0, columns, rows);

        assert_eq!(mesh.triangle_count(), (columns * rows * 2) as usize);
        assert!(mesh.validate().is_ok());
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|k| mesh.vertices[tri[k] as usize]);
            // u = +X, v = +Y, so faces must point along +Z
            assert!((b - a).cross(c - a).z > 0.0);
        }
    }

    #[test]
    fn base_offsets_indices() {
        let mut mesh = Mesh::default();
        stitch_grid(&mut mesh, 10, 1, 1);
        assert_eq!(mesh.indices, vec![10, 11, 13, 10, 13, 12]);
    }
}
