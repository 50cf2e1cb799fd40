use glam::{Mat3, Mat4, Quat, Vec3, Vec4};

use super::material::Material;
use super::mesh::Mesh;

/// A mesh together with its placement and optional material.
///
/// Transform fields are only stored; [`Shape::model_matrix`] composes them
/// as scale, then rotation (X, then Y, then Z about the local axes), then
/// translation. [`Shape::bake`] writes that transform into a copy of the mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub mesh: Mesh,
    pub position: Vec3,
    /// Euler angles in radians.
    pub rotation: Vec3,
    pub scale: Vec3,
    pub material: Option<Material>,
}

impl Shape {
    pub fn new(mesh: Mesh) -> Self {
        Self {
            mesh,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            material: None,
        }
    }

    pub fn apply_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    pub fn apply_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
    }

    pub fn apply_translation(&mut self, translation: Vec3) {
        self.position = translation;
    }

    pub fn set_material_color(&mut self, color: Vec4) {
        self.material = Some(Material::from_color(color));
    }

    /// Rotation part of the model matrix.
    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_z(self.rotation.z)
            * Quat::from_rotation_y(self.rotation.y)
            * Quat::from_rotation_x(self.rotation.x)
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation(), self.position)
    }

    /// Copy of the mesh with the shape's transform applied to positions and
    /// its rotation applied to normals.
    pub fn bake(&self) -> Mesh {
        self.mesh
            .clone()
            .transformed(&self.model_matrix(), &Mat3::from_quat(self.orientation()))
    }
}

impl From<Mesh> for Shape {
    fn from(mesh: Mesh) -> Self {
        Shape::new(mesh)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn unit_point() -> Mesh {
        Mesh {
            vertices: vec![Vec3::X],
            normals: vec![Vec3::X],
            ..Default::default()
        }
    }

    #[test]
    fn new_shape_has_identity_transform() {
        let shape = Shape::new(unit_point());
        assert_eq!(shape.scale, Vec3::ONE);
        assert_eq!(shape.model_matrix(), Mat4::IDENTITY);
        assert!(shape.material.is_none());
    }

    #[test]
    fn apply_methods_only_store_fields() {
        let mut shape = Shape::new(unit_point());
        shape.apply_scale(Vec3::splat(2.0));
        shape.apply_rotation(Vec3::new(0.0, 0.0, FRAC_PI_2));
        shape.apply_translation(Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(shape.mesh.vertices[0], Vec3::X);
        assert_eq!(shape.position, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn bake_scales_then_rotates_then_translates() {
        let mut shape = Shape::new(unit_point());
        shape.apply_scale(Vec3::splat(2.0));
        shape.apply_rotation(Vec3::new(0.0, 0.0, FRAC_PI_2));
        shape.apply_translation(Vec3::new(0.0, 0.0, 5.0));

        let baked = shape.bake();
        // (1,0,0) -> scale (2,0,0) -> rotZ (0,2,0) -> translate (0,2,5)
        assert!((baked.vertices[0] - Vec3::new(0.0, 2.0, 5.0)).length() < 1e-5);
        assert!((baked.normals[0] - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn rotation_applies_x_before_z() {
        let mut shape = Shape::new(Mesh {
            vertices: vec![Vec3::Y],
            ..Default::default()
        });
        shape.apply_rotation(Vec3::new(FRAC_PI_2, 0.0, FRAC_PI_2));
        // Y -> rotX -> Z, then rotZ leaves Z untouched
        let baked = shape.bake();
        assert!((baked.vertices[0] - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn material_color_sets_phong_triple() {
        let mut shape = Shape::new(Mesh::default());
        shape.set_material_color(Vec4::new(1.0, 0.0, 0.0, 1.0));
        let mat = shape.material.unwrap();
        assert_eq!(mat.diffuse, Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(mat.specular, Vec4::ONE);
    }
}
