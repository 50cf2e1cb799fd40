use glam::Vec4;

/// Phong-style surface description handed to the renderer with a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse colour [r, g, b, a].
    pub diffuse: Vec4,
    /// Ambient colour, half the diffuse by default.
    pub ambient: Vec4,
    pub specular: Vec4,
    pub shininess: f32,
}

impl Material {
    /// Material derived from a single base colour: ambient at half the
    /// diffuse intensity, white specular highlight, shininess 128.
    pub fn from_color(color: Vec4) -> Self {
        Self {
            diffuse: color,
            ambient: (color.truncate() * 0.5).extend(color.w),
            specular: Vec4::ONE,
            shininess: 128.0,
        }
    }

    /// Approximate metallic-roughness roughness for exporters.
    pub fn roughness(&self) -> f32 {
        (2.0 / (self.shininess.max(0.0) + 2.0)).sqrt()
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::from_color(Vec4::ONE)
    }
}
