use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::error::{Result, SonicGeodeError};

/// Colour implied for vertices of a mesh that carries no colour buffer.
pub const DEFAULT_COLOR: Vec4 = Vec4::ONE;

/// How the index buffer (or, when empty, the vertex order) is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveMode {
    #[default]
    Triangles,
    TriangleFan,
}

/// The fundamental geometry container.
///
/// Attribute buffers are index-aligned with `vertices`: when `normals`,
/// `tex_coords` or `colors` are non-empty they hold exactly one entry per
/// vertex. Every generator, builder and the compositor keep that invariant;
/// [`Mesh::validate`] checks it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions, in render order.
    pub vertices: Vec<Vec3>,
    /// Per-vertex normals or empty
    pub normals: Vec<Vec3>,
    /// Per-vertex UVs or empty
    pub tex_coords: Vec<Vec2>,
    /// Per-vertex RGBA colours or empty (implies [`DEFAULT_COLOR`])
    pub colors: Vec<Vec4>,
    /// Triangle indices into the vertex buffers
    pub indices: Vec<u32>,
    pub mode: PrimitiveMode,
}

impl Mesh {
    /// Empty mesh with the given primitive mode.
    pub fn new(mode: PrimitiveMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Empty triangle-list mesh with pre-sized vertex and index buffers.
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            tex_coords: Vec::with_capacity(vertices),
            colors: Vec::new(),
            indices: Vec::with_capacity(indices),
            mode: PrimitiveMode::Triangles,
        }
    }

    pub fn add_vertex(&mut self, p: Vec3) {
        self.vertices.push(p);
    }

    pub fn add_normal(&mut self, n: Vec3) {
        self.normals.push(n);
    }

    pub fn add_tex_coord(&mut self, uv: Vec2) {
        self.tex_coords.push(uv);
    }

    pub fn add_color(&mut self, c: Vec4) {
        self.colors.push(c);
    }

    pub fn add_index(&mut self, i: u32) {
        self.indices.push(i);
    }

    /// Push one triangle.
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Drop all geometry, keeping the primitive mode.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.normals.clear();
        self.tex_coords.clear();
        self.colors.clear();
        self.indices.clear();
    }

    pub fn vertex(&self, i: usize) -> Vec3 {
        self.vertices[i]
    }

    pub fn set_vertex(&mut self, i: usize, p: Vec3) {
        self.vertices[i] = p;
    }

    pub fn normal(&self, i: usize) -> Vec3 {
        self.normals[i]
    }

    pub fn set_normal(&mut self, i: usize, n: Vec3) {
        self.normals[i] = n;
    }

    /// Colour of vertex `i`, falling back to opaque white when no colours are stored.
    pub fn color(&self, i: usize) -> Vec4 {
        self.colors.get(i).copied().unwrap_or(DEFAULT_COLOR)
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of normals.
    pub fn normal_count(&self) -> usize {
        self.normals.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of triangles the mesh rasterises to under its primitive mode.
    pub fn triangle_count(&self) -> usize {
        let elements = if self.indices.is_empty() {
            self.vertices.len()
        } else {
            self.indices.len()
        };
        match self.mode {
            PrimitiveMode::Triangles => elements / 3,
            PrimitiveMode::TriangleFan => elements.saturating_sub(2),
        }
    }

    /// Whether normals are present.
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    /// Whether UV coordinates are present.
    pub fn has_tex_coords(&self) -> bool {
        !self.tex_coords.is_empty()
    }

    /// Whether vertex colours are present.
    pub fn has_colors(&self) -> bool {
        !self.colors.is_empty()
    }

    /// Whether the mesh contains no geometry.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Replace the colour buffer with one colour for every vertex.
    pub fn fill_color(&mut self, color: Vec4) {
        self.colors.clear();
        self.colors.resize(self.vertices.len(), color);
    }

    /// Equivalent triangle-list mesh. Fans are expanded around their first element.
    pub fn to_triangle_list(&self) -> Mesh {
        if self.mode == PrimitiveMode::Triangles {
            return self.clone();
        }

        let order: Vec<u32> = if self.indices.is_empty() {
            (0..self.vertices.len() as u32).collect()
        } else {
            self.indices.clone()
        };

        let mut indices = Vec::with_capacity(order.len().saturating_sub(2) * 3);
        for pair in order.windows(2).skip(1) {
            indices.extend_from_slice(&[order[0], pair[0], pair[1]]);
        }

        Mesh {
            vertices: self.vertices.clone(),
            normals: self.normals.clone(),
            tex_coords: self.tex_coords.clone(),
            colors: self.colors.clone(),
            indices,
            mode: PrimitiveMode::Triangles,
        }
    }

    /// Merge `other` into `self`.
    ///
    /// Incoming indices are offset by the current vertex count. Attribute
    /// buffers present on only one side are padded (zero normals, zero UVs,
    /// white colours) so they stay index-aligned. Fans are converted to
    /// triangle lists before merging.
    pub fn append(&mut self, other: &Mesh) {
        if other.mode == PrimitiveMode::TriangleFan {
            self.append(&other.to_triangle_list());
            return;
        }
        if self.mode == PrimitiveMode::TriangleFan {
            if self.is_empty() {
                self.mode = PrimitiveMode::Triangles;
            } else {
                *self = self.to_triangle_list();
            }
        }
        if other.is_empty() {
            return;
        }

        let base = self.vertices.len();
        let incoming = other.vertices.len();

        let self_indexed = !self.indices.is_empty() || self.is_empty();
        let other_indexed = !other.indices.is_empty();
        if self_indexed || other_indexed {
            if !self_indexed {
                self.indices = (0..base as u32).collect();
            }
            let offset = base as u32;
            if other_indexed {
                self.indices.extend(other.indices.iter().map(|&i| i + offset));
            } else {
                self.indices.extend((0..incoming as u32).map(|i| i + offset));
            }
        }

        self.vertices.extend_from_slice(&other.vertices);
        merge_attribute(&mut self.normals, base, &other.normals, incoming, Vec3::ZERO);
        merge_attribute(&mut self.tex_coords, base, &other.tex_coords, incoming, Vec2::ZERO);
        merge_attribute(&mut self.colors, base, &other.colors, incoming, DEFAULT_COLOR);

        debug_assert!(
            self.indices.iter().all(|&i| (i as usize) < self.vertices.len()),
            "append produced an out-of-range index"
        );
    }

    /// Apply an affine matrix to every vertex position in place.
    pub fn transform_positions(&mut self, matrix: &Mat4) {
        for v in self.vertices.iter_mut() {
            *v = matrix.transform_point3(*v);
        }
    }

    /// Rotate every normal in place (no translation, no scale).
    pub fn rotate_normals(&mut self, rotation: &Mat3) {
        for n in self.normals.iter_mut() {
            *n = *rotation * *n;
        }
    }

    /// Transform normals by the inverse-transpose of `matrix` and renormalise,
    /// which keeps them perpendicular to surfaces under non-uniform scale.
    pub fn recompute_normals_for(&mut self, matrix: &Mat4) {
        let normal_matrix = Mat3::from_mat4(*matrix).inverse().transpose();
        if !normal_matrix.is_finite() {
            return;
        }
        for n in self.normals.iter_mut() {
            *n = (normal_matrix * *n).normalize_or_zero();
        }
    }

    /// By-value bulk transform: positions by `matrix`, normals by `rotation`.
    pub fn transformed(mut self, matrix: &Mat4, rotation: &Mat3) -> Mesh {
        self.transform_positions(matrix);
        self.rotate_normals(rotation);
        self
    }

    /// Axis-aligned bounds of the vertex positions, or `None` when empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(min, max), &v| (min.min(v), max.max(v))),
        )
    }

    /// Check the structural invariants: index range, triangle-list length and
    /// attribute alignment.
    pub fn validate(&self) -> Result<()> {
        let n = self.vertices.len();

        if let Some(bad) = self.indices.iter().find(|&&i| i as usize >= n) {
            return Err(SonicGeodeError::Validation(format!(
                "index {bad} out of range for {n} vertices"
            )));
        }
        if self.mode == PrimitiveMode::Triangles && self.indices.len() % 3 != 0 {
            return Err(SonicGeodeError::Validation(format!(
                "triangle list has {} indices (not a multiple of 3)",
                self.indices.len()
            )));
        }

        let attributes = [
            ("normals", self.normals.len()),
            ("tex_coords", self.tex_coords.len()),
            ("colors", self.colors.len()),
        ];
        for (name, len) in attributes {
            if len != 0 && len != n {
                return Err(SonicGeodeError::Validation(format!(
                    "{name} has {len} entries for {n} vertices"
                )));
            }
        }

        if self.vertices.iter().any(|v| !v.is_finite())
            || self.normals.iter().any(|v| !v.is_finite())
        {
            return Err(SonicGeodeError::Validation(
                "non-finite position or normal".into(),
            ));
        }

        Ok(())
    }
}

fn merge_attribute<T: Copy>(dst: &mut Vec<T>, base: usize, src: &[T], incoming: usize, fill: T) {
    if dst.is_empty() && src.is_empty() {
        return;
    }
    debug_assert!(src.is_empty() || src.len() == incoming);
    dst.resize(base, fill);
    if src.is_empty() {
        dst.resize(base + incoming, fill);
    } else {
        dst.extend_from_slice(src);
    }
}
