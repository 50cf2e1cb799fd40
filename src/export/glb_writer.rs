use std::borrow::Cow;
use std::collections::BTreeMap;

use gltf::binary::Glb;
use gltf_json::Index;
use gltf_json::accessor::{ComponentType, GenericComponentType, Type as AccessorType};
use gltf_json::buffer::Target;
use gltf_json::mesh::{Mode, Primitive, Semantic};
use gltf_json::validation::{Checked, USize64};

use crate::error::{Result, SonicGeodeError};
use crate::types::{Material, Mesh, PrimitiveMode};

const GENERATOR: &str = "sonic-geode";
const MESHOPT: &str = "EXT_meshopt_compression";

/// Serialize a [`Mesh`] into a binary GLB (glTF 2.0) byte buffer.
///
/// Produces a self-contained GLB with one buffer, one mesh with one
/// primitive, one node and one scene. Normals, UVs and colours are written
/// when present; colours are stored as normalized u8. Indexed meshes use u16
/// indices when every vertex fits, u32 otherwise. Non-indexed meshes get no
/// index accessor. Triangle fans keep glTF mode `TRIANGLE_FAN`.
pub fn write_glb(mesh: &Mesh, material: Option<&Material>) -> Result<Vec<u8>> {
    write_glb_impl(mesh, material, false)
}

/// Same as [`write_glb`] with `EXT_meshopt_compression` applied to the vertex
/// attributes and (for indexed triangle lists) the index buffer.
///
/// Encoded streams live in the binary chunk. The views themselves describe
/// the decoded data and point into a second, data-less buffer marked as the
/// extension's fallback.
pub fn write_glb_compressed(mesh: &Mesh, material: Option<&Material>) -> Result<Vec<u8>> {
    write_glb_impl(mesh, material, true)
}

fn write_glb_impl(mesh: &Mesh, material: Option<&Material>, compress: bool) -> Result<Vec<u8>> {
    mesh.validate()?;
    if mesh.is_empty() {
        return write_empty_glb();
    }

    let mut root = new_root();
    let mut bin = BinWriter::default();
    let mut attributes = BTreeMap::new();
    let count = mesh.vertex_count();

    // --- Positions (required) ---
    let (min, max) = mesh.bounds().unwrap_or_default();
    let positions: &[[f32; 3]] = bytemuck::cast_slice(&mesh.vertices);
    let view = write_vertex_attribute_view(
        &mut root,
        &mut bin,
        bytemuck::cast_slice(positions),
        12,
        count,
        compress.then(|| encode_vertices(positions)).flatten(),
    );
    let accessor = push_accessor(
        &mut root,
        view,
        count,
        ComponentType::F32,
        AccessorType::Vec3,
        Some((min.to_array(), max.to_array())),
        false,
    );
    attributes.insert(Checked::Valid(Semantic::Positions), accessor);

    // --- Normals ---
    if mesh.has_normals() {
        let normals: &[[f32; 3]] = bytemuck::cast_slice(&mesh.normals);
        let view = write_vertex_attribute_view(
            &mut root,
            &mut bin,
            bytemuck::cast_slice(normals),
            12,
            count,
            compress.then(|| encode_vertices(normals)).flatten(),
        );
        let accessor = push_accessor(
            &mut root,
            view,
            count,
            ComponentType::F32,
            AccessorType::Vec3,
            None,
            false,
        );
        attributes.insert(Checked::Valid(Semantic::Normals), accessor);
    }

    // --- UVs ---
    if mesh.has_tex_coords() {
        let uvs: &[[f32; 2]] = bytemuck::cast_slice(&mesh.tex_coords);
        let view = write_vertex_attribute_view(
            &mut root,
            &mut bin,
            bytemuck::cast_slice(uvs),
            8,
            count,
            compress.then(|| encode_vertices(uvs)).flatten(),
        );
        let accessor = push_accessor(
            &mut root,
            view,
            count,
            ComponentType::F32,
            AccessorType::Vec2,
            None,
            false,
        );
        attributes.insert(Checked::Valid(Semantic::TexCoords(0)), accessor);
    }

    // --- Colors (u8 normalized) ---
    if mesh.has_colors() {
        let colors: Vec<[u8; 4]> = mesh
            .colors
            .iter()
            .map(|c| {
                (*c * 255.0)
                    .round()
                    .clamp(glam::Vec4::ZERO, glam::Vec4::splat(255.0))
                    .to_array()
                    .map(|x| x as u8)
            })
            .collect();
        let view = write_vertex_attribute_view(
            &mut root,
            &mut bin,
            bytemuck::cast_slice(&colors),
            4,
            count,
            compress.then(|| encode_vertices(&colors)).flatten(),
        );
        let accessor = push_accessor(
            &mut root,
            view,
            count,
            ComponentType::U8,
            AccessorType::Vec4,
            None,
            true,
        );
        attributes.insert(Checked::Valid(Semantic::Colors(0)), accessor);
    }

    // --- Indices ---
    let mode = match mesh.mode {
        PrimitiveMode::Triangles => Mode::Triangles,
        PrimitiveMode::TriangleFan => Mode::TriangleFan,
    };
    let indices = if mesh.indices.is_empty() {
        None
    } else {
        let use_u16 = count <= u16::MAX as usize;
        let encoded = if compress && mesh.mode == PrimitiveMode::Triangles {
            meshopt::encode_index_buffer(&mesh.indices, count).ok()
        } else {
            None
        };
        let view = write_index_view(&mut root, &mut bin, &mesh.indices, use_u16, encoded);
        let component = if use_u16 { ComponentType::U16 } else { ComponentType::U32 };
        Some(push_accessor(
            &mut root,
            view,
            mesh.indices.len(),
            component,
            AccessorType::Scalar,
            None,
            false,
        ))
    };

    let material = material.map(|m| build_material(&mut root, m));

    let primitive = Primitive {
        attributes,
        indices,
        material,
        mode: Checked::Valid(mode),
        targets: None,
        extensions: Default::default(),
        extras: Default::default(),
    };
    let mesh_idx = root.push(gltf_json::Mesh {
        primitives: vec![primitive],
        weights: None,
        name: Some("aggregate".into()),
        extensions: Default::default(),
        extras: Default::default(),
    });
    let node_idx = root.push(gltf_json::Node {
        mesh: Some(mesh_idx),
        ..Default::default()
    });
    push_scene(&mut root, node_idx);

    pad_to_four(&mut bin.data, 0);
    root.push(gltf_json::Buffer {
        byte_length: USize64::from(bin.data.len()),
        uri: None,
        name: None,
        extensions: Default::default(),
        extras: Default::default(),
    });

    // Compressed views point into a data-less fallback buffer sized for the
    // decoded bytes; the extension on each view locates the encoded stream.
    if bin.fallback_len > 0 {
        root.extensions_used.push(MESHOPT.to_string());
        root.extensions_required.push(MESHOPT.to_string());

        let mut others = serde_json::Map::new();
        others.insert(MESHOPT.into(), serde_json::json!({ "fallback": true }));
        root.push(gltf_json::Buffer {
            byte_length: USize64::from(bin.fallback_len),
            uri: None,
            name: None,
            extensions: Some(gltf_json::extensions::buffer::Buffer { others }),
            extras: Default::default(),
        });
    }

    assemble(&root, Some(bin.data))
}

/// Binary chunk being built plus the decoded size claimed by compressed views.
#[derive(Default)]
struct BinWriter {
    data: Vec<u8>,
    fallback_len: usize,
}

impl BinWriter {
    const DATA: usize = 0;
    const FALLBACK: usize = 1;

    /// Append `bytes` at a four-byte aligned offset and return that offset.
    fn push(&mut self, bytes: &[u8]) -> usize {
        pad_to_four(&mut self.data, 0);
        let offset = self.data.len();
        self.data.extend_from_slice(bytes);
        offset
    }

    /// Reserve `len` decoded bytes in the fallback buffer.
    fn reserve_fallback(&mut self, len: usize) -> usize {
        let offset = self.fallback_len;
        self.fallback_len += len.next_multiple_of(4);
        offset
    }

    /// Plain view over `bytes` in the binary chunk.
    fn plain_view(&mut self, bytes: &[u8], target: Target) -> gltf_json::buffer::View {
        let offset = self.push(bytes);
        buffer_view(Self::DATA, offset, bytes.len(), Some(target), None)
    }

    /// View of `count * stride` decoded bytes backed by the meshopt stream
    /// `encoded`.
    fn compressed_view(
        &mut self,
        encoded: &[u8],
        stride: usize,
        count: usize,
        mode: &str,
    ) -> gltf_json::buffer::View {
        let encoded_offset = self.push(encoded);
        let decoded_len = count * stride;
        let offset = self.reserve_fallback(decoded_len);
        let ext = meshopt_view_extension(encoded_offset, encoded.len(), stride, count, mode);
        buffer_view(Self::FALLBACK, offset, decoded_len, None, Some(ext))
    }
}

fn buffer_view(
    buffer: usize,
    byte_offset: usize,
    byte_length: usize,
    target: Option<Target>,
    extensions: Option<gltf_json::extensions::buffer::View>,
) -> gltf_json::buffer::View {
    gltf_json::buffer::View {
        buffer: Index::new(buffer as u32),
        byte_length: USize64::from(byte_length),
        byte_offset: Some(USize64::from(byte_offset)),
        byte_stride: None,
        name: None,
        target: target.map(Checked::Valid),
        extensions,
        extras: Default::default(),
    }
}

fn new_root() -> gltf_json::Root {
    gltf_json::Root {
        asset: gltf_json::Asset {
            version: "2.0".into(),
            generator: Some(GENERATOR.into()),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn push_scene(root: &mut gltf_json::Root, node: Index<gltf_json::Node>) {
    let scene_idx = root.push(gltf_json::Scene {
        nodes: vec![node],
        name: None,
        extensions: Default::default(),
        extras: Default::default(),
    });
    root.scene = Some(scene_idx);
}

fn pad_to_four(bytes: &mut Vec<u8>, fill: u8) {
    while bytes.len() % 4 != 0 {
        bytes.push(fill);
    }
}

/// Serialize the JSON chunk and wrap it, with the optional binary chunk, in
/// a GLB container.
fn assemble(root: &gltf_json::Root, bin: Option<Vec<u8>>) -> Result<Vec<u8>> {
    let json_string = gltf_json::serialize::to_string(root)
        .map_err(|e| SonicGeodeError::Output(format!("glTF JSON serialization: {e}")))?;
    let mut json_bytes = json_string.into_bytes();
    pad_to_four(&mut json_bytes, b' ');

    let bin_chunk = bin.as_ref().map_or(0, |b| 8 + b.len());
    let glb = Glb {
        header: gltf::binary::Header {
            magic: *b"glTF",
            version: 2,
            length: (12 + 8 + json_bytes.len() + bin_chunk) as u32,
        },
        json: Cow::Owned(json_bytes),
        bin: bin.map(Cow::Owned),
    };

    glb.to_vec()
        .map_err(|e| SonicGeodeError::Output(format!("GLB serialization: {e}")))
}

fn push_accessor(
    root: &mut gltf_json::Root,
    view: Index<gltf_json::buffer::View>,
    count: usize,
    component: ComponentType,
    type_: AccessorType,
    bounds: Option<([f32; 3], [f32; 3])>,
    normalized: bool,
) -> Index<gltf_json::Accessor> {
    root.push(gltf_json::Accessor {
        buffer_view: Some(view),
        byte_offset: Some(USize64(0)),
        count: USize64::from(count),
        component_type: Checked::Valid(GenericComponentType(component)),
        type_: Checked::Valid(type_),
        min: bounds.map(|(min, _)| serde_json::json!(min)),
        max: bounds.map(|(_, max)| serde_json::json!(max)),
        name: None,
        normalized,
        sparse: None,
        extensions: Default::default(),
        extras: Default::default(),
    })
}

fn encode_vertices<T: bytemuck::Pod>(vertices: &[T]) -> Option<Vec<u8>> {
    meshopt::encode_vertex_buffer(vertices).ok()
}

fn meshopt_view_extension(
    byte_offset: usize,
    byte_length: usize,
    stride: usize,
    count: usize,
    mode: &str,
) -> gltf_json::extensions::buffer::View {
    let mut others = serde_json::Map::new();
    others.insert(
        MESHOPT.into(),
        serde_json::json!({
            "buffer": BinWriter::DATA,
            "byteOffset": byte_offset,
            "byteLength": byte_length,
            "byteStride": stride,
            "count": count,
            "mode": mode
        }),
    );
    gltf_json::extensions::buffer::View { others }
}

/// Write a vertex attribute buffer view, meshopt-encoded when `encoded` is set.
fn write_vertex_attribute_view(
    root: &mut gltf_json::Root,
    bin: &mut BinWriter,
    raw_bytes: &[u8],
    stride: usize,
    vertex_count: usize,
    encoded: Option<Vec<u8>>,
) -> Index<gltf_json::buffer::View> {
    let view = match encoded {
        Some(encoded) => bin.compressed_view(&encoded, stride, vertex_count, "ATTRIBUTES"),
        None => bin.plain_view(raw_bytes, Target::ArrayBuffer),
    };
    root.push(view)
}

/// Write an index buffer view, meshopt-encoded when `encoded` is set.
fn write_index_view(
    root: &mut gltf_json::Root,
    bin: &mut BinWriter,
    indices: &[u32],
    use_u16: bool,
    encoded: Option<Vec<u8>>,
) -> Index<gltf_json::buffer::View> {
    let stride = if use_u16 { 2 } else { 4 };
    let view = match encoded {
        Some(encoded) => bin.compressed_view(&encoded, stride, indices.len(), "TRIANGLES"),
        None if use_u16 => {
            let idx_u16: Vec<u16> = indices.iter().map(|&i| i as u16).collect();
            bin.plain_view(bytemuck::cast_slice(&idx_u16), Target::ElementArrayBuffer)
        }
        None => bin.plain_view(bytemuck::cast_slice(indices), Target::ElementArrayBuffer),
    };
    root.push(view)
}

/// Minimal valid GLB with one empty node.
fn write_empty_glb() -> Result<Vec<u8>> {
    let mut root = new_root();
    let node_idx = root.push(gltf_json::Node::default());
    push_scene(&mut root, node_idx);
    assemble(&root, None)
}

/// Map the phong material onto glTF metallic-roughness: diffuse becomes the
/// base colour, shininess becomes roughness, and the surface is dielectric.
fn build_material(root: &mut gltf_json::Root, material: &Material) -> Index<gltf_json::Material> {
    let pbr = gltf_json::material::PbrMetallicRoughness {
        base_color_factor: gltf_json::material::PbrBaseColorFactor(material.diffuse.to_array()),
        metallic_factor: gltf_json::material::StrengthFactor(0.0),
        roughness_factor: gltf_json::material::StrengthFactor(material.roughness()),
        base_color_texture: None,
        metallic_roughness_texture: None,
        extensions: Default::default(),
        extras: Default::default(),
    };

    root.push(gltf_json::Material {
        pbr_metallic_roughness: pbr,
        alpha_mode: Checked::Valid(gltf_json::material::AlphaMode::Opaque),
        alpha_cutoff: None,
        double_sided: false,
        normal_texture: None,
        occlusion_texture: None,
        emissive_texture: None,
        emissive_factor: gltf_json::material::EmissiveFactor([0.0, 0.0, 0.0]),
        name: None,
        extensions: Default::default(),
        extras: Default::default(),
    })
}
