//! glTF model loading.
//!
//! The document is walked node by node; node transforms are baked into the
//! vertices so a model draws with a single model matrix. Each primitive
//! becomes one indexed mesh bound to a diffuse/specular/emission material.

use crate::texture::{self, Texture, TextureOptions};
use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};
use gltf::image::Format;
use image::{DynamicImage, ImageBuffer};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use wgpu::util::DeviceExt;

/// Errors from loading a model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to load glTF file: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("missing position data for mesh: {0}")]
    MissingPositions(String),
    #[error("model contains no triangle meshes: {0}")]
    Empty(String),
    #[error("image {0}: pixel data does not match its size")]
    ImageSize(usize),
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl ModelVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// CPU-side geometry for one primitive, in model space.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    /// Index into the document's materials; `None` uses the default material.
    pub material: Option<usize>,
}

/// Image indices a material samples from, per slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterialMaps {
    pub diffuse: Option<usize>,
    pub specular: Option<usize>,
    pub emission: Option<usize>,
}

impl MaterialMaps {
    pub fn of(material: &gltf::Material) -> Self {
        let pbr = material.pbr_metallic_roughness();
        Self {
            diffuse: pbr
                .base_color_texture()
                .map(|info| info.texture().source().index()),
            specular: pbr
                .metallic_roughness_texture()
                .map(|info| info.texture().source().index()),
            emission: material
                .emissive_texture()
                .map(|info| info.texture().source().index()),
        }
    }
}

/// Smooth per-vertex normals from triangle faces, for meshes that ship none.
pub fn compute_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        // Area-weighted: the unnormalized cross product.
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

/// Extract triangle geometry from every node of the document's default scene
/// (or all meshes, for scene-less documents).
pub fn read_meshes(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<Vec<MeshData>, ModelError> {
    let mut meshes = Vec::new();
    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => {
            for node in scene.nodes() {
                read_node(&node, Mat4::IDENTITY, buffers, &mut meshes)?;
            }
        }
        None => {
            for mesh in document.meshes() {
                read_mesh(&mesh, Mat4::IDENTITY, buffers, &mut meshes)?;
            }
        }
    }
    Ok(meshes)
}

fn read_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<MeshData>,
) -> Result<(), ModelError> {
    let transform = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        read_mesh(&mesh, transform, buffers, out)?;
    }
    for child in node.children() {
        read_node(&child, transform, buffers, out)?;
    }
    Ok(())
}

fn read_mesh(
    mesh: &gltf::Mesh,
    transform: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<MeshData>,
) -> Result<(), ModelError> {
    let name = mesh
        .name()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("mesh_{}", mesh.index()));
    let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            tracing::warn!(
                "skipping {name}: primitive mode {:?} is not triangles",
                primitive.mode()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let positions: Vec<Vec3> = reader
            .read_positions()
            .ok_or_else(|| ModelError::MissingPositions(name.clone()))?
            .map(Vec3::from)
            .collect();

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };

        let normals: Vec<Vec3> = match reader.read_normals() {
            Some(normals) => normals.map(Vec3::from).collect(),
            None => compute_normals(&positions, &indices),
        };

        let tex_coords: Vec<[f32; 2]> = reader
            .read_tex_coords(0)
            .map(|tc| tc.into_f32().collect())
            .unwrap_or_default();

        let vertices = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let n = normals.get(i).copied().unwrap_or(Vec3::Y);
                ModelVertex {
                    position: transform.transform_point3(p).to_array(),
                    normal: (normal_matrix * n).normalize_or(Vec3::Y).to_array(),
                    tex_coords: tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            "mesh {name}: {} vertices, {} indices",
            vertices.len(),
            indices.len()
        );

        out.push(MeshData {
            name: name.clone(),
            vertices,
            indices,
            material: primitive.material().index(),
        });
    }
    Ok(())
}

/// File an image URI points at, relative to the model's directory.
///
/// Relative URIs are percent-decoded. `None` for data URIs and schemes other
/// than `file:`.
pub fn image_path(base_dir: &Path, uri: &str) -> Option<PathBuf> {
    if let Some(rest) = uri.strip_prefix("file://").or_else(|| uri.strip_prefix("file:")) {
        return Some(PathBuf::from(rest));
    }
    if uri.contains(':') {
        return None;
    }
    let decoded = urlencoding::decode(uri).map_or_else(|_| uri.to_owned(), |d| d.into_owned());
    Some(base_dir.join(decoded))
}

/// Decode an image stored inside the document (buffer view or data URI).
pub fn decode_embedded(
    image: &gltf::Image,
    base_dir: &Path,
    buffers: &[gltf::buffer::Data],
) -> Result<DynamicImage, ModelError> {
    let data = gltf::image::Data::from_source(image.source(), Some(base_dir), buffers)?;
    image_from_gltf(image.index(), data)
}

fn image_from_gltf(index: usize, data: gltf::image::Data) -> Result<DynamicImage, ModelError> {
    let gltf::image::Data {
        pixels,
        format,
        width,
        height,
    } = data;
    let wide = |bytes: &[u8]| -> Vec<u16> {
        bytes
            .chunks_exact(2)
            .map(|b| u16::from_ne_bytes([b[0], b[1]]))
            .collect()
    };
    let float = |bytes: &[u8]| -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .collect()
    };
    let image = match format {
        Format::R8 => ImageBuffer::from_raw(width, height, pixels).map(DynamicImage::ImageLuma8),
        Format::R8G8 => ImageBuffer::from_raw(width, height, pixels).map(DynamicImage::ImageLumaA8),
        Format::R8G8B8 => ImageBuffer::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8),
        Format::R8G8B8A8 => {
            ImageBuffer::from_raw(width, height, pixels).map(DynamicImage::ImageRgba8)
        }
        Format::R16 => {
            ImageBuffer::from_raw(width, height, wide(&pixels)).map(DynamicImage::ImageLuma16)
        }
        Format::R16G16 => {
            ImageBuffer::from_raw(width, height, wide(&pixels)).map(DynamicImage::ImageLumaA16)
        }
        Format::R16G16B16 => {
            ImageBuffer::from_raw(width, height, wide(&pixels)).map(DynamicImage::ImageRgb16)
        }
        Format::R16G16B16A16 => {
            ImageBuffer::from_raw(width, height, wide(&pixels)).map(DynamicImage::ImageRgba16)
        }
        Format::R32G32B32FLOAT => {
            ImageBuffer::from_raw(width, height, float(&pixels)).map(DynamicImage::ImageRgb32F)
        }
        Format::R32G32B32A32FLOAT => {
            ImageBuffer::from_raw(width, height, float(&pixels)).map(DynamicImage::ImageRgba32F)
        }
    };
    image.ok_or(ModelError::ImageSize(index))
}

/// Bind group layout and sampler for material textures (group 1).
pub struct MaterialLayout {
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub sampler: wgpu::Sampler,
}

impl MaterialLayout {
    pub fn new(device: &wgpu::Device) -> Self {
        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bind_group_layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                texture_entry(2),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        Self {
            bind_group_layout,
            sampler: texture::material_sampler(device),
        }
    }

    fn bind(
        &self,
        device: &wgpu::Device,
        label: &str,
        diffuse: &Texture,
        specular: &Texture,
        emission: &Texture,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&diffuse.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&specular.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&emission.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelOptions {
    pub flip_textures: bool,
    /// Specular colour for materials without a specular map.
    pub fallback_specular: Vec3,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            flip_textures: false,
            fallback_specular: Vec3::splat(0.5),
        }
    }
}

fn to_rgba8(color: Vec3) -> [u8; 4] {
    let c = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8, 255]
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    material: usize,
}

/// A loaded model: GPU meshes plus one bind group per material.
pub struct Model {
    meshes: Vec<GpuMesh>,
    materials: Vec<wgpu::BindGroup>,
    // Referenced by `materials`.
    _textures: Vec<Texture>,
}

/// Loads each image at most once per model, per colour space.
struct TextureCache<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    document: &'a gltf::Document,
    buffers: &'a [gltf::buffer::Data],
    base_dir: &'a Path,
    flip: bool,
    loaded: HashMap<(usize, bool), usize>,
    textures: Vec<Texture>,
}

impl TextureCache<'_> {
    fn get_or_load(&mut self, image: Option<usize>, srgb: bool, fallback: [u8; 4]) -> usize {
        let Some(index) = image else {
            return self.solid(fallback, srgb);
        };
        if let Some(&slot) = self.loaded.get(&(index, srgb)) {
            return slot;
        }

        let options = TextureOptions {
            srgb,
            flip_vertically: self.flip,
        };
        let Some(image) = self.document.images().nth(index) else {
            tracing::error!("material references missing image {index}");
            return self.solid(fallback, srgb);
        };
        let on_disk = match image.source() {
            gltf::image::Source::Uri { uri, .. } => image_path(self.base_dir, uri),
            gltf::image::Source::View { .. } => None,
        };
        let texture = match on_disk {
            Some(path) => texture::load_texture(self.device, self.queue, &path, options, fallback),
            None => match decode_embedded(&image, self.base_dir, self.buffers) {
                Ok(decoded) => Texture::from_image(
                    self.device,
                    self.queue,
                    &decoded,
                    options,
                    &format!("image_{index}"),
                ),
                Err(e) => {
                    tracing::error!("texture failed to load from embedded image {index}: {e}");
                    Texture::solid(self.device, self.queue, fallback, srgb, "fallback_texture")
                }
            },
        };

        let slot = self.push(texture);
        self.loaded.insert((index, srgb), slot);
        slot
    }

    fn solid(&mut self, rgba: [u8; 4], srgb: bool) -> usize {
        let texture = Texture::solid(self.device, self.queue, rgba, srgb, "solid_texture");
        self.push(texture)
    }

    fn push(&mut self, texture: Texture) -> usize {
        self.textures.push(texture);
        self.textures.len() - 1
    }
}

impl Model {
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
        layout: &MaterialLayout,
        options: &ModelOptions,
    ) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let gltf::Gltf { document, blob } = gltf::Gltf::open(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let buffers = gltf::import_buffers(&document, Some(base_dir), blob)?;

        let mesh_data = read_meshes(&document, &buffers)?;
        if mesh_data.is_empty() {
            return Err(ModelError::Empty(path.display().to_string()));
        }

        let mut cache = TextureCache {
            device,
            queue,
            document: &document,
            buffers: &buffers,
            base_dir,
            flip: options.flip_textures,
            loaded: HashMap::new(),
            textures: Vec::new(),
        };

        // Slot order follows the document; the last slot is the default material.
        let mut material_maps: Vec<MaterialMaps> =
            document.materials().map(|m| MaterialMaps::of(&m)).collect();
        material_maps.push(MaterialMaps::default());
        let default_material = material_maps.len() - 1;

        let specular_fallback = to_rgba8(options.fallback_specular);
        let mut materials = Vec::with_capacity(material_maps.len());
        for (i, maps) in material_maps.iter().enumerate() {
            let diffuse = cache.get_or_load(maps.diffuse, true, [255, 255, 255, 255]);
            let specular = cache.get_or_load(maps.specular, false, specular_fallback);
            let emission = cache.get_or_load(maps.emission, true, [0, 0, 0, 255]);
            materials.push(layout.bind(
                device,
                &format!("material_{i}"),
                &cache.textures[diffuse],
                &cache.textures[specular],
                &cache.textures[emission],
            ));
        }

        let meshes = mesh_data
            .iter()
            .map(|mesh| GpuMesh {
                vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{}_vertices", mesh.name)),
                    contents: bytemuck::cast_slice(&mesh.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{}_indices", mesh.name)),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                index_count: mesh.indices.len() as u32,
                material: mesh
                    .material
                    .filter(|&m| m < default_material)
                    .unwrap_or(default_material),
            })
            .collect::<Vec<_>>();

        tracing::info!(
            "loaded model {}: {} meshes, {} materials, {} textures",
            path.display(),
            meshes.len(),
            materials.len(),
            cache.textures.len()
        );

        Ok(Self {
            meshes,
            materials,
            _textures: cache.textures,
        })
    }

    /// Record one indexed draw per mesh. Group 0 must already be bound.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        for mesh in &self.meshes {
            pass.set_bind_group(1, &self.materials[mesh.material], &[]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writes a one-triangle glTF with an external .bin next to it.
    fn write_triangle(dir: &Path, with_normals: bool, node_translation: [f32; 3]) -> PathBuf {
        let positions: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let normals: [[f32; 3]; 3] = [[0.0, 0.0, 1.0]; 3];
        let uvs: [[f32; 2]; 3] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let indices: [u16; 3] = [0, 1, 2];

        let mut bin = Vec::new();
        bin.extend_from_slice(bytemuck::cast_slice(&positions));
        bin.extend_from_slice(bytemuck::cast_slice(&normals));
        bin.extend_from_slice(bytemuck::cast_slice(&uvs));
        bin.extend_from_slice(bytemuck::cast_slice(&indices));
        bin.extend_from_slice(&[0, 0]); // pad to 4 bytes
        std::fs::write(dir.join("tri.bin"), &bin).unwrap();

        let normal_attr = if with_normals { r#""NORMAL": 1,"# } else { "" };
        let [tx, ty, tz] = node_translation;
        let json = format!(
            r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [{{ "mesh": 0, "translation": [{tx}, {ty}, {tz}] }}],
  "meshes": [{{
    "name": "tri",
    "primitives": [{{
      "attributes": {{ "POSITION": 0, {normal_attr} "TEXCOORD_0": 2 }},
      "indices": 3
    }}]
  }}],
  "buffers": [{{ "uri": "tri.bin", "byteLength": {len} }}],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }},
    {{ "buffer": 0, "byteOffset": 36, "byteLength": 36 }},
    {{ "buffer": 0, "byteOffset": 72, "byteLength": 24 }},
    {{ "buffer": 0, "byteOffset": 96, "byteLength": 6 }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
       "min": [0, 0, 0], "max": [1, 1, 0] }},
    {{ "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3" }},
    {{ "bufferView": 2, "componentType": 5126, "count": 3, "type": "VEC2" }},
    {{ "bufferView": 3, "componentType": 5123, "count": 3, "type": "SCALAR" }}
  ]
}}"#,
            len = bin.len()
        );
        let path = dir.join("tri.gltf");
        std::fs::write(&path, json).unwrap();
        path
    }

    fn load_meshes(path: &Path) -> Vec<MeshData> {
        let gltf::Gltf { document, blob } = gltf::Gltf::open(path).unwrap();
        let buffers = gltf::import_buffers(&document, path.parent(), blob).unwrap();
        read_meshes(&document, &buffers).unwrap()
    }

    #[test]
    fn reads_triangle_geometry() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_triangle(tmp.path(), true, [0.0, 0.0, 0.0]);
        let meshes = load_meshes(&path);

        assert_eq!(meshes.len(), 1);
        let mesh = &meshes[0];
        assert_eq!(mesh.name, "tri");
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.material, None);
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[2].tex_coords, [0.0, 1.0]);
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn node_transform_is_baked_in() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_triangle(tmp.path(), true, [0.0, -2.0, 5.0]);
        let meshes = load_meshes(&path);
        assert_eq!(meshes[0].vertices[0].position, [0.0, -2.0, 5.0]);
        assert_eq!(meshes[0].vertices[1].position, [1.0, -2.0, 5.0]);
        // Translation leaves normals alone.
        assert_eq!(meshes[0].vertices[2].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn missing_normals_are_computed() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_triangle(tmp.path(), false, [0.0, 0.0, 0.0]);
        let meshes = load_meshes(&path);
        for v in &meshes[0].vertices {
            assert!(Vec3::from(v.normal).abs_diff_eq(Vec3::Z, 1e-6));
        }
    }

    #[test]
    fn compute_normals_averages_shared_vertices() {
        // Two triangles folded along the x axis: one in the XY plane, one in XZ.
        let positions = [
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
            Vec3::new(0.0, 0.0, -1.0),
        ];
        let indices = [0, 1, 2, 0, 1, 3];
        let normals = compute_normals(&positions, &indices);
        assert!(normals[2].abs_diff_eq(Vec3::Z, 1e-6));
        assert!(normals[3].abs_diff_eq(Vec3::Y, 1e-6));
        let shared = Vec3::new(0.0, 1.0, 1.0).normalize();
        assert!(normals[0].abs_diff_eq(shared, 1e-6));
    }

    #[test]
    fn compute_normals_tolerates_bad_indices() {
        let positions = [Vec3::ZERO, Vec3::X];
        let normals = compute_normals(&positions, &[0, 1, 7]);
        assert_eq!(normals, vec![Vec3::Y, Vec3::Y]);
    }

    #[test]
    fn fallback_colour_conversion() {
        assert_eq!(to_rgba8(Vec3::splat(0.5)), [128, 128, 128, 255]);
        assert_eq!(to_rgba8(Vec3::new(2.0, -1.0, 1.0)), [255, 0, 255, 255]);
    }

    #[test]
    fn vertex_layout_stride() {
        assert_eq!(ModelVertex::layout().array_stride, 32);
        assert_eq!(ModelVertex::layout().attributes.len(), 3);
    }

    fn two_by_two() -> image::RgbImage {
        image::RgbImage::from_fn(2, 2, |x, y| image::Rgb([x as u8 * 200, y as u8 * 200, 50]))
    }

    fn first_image_uri(document: &gltf::Document) -> String {
        match document.images().next().unwrap().source() {
            gltf::image::Source::Uri { uri, .. } => uri.to_owned(),
            gltf::image::Source::View { .. } => panic!("expected a URI image"),
        }
    }

    #[test]
    fn percent_encoded_uri_resolves_to_file() {
        let tmp = tempfile::tempdir().unwrap();
        two_by_two().save(tmp.path().join("my tex.png")).unwrap();
        let path = tmp.path().join("textured.gltf");
        std::fs::write(
            &path,
            r#"{ "asset": { "version": "2.0" }, "images": [{ "uri": "my%20tex.png" }] }"#,
        )
        .unwrap();

        let document = gltf::Gltf::open(&path).unwrap().document;
        let uri = first_image_uri(&document);
        let resolved = image_path(tmp.path(), &uri).unwrap();
        assert_eq!(resolved, tmp.path().join("my tex.png"));

        let (_, levels) = texture::decode_levels(&resolved, TextureOptions::default()).unwrap();
        assert_eq!((levels[0].width(), levels[0].height()), (2, 2));
    }

    #[test]
    fn image_path_schemes() {
        let base = Path::new("models");
        assert_eq!(image_path(base, "albedo.png"), Some(base.join("albedo.png")));
        assert_eq!(image_path(base, "sub/a%2Bb.png"), Some(base.join("sub/a+b.png")));
        assert_eq!(image_path(base, "file:///tmp/x.png"), Some(PathBuf::from("/tmp/x.png")));
        assert_eq!(image_path(base, "data:image/png;base64,AAAA"), None);
        assert_eq!(image_path(base, "https://example.com/x.png"), None);
    }

    #[test]
    fn buffer_view_image_is_decoded() {
        let tmp = tempfile::tempdir().unwrap();
        let mut png = Vec::new();
        two_by_two()
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        std::fs::write(tmp.path().join("img.bin"), &png).unwrap();
        let json = format!(
            r#"{{
  "asset": {{ "version": "2.0" }},
  "buffers": [{{ "uri": "img.bin", "byteLength": {len} }}],
  "bufferViews": [{{ "buffer": 0, "byteOffset": 0, "byteLength": {len} }}],
  "images": [{{ "bufferView": 0, "mimeType": "image/png" }}]
}}"#,
            len = png.len()
        );
        let path = tmp.path().join("packed.gltf");
        std::fs::write(&path, json).unwrap();

        let gltf::Gltf { document, blob } = gltf::Gltf::open(&path).unwrap();
        let buffers = gltf::import_buffers(&document, Some(tmp.path()), blob).unwrap();
        let image = document.images().next().unwrap();
        let decoded = decode_embedded(&image, tmp.path(), &buffers).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (2, 2));
        assert_eq!(decoded.to_rgb8().get_pixel(1, 1), &image::Rgb([200, 200, 50]));
    }

    #[test]
    fn short_pixel_data_is_rejected() {
        let data = gltf::image::Data {
            pixels: vec![0; 5],
            format: Format::R8G8B8,
            width: 2,
            height: 1,
        };
        assert!(matches!(image_from_gltf(3, data), Err(ModelError::ImageSize(3))));
    }

    #[test]
    fn wide_pixels_become_sixteen_bit_images() {
        let pixels = [1000u16, 2000]
            .iter()
            .flat_map(|v| v.to_ne_bytes())
            .collect();
        let data = gltf::image::Data {
            pixels,
            format: Format::R16,
            width: 2,
            height: 1,
        };
        let DynamicImage::ImageLuma16(img) = image_from_gltf(0, data).unwrap() else {
            panic!("expected a 16-bit luma image");
        };
        assert_eq!(img.get_pixel(1, 0).0, [2000]);
    }
}
