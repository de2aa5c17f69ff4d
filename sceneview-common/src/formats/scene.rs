//! Scene data model
//!
//! The two ordered collections the exporter builds and the resource file stores:
//! textures and meshes. Both are write-once: built in a single pass, then only read.

use bytemuck::{Pod, Zeroable};

/// Mesh texture index meaning "no texture assigned"
pub const NO_TEXTURE: u32 = 0xFFFF_FFFF;

/// Combined vertex: position, texture coordinate and per-face normal
///
/// Stored in the resource file as 8 consecutive f32 values in field order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex {
    /// Serialized size in bytes (8 × f32)
    pub const SIZE: usize = 32;

    pub fn new(position: [f32; 3], tex_coord: [f32; 2], normal: [f32; 3]) -> Self {
        Self {
            position,
            tex_coord,
            normal,
        }
    }

    /// The 8 attribute values in file order
    pub fn to_array(&self) -> [f32; 8] {
        bytemuck::cast(*self)
    }

    pub fn from_array(values: [f32; 8]) -> Self {
        bytemuck::cast(values)
    }

    /// Write vertex to little-endian bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        for (chunk, value) in bytes.chunks_exact_mut(4).zip(self.to_array()) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    /// Read vertex from little-endian bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let bytes = bytes.get(..Self::SIZE)?;
        let mut values = [0f32; 8];
        for (value, chunk) in values.iter_mut().zip(bytes.chunks_exact(4)) {
            *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Some(Self::from_array(values))
    }
}

/// A run of triangles sharing one texture
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    /// Texture index, `None` for untextured geometry
    pub texture_index: Option<u32>,
    /// Unique combined vertices
    pub vertices: Vec<Vertex>,
    /// Triangle list indices into `vertices`
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(texture_index: Option<u32>, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            texture_index,
            vertices,
            indices,
        }
    }

    /// Texture index as stored in the file (`NO_TEXTURE` when untextured)
    pub fn texture_slot(&self) -> u32 {
        self.texture_index.unwrap_or(NO_TEXTURE)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check the triangle-list invariants: whole triangles, indices in range
    pub fn validate(&self) -> bool {
        self.indices.len() % 3 == 0
            && self
                .indices
                .iter()
                .all(|&i| (i as usize) < self.vertices.len())
    }
}

/// Decoded texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Texture {
    /// RGBA8 pixels, 4 bytes per pixel, row-major
    Rgba8 {
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    },
    /// The image could not be decoded; no pixel data
    Missing,
}

impl Texture {
    pub fn rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Texture::Rgba8 {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        match self {
            Texture::Rgba8 { width, .. } => *width,
            Texture::Missing => 0,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Texture::Rgba8 { height, .. } => *height,
            Texture::Missing => 0,
        }
    }

    pub fn pixels(&self) -> Option<&[u8]> {
        match self {
            Texture::Rgba8 { pixels, .. } => Some(pixels),
            Texture::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Texture::Missing)
    }

    /// Check that the pixel buffer matches the dimensions
    pub fn validate(&self) -> bool {
        match self {
            Texture::Rgba8 {
                width,
                height,
                pixels,
            } => pixels.len() as u64 == *width as u64 * *height as u64 * 4,
            Texture::Missing => true,
        }
    }
}

/// Everything stored in one resource file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub textures: Vec<Texture>,
    pub meshes: Vec<Mesh>,
}

impl Scene {
    pub fn new(textures: Vec<Texture>, meshes: Vec<Mesh>) -> Self {
        Self { textures, meshes }
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty() && self.meshes.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertices.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }
}
