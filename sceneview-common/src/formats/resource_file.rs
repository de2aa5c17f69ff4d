//! Sceneview resource file layout (resource.bin)
//!
//! All integers are little-endian. All offsets are absolute from the start of
//! the file.
//!
//! # Layout
//! ```text
//! 0x00: total_size u32
//! 0x04: texture_count u32
//! 0x08: mesh_count u32
//! 0x0C: texture descriptors (texture_count * 8 bytes)
//! var:  mesh descriptors (mesh_count * 16 bytes)
//! var:  payload (texture pixels, then mesh vertices + indices)
//! ```
//!
//! ## Texture descriptor (8 bytes)
//! ```text
//! 0x00: data_offset u32 (NO_DATA if the texture failed to decode)
//! 0x04: width u16
//! 0x06: height u16
//! ```
//!
//! ## Mesh descriptor (16 bytes)
//! ```text
//! 0x00: data_offset u32
//! 0x04: texture_index u32 (NO_TEXTURE if untextured)
//! 0x08: vertex_count u32
//! 0x0C: index_count u32
//! ```
//!
//! Texture payloads are raw RGBA8 pixels. A mesh payload is `vertex_count`
//! vertices of 8 × f32 followed directly by `index_count` × u32 indices.
//! Every payload starts on a [`PAYLOAD_ALIGNMENT`] boundary.

/// Texture descriptor offset marking a texture without pixel data
pub const NO_DATA: u32 = 0xFFFF_FFFF;

/// Alignment of every texture and mesh payload
pub const PAYLOAD_ALIGNMENT: usize = 4;

/// Round `addr` up to the next multiple of `alignment`
pub const fn align(addr: usize, alignment: usize) -> usize {
    addr.div_ceil(alignment) * alignment
}

/// Offset of the first payload byte: directly after the last descriptor
pub const fn payload_start(texture_count: usize, mesh_count: usize) -> usize {
    ResourceFileHeader::SIZE
        + texture_count * TextureDescriptor::SIZE
        + mesh_count * MeshDescriptor::SIZE
}

/// Resource file header (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ResourceFileHeader {
    pub total_size: u32,
    pub texture_count: u32,
    pub mesh_count: u32,
}

impl ResourceFileHeader {
    pub const SIZE: usize = 12;

    pub fn new(total_size: u32, texture_count: u32, mesh_count: u32) -> Self {
        Self {
            total_size,
            texture_count,
            mesh_count,
        }
    }

    /// Byte offset of texture descriptor `index`
    pub fn texture_descriptor_offset(index: usize) -> usize {
        Self::SIZE + index * TextureDescriptor::SIZE
    }

    /// Byte offset of mesh descriptor `index` in a file with `texture_count` textures
    pub fn mesh_descriptor_offset(texture_count: usize, index: usize) -> usize {
        payload_start(texture_count, 0) + index * MeshDescriptor::SIZE
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.total_size.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.texture_count.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.mesh_count.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            total_size: read_u32(bytes, 0),
            texture_count: read_u32(bytes, 4),
            mesh_count: read_u32(bytes, 8),
        })
    }
}

/// Texture descriptor (8 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct TextureDescriptor {
    pub data_offset: u32,
    pub width: u16,
    pub height: u16,
}

impl TextureDescriptor {
    pub const SIZE: usize = 8;

    pub fn new(data_offset: u32, width: u16, height: u16) -> Self {
        Self {
            data_offset,
            width,
            height,
        }
    }

    /// Descriptor for a texture that failed to decode
    pub fn missing() -> Self {
        Self::new(NO_DATA, 0, 0)
    }

    pub fn has_data(&self) -> bool {
        self.data_offset != NO_DATA
    }

    /// RGBA8 payload size (4 bytes per pixel)
    pub fn rgba8_size(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// Write descriptor to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.data_offset.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.width.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.height.to_le_bytes());
        bytes
    }

    /// Read descriptor from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            data_offset: read_u32(bytes, 0),
            width: u16::from_le_bytes([bytes[4], bytes[5]]),
            height: u16::from_le_bytes([bytes[6], bytes[7]]),
        })
    }
}

/// Mesh descriptor (16 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct MeshDescriptor {
    pub data_offset: u32,
    pub texture_index: u32,
    pub vertex_count: u32,
    pub index_count: u32,
}

impl MeshDescriptor {
    pub const SIZE: usize = 16;

    pub fn new(data_offset: u32, texture_index: u32, vertex_count: u32, index_count: u32) -> Self {
        Self {
            data_offset,
            texture_index,
            vertex_count,
            index_count,
        }
    }

    /// Payload size: packed vertices followed by u32 indices
    pub fn payload_size(&self) -> usize {
        self.vertex_count as usize * super::Vertex::SIZE + self.index_count as usize * 4
    }

    /// Write descriptor to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.data_offset.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.texture_index.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.vertex_count.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.index_count.to_le_bytes());
        bytes
    }

    /// Read descriptor from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            data_offset: read_u32(bytes, 0),
            texture_index: read_u32(bytes, 4),
            vertex_count: read_u32(bytes, 8),
            index_count: read_u32(bytes, 12),
        })
    }
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}
