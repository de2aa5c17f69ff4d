//! Resource file reader
//!
//! Parses a resource file back into descriptor tables and a [`Scene`]. Every
//! offset and count is bounds-checked, so a truncated or corrupt file is an
//! error rather than a panic.

use std::path::Path;

use anyhow::{Context, Result, bail, ensure};

use crate::formats::{
    BinarySerializable, Mesh, MeshDescriptor, NO_TEXTURE, PAYLOAD_ALIGNMENT, ResourceFileHeader,
    Scene, Texture, TextureDescriptor, Vertex,
};

/// A parsed resource file
#[derive(Debug, Clone)]
pub struct ResourceFile {
    pub header: ResourceFileHeader,
    pub texture_descriptors: Vec<TextureDescriptor>,
    pub mesh_descriptors: Vec<MeshDescriptor>,
    pub scene: Scene,
}

impl ResourceFile {
    /// Read and parse a resource file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read resource file: {}", path.display()))?;
        Self::from_bytes(&bytes)
            .with_context(|| format!("Invalid resource file: {}", path.display()))
    }

    /// Parse a resource file from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header = ResourceFileHeader::from_bytes(bytes)
            .ok_or_else(|| anyhow::anyhow!("File too small for header: {} bytes", bytes.len()))?;

        ensure!(
            header.total_size as usize == bytes.len(),
            "Header total size {} does not match file size {}",
            header.total_size,
            bytes.len()
        );

        let texture_count = header.texture_count as usize;
        let mesh_count = header.mesh_count as usize;
        let tables_end = texture_count
            .checked_mul(TextureDescriptor::SIZE)
            .and_then(|t| t.checked_add(mesh_count.checked_mul(MeshDescriptor::SIZE)?))
            .and_then(|t| t.checked_add(ResourceFileHeader::SIZE));
        match tables_end {
            Some(end) if end <= bytes.len() => {}
            _ => bail!(
                "Descriptor tables for {} textures and {} meshes exceed file size {}",
                texture_count,
                mesh_count,
                bytes.len()
            ),
        }

        let texture_table = ResourceFileHeader::texture_descriptor_offset(0);
        let mut texture_descriptors = Vec::with_capacity(texture_count);
        let mut textures = Vec::with_capacity(texture_count);
        for i in 0..texture_count {
            let desc = TextureDescriptor::deserialize_at(bytes, texture_table, i)
                .with_context(|| format!("Truncated texture descriptor {}", i))?;
            textures.push(read_texture(bytes, &desc).with_context(|| format!("Texture {}", i))?);
            texture_descriptors.push(desc);
        }

        let mesh_table = ResourceFileHeader::mesh_descriptor_offset(texture_count, 0);
        let mut mesh_descriptors = Vec::with_capacity(mesh_count);
        let mut meshes = Vec::with_capacity(mesh_count);
        for i in 0..mesh_count {
            let desc = MeshDescriptor::deserialize_at(bytes, mesh_table, i)
                .with_context(|| format!("Truncated mesh descriptor {}", i))?;
            meshes.push(read_mesh(bytes, &desc).with_context(|| format!("Mesh {}", i))?);
            mesh_descriptors.push(desc);
        }

        Ok(Self {
            header,
            texture_descriptors,
            mesh_descriptors,
            scene: Scene::new(textures, meshes),
        })
    }

    pub fn into_scene(self) -> Scene {
        self.scene
    }
}

fn payload<'a>(bytes: &'a [u8], offset: u32, len: usize) -> Result<&'a [u8]> {
    let start = offset as usize;
    ensure!(
        start % PAYLOAD_ALIGNMENT == 0,
        "Payload offset {} is not {}-byte aligned",
        start,
        PAYLOAD_ALIGNMENT
    );
    start
        .checked_add(len)
        .and_then(|end| bytes.get(start..end))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Payload at {} ({} bytes) exceeds file size {}",
                start,
                len,
                bytes.len()
            )
        })
}

fn read_texture(bytes: &[u8], desc: &TextureDescriptor) -> Result<Texture> {
    if !desc.has_data() {
        return Ok(Texture::Missing);
    }
    let pixels = payload(bytes, desc.data_offset, desc.rgba8_size())?;
    Ok(Texture::rgba8(
        desc.width as u32,
        desc.height as u32,
        pixels.to_vec(),
    ))
}

fn read_mesh(bytes: &[u8], desc: &MeshDescriptor) -> Result<Mesh> {
    let data = payload(bytes, desc.data_offset, desc.payload_size())?;
    let vertex_bytes = desc.vertex_count as usize * Vertex::SIZE;
    let (vertex_data, index_data) = data.split_at(vertex_bytes);

    let vertices: Vec<Vertex> = vertex_data
        .chunks_exact(Vertex::SIZE)
        .filter_map(Vertex::from_bytes)
        .collect();
    let indices: Vec<u32> = index_data
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    let texture_index = (desc.texture_index != NO_TEXTURE).then_some(desc.texture_index);
    let mesh = Mesh::new(texture_index, vertices, indices);
    ensure!(
        mesh.validate(),
        "{} indices are not whole triangles in range for {} vertices",
        desc.index_count,
        desc.vertex_count
    );
    Ok(mesh)
}
