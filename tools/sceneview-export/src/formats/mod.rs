//! Resource file writer
//!
//! Re-exports the layout definitions from sceneview-common and serializes a
//! [`Scene`] into them. Output is a pure function of the scene: the same
//! textures and meshes always produce the same bytes.

pub use sceneview_common::formats::*;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{EncodeError, ExportError, Result};

/// Encode a scene into resource file bytes
///
/// Descriptor tables sit at fixed offsets after the header. Payloads follow in
/// table order: texture pixels, then each mesh's vertices and indices. Every
/// payload offset is rounded up to [`PAYLOAD_ALIGNMENT`]; gaps are zero-filled.
pub fn encode_resource(scene: &Scene) -> Result<Vec<u8>, EncodeError> {
    let texture_count = count_u32("texture", scene.textures.len())?;
    let mesh_count = count_u32("mesh", scene.meshes.len())?;

    let mut data = vec![0u8; payload_start(scene.textures.len(), scene.meshes.len())];

    for (index, texture) in scene.textures.iter().enumerate() {
        let desc = match texture.pixels() {
            None => TextureDescriptor::missing(),
            Some(pixels) => {
                let (width, height) = texture_dimensions(index, texture)?;
                if !texture.validate() {
                    return Err(EncodeError::PixelDataSize {
                        index,
                        expected: width as u64 * height as u64 * 4,
                        actual: pixels.len(),
                    });
                }

                let data_offset = offset_u32(data.len())?;
                data.extend_from_slice(pixels);
                pad_to_alignment(&mut data);
                TextureDescriptor::new(data_offset, width, height)
            }
        };
        write_at(
            &mut data,
            ResourceFileHeader::texture_descriptor_offset(index),
            &desc.to_bytes(),
        );
    }

    for (index, mesh) in scene.meshes.iter().enumerate() {
        pad_to_alignment(&mut data);

        let vertex_count =
            u32::try_from(mesh.vertices.len()).map_err(|_| EncodeError::TooManyVertices {
                index,
                count: mesh.vertices.len(),
            })?;
        let index_count =
            u32::try_from(mesh.indices.len()).map_err(|_| EncodeError::TooManyIndices {
                index,
                count: mesh.indices.len(),
            })?;

        let desc = MeshDescriptor::new(
            offset_u32(data.len())?,
            mesh.texture_slot(),
            vertex_count,
            index_count,
        );
        write_at(
            &mut data,
            ResourceFileHeader::mesh_descriptor_offset(scene.textures.len(), index),
            &desc.to_bytes(),
        );

        data.reserve(desc.payload_size());
        for vertex in &mesh.vertices {
            data.extend_from_slice(&vertex.to_bytes());
        }
        for value in &mesh.indices {
            data.extend_from_slice(&value.to_le_bytes());
        }
    }

    let header = ResourceFileHeader::new(offset_u32(data.len())?, texture_count, mesh_count);
    write_at(&mut data, 0, &header.to_bytes());

    Ok(data)
}

/// Encode a scene and write it to `path`
pub fn write_resource_file(path: &Path, scene: &Scene) -> Result<()> {
    let data = encode_resource(scene)?;

    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&data)
        .and_then(|_| writer.flush())
        .map_err(|e| ExportError::io(path, e))?;

    tracing::info!(
        "Wrote {:?}: {} bytes, {} textures, {} meshes",
        path,
        data.len(),
        scene.textures.len(),
        scene.meshes.len()
    );

    Ok(())
}

fn texture_dimensions(index: usize, texture: &Texture) -> Result<(u16, u16), EncodeError> {
    let (width, height) = (texture.width(), texture.height());
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(EncodeError::TextureTooLarge {
            index,
            width,
            height,
        }),
    }
}

fn pad_to_alignment(data: &mut Vec<u8>) {
    data.resize(align(data.len(), PAYLOAD_ALIGNMENT), 0);
}

fn write_at(data: &mut [u8], offset: usize, bytes: &[u8]) {
    data[offset..offset + bytes.len()].copy_from_slice(bytes);
}

fn offset_u32(offset: usize) -> Result<u32, EncodeError> {
    u32::try_from(offset).map_err(|_| EncodeError::FileTooLarge(offset))
}

fn count_u32(kind: &'static str, count: usize) -> Result<u32, EncodeError> {
    u32::try_from(count).map_err(|_| EncodeError::TooManyEntries { kind, count })
}
