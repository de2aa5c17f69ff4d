//! sceneview-export library
//!
//! Converts an OBJ scene with its materials and textures into a single flat
//! resource file for the real-time viewer.

pub mod config;
pub mod error;
pub mod formats;
pub mod obj;
pub mod scene;
pub mod texture;

use std::path::Path;

pub use config::{ExportConfig, MissingTexturePolicy};
pub use error::{EncodeError, ExportError, Result, UnresolvedReference};
pub use formats::{encode_resource, write_resource_file};
pub use scene::{FaceVertex, SceneBuilder};
pub use texture::{DecodedImage, ImageDecoder, TextureDecoder};

// Re-export the data model from sceneview-common
pub use sceneview_common::{Mesh, ResourceFile, Scene, Texture, Vertex};

/// Convert an OBJ file to an in-memory scene, decoding textures with the `image` crate
pub fn convert_obj_to_memory(input: &Path, config: &ExportConfig) -> Result<Scene> {
    obj::build_scene(input, ImageDecoder, config)
}

/// Convert an OBJ file and write the resource file to `output`
pub fn convert_obj(input: &Path, output: &Path, config: &ExportConfig) -> Result<Scene> {
    let scene = convert_obj_to_memory(input, config)?;
    tracing::info!(
        "Converted {:?}: {} textures, {} meshes, {} vertices, {} triangles",
        input,
        scene.textures.len(),
        scene.meshes.len(),
        scene.vertex_count(),
        scene.triangle_count()
    );
    write_resource_file(output, &scene)?;
    Ok(scene)
}
