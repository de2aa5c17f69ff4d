//! Shared types and format definitions for sceneview resource files
//!
//! This crate is shared between:
//! - `sceneview-export` (writes resource files from OBJ scenes)
//! - the real-time viewer (reads resource files)
//!
//! # Modules
//!
//! - [`formats`] - Scene data model and the binary resource file layout
//! - [`loader`] - Resource file reader that parses the layout back into a [`Scene`]

pub mod formats;
pub mod loader;

pub use loader::ResourceFile;

pub use formats::{
    // Traits
    BinarySerializable,
    // Headers
    MeshDescriptor,
    ResourceFileHeader,
    TextureDescriptor,
    // Data model
    Mesh,
    Scene,
    Texture,
    Vertex,
    // Layout helpers and constants
    NO_DATA,
    NO_TEXTURE,
    PAYLOAD_ALIGNMENT,
    RESOURCE_FILE_NAME,
    align,
    payload_start,
};
