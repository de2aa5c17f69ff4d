//! Sceneview binary resource file format
//!
//! A resource file is a single POD container holding every texture and mesh of a
//! scene. No magic bytes and no version field: the viewer loads whatever file it
//! is pointed at.
//!
//! All format headers implement the [`BinarySerializable`] trait for consistent
//! serialization/deserialization.

pub mod resource_file;
pub mod scene;
mod serialization;

pub use resource_file::*;
pub use scene::*;
pub use serialization::BinarySerializable;

/// Default output file name written by the exporter
pub const RESOURCE_FILE_NAME: &str = "resource.bin";
