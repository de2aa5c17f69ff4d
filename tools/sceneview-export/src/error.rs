//! Export error types
//!
//! Every error aborts the whole conversion. There is no degraded output mode.

use std::path::PathBuf;

use thiserror::Error;

/// A face or directive referenced something that does not exist
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnresolvedReference {
    #[error("position index {index} out of range ({count} positions)")]
    Position { index: usize, count: usize },
    #[error("texture coordinate index {index} out of range ({count} texture coordinates)")]
    TexCoord { index: usize, count: usize },
    #[error("material '{0}' was never declared")]
    UndeclaredMaterial(String),
    #[error("material '{0}' has no texture")]
    UntexturedMaterial(String),
}

/// The scene cannot be represented in the resource file layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("texture {index} is {width}x{height}, dimensions must fit in 16 bits")]
    TextureTooLarge { index: usize, width: u32, height: u32 },
    #[error("texture {index} has {actual} bytes of pixel data, expected {expected}")]
    PixelDataSize {
        index: usize,
        expected: u64,
        actual: usize,
    },
    #[error("mesh {index} has {count} vertices, counts must fit in 32 bits")]
    TooManyVertices { index: usize, count: usize },
    #[error("mesh {index} has {count} indices, counts must fit in 32 bits")]
    TooManyIndices { index: usize, count: usize },
    #[error("{kind} count {count} does not fit in 32 bits")]
    TooManyEntries { kind: &'static str, count: usize },
    #[error("resource file would be {0} bytes, offsets must fit in 32 bits")]
    FileTooLarge(usize),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{}:{line}: {message}", .path.display())]
    MalformedInput {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("face has {0} vertices, at least 3 are required")]
    FaceTooSmall(usize),

    #[error("unresolved reference: {0}")]
    UnresolvedReference(#[from] UnresolvedReference),

    #[error("failed to decode texture {}", .path.display())]
    DecodeFailure {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("cannot encode resource file: {0}")]
    Encode(#[from] EncodeError),

    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ExportError> = std::result::Result<T, E>;
