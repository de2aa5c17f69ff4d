//! Export configuration
//!
//! Optional TOML file; every field has a default so an empty file is valid.
//!
//! ```toml
//! output = "resource.bin"
//! parallel_decode = true
//! missing_textures = "error"   # or "skip"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use sceneview_common::RESOURCE_FILE_NAME;

/// What to do when a texture image cannot be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingTexturePolicy {
    /// Abort the export
    #[default]
    Error,
    /// Store the texture without pixel data
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Output resource file
    pub output: PathBuf,
    /// Decode distinct textures on the rayon thread pool
    pub parallel_decode: bool,
    pub missing_textures: MissingTexturePolicy,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(RESOURCE_FILE_NAME),
            parallel_decode: true,
            missing_textures: MissingTexturePolicy::Error,
        }
    }
}

impl ExportConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse export config")
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("In config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::from_toml("").unwrap();
        assert_eq!(config, ExportConfig::default());
        assert_eq!(config.output, PathBuf::from("resource.bin"));
        assert!(config.parallel_decode);
        assert_eq!(config.missing_textures, MissingTexturePolicy::Error);
    }

    #[test]
    fn test_overrides() {
        let config = ExportConfig::from_toml(
            r#"
            output = "out/scene.bin"
            parallel_decode = false
            missing_textures = "skip"
            "#,
        )
        .unwrap();
        assert_eq!(config.output, PathBuf::from("out/scene.bin"));
        assert!(!config.parallel_decode);
        assert_eq!(config.missing_textures, MissingTexturePolicy::Skip);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(ExportConfig::from_toml("compress = true").is_err());
        assert!(ExportConfig::from_toml("missing_textures = \"ignore\"").is_err());
    }
}
