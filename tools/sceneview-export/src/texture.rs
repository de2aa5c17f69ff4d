//! Texture decoding (PNG/JPG -> RGBA8)

use anyhow::{Context, Result, ensure};
use image::GenericImageView;
use std::path::Path;

/// Decoded RGBA8 image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes, RGBA order
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as u64 * height as u64 * 4;
        ensure!(
            pixels.len() as u64 == expected,
            "{}x{} image has {} bytes of pixel data, expected {}",
            width,
            height,
            pixels.len(),
            expected
        );
        Ok(Self {
            width,
            height,
            pixels,
        })
    }
}

/// Turns an image file into RGBA8 pixels
///
/// `Sync` so registered textures can be decoded on the rayon pool.
pub trait TextureDecoder: Sync {
    fn decode(&self, path: &Path) -> Result<DecodedImage>;
}

/// Decoder backed by the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecoder;

impl TextureDecoder for ImageDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage> {
        let img = image::open(path).with_context(|| format!("Failed to load image: {:?}", path))?;

        let (width, height) = img.dimensions();
        let pixels = img.to_rgba8().into_raw();

        tracing::info!(
            "Decoded texture {:?}: {}x{}, {} bytes",
            path,
            width,
            height,
            pixels.len()
        );

        DecodedImage::new(width, height, pixels)
    }
}
