use base64::{engine::general_purpose::STANDARD, Engine};
use image::RgbImage;
use thiserror::Error;

/// Errors raised while turning an encoded payload into pixels
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Failed to decode image: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),
}

/// Dense RGB pixel grid (`width * height * 3` bytes, row-major)
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pixels: RgbImage,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Raw interleaved RGB bytes
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.pixels
    }
}

impl From<RgbImage> for DecodedImage {
    fn from(pixels: RgbImage) -> Self {
        Self { pixels }
    }
}

/// Decode a base64 image, optionally prefixed with a data URL header
///
/// Everything up to and including the first comma is discarded without
/// looking at the MIME type. The container format is sniffed from the
/// decoded bytes and the result is always converted to 3-channel RGB.
pub fn decode(raw: &str) -> Result<DecodedImage, DecodeError> {
    let bytes = decode_base64(raw)?;
    let image = image::load_from_memory(&bytes)?;

    Ok(DecodedImage {
        pixels: image.to_rgb8(),
    })
}

/// Strip the data URL prefix and base64-decode the remaining body
pub fn decode_base64(raw: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let body = match raw.split_once(',') {
        Some((_prefix, body)) => body,
        None => raw,
    };

    // Wrapped base64 (MIME style) carries line breaks the engine rejects
    let body: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    STANDARD.decode(body.as_bytes())
}
