//! Still-image encoders

use image::DynamicImage;

use crate::error::ProcessingError;

/// Slowest, densest libwebp method
pub const WEBP_METHOD: i32 = 6;

/// Lossy still-image encoder driven by the compressor.
///
/// Implementations receive an 8-bit RGB or RGBA raster and must keep its
/// channel layout.
pub trait StillImageEncoder: Send + Sync {
    fn encode(&self, image: &DynamicImage, quality: u8) -> Result<Vec<u8>, ProcessingError>;
}

/// libwebp lossy encoder
#[derive(Debug, Clone, Copy)]
pub struct WebpEncoder {
    method: i32,
}

impl WebpEncoder {
    pub fn new() -> Self {
        Self {
            method: WEBP_METHOD,
        }
    }
}

impl Default for WebpEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StillImageEncoder for WebpEncoder {
    fn encode(&self, image: &DynamicImage, quality: u8) -> Result<Vec<u8>, ProcessingError> {
        let encoder = webp::Encoder::from_image(image)
            .map_err(|e| ProcessingError::Encode(e.to_string()))?;

        let mut config = webp::WebPConfig::new()
            .map_err(|_| ProcessingError::Encode("invalid WebP config".to_string()))?;
        config.lossless = 0;
        config.quality = quality as f32;
        config.method = self.method;

        let memory = encoder
            .encode_advanced(&config)
            .map_err(|e| ProcessingError::Encode(format!("{:?}", e)))?;

        Ok(memory.to_vec())
    }
}
