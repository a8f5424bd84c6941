//! Color mode detection and normalization
//!
//! The WebP encoder only accepts 8-bit RGB or RGBA. Every source is mapped onto
//! one of the two before the first encode, keeping alpha only when the source
//! can actually be transparent.

use image::{DynamicImage, ImageFormat};
use img_parts::png::Png;
use serde::{Deserialize, Serialize};

const PNG_IHDR: [u8; 4] = *b"IHDR";
const PNG_TRNS: [u8; 4] = *b"tRNS";
const PNG_COLOR_TYPE_OFFSET: usize = 9;
const PNG_COLOR_TYPE_INDEXED: u8 = 3;

/// Working color mode handed to the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Rgb,
    Rgba,
}

impl ColorMode {
    pub fn has_alpha(self) -> bool {
        matches!(self, ColorMode::Rgba)
    }
}

/// Color layout of the source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceColor {
    Rgb,
    Rgba,
    /// Palette-indexed; transparent when the palette carries a transparency entry
    Palette { has_transparency: bool },
    GrayAlpha,
    /// Grayscale, 16-bit, float and anything else
    Other { has_alpha: bool },
}

impl SourceColor {
    /// Classify a decoded image. `data` is only consulted for palette detection.
    pub fn detect(format: Option<ImageFormat>, data: &[u8], decoded: &DynamicImage) -> Self {
        match format {
            Some(ImageFormat::Png) => {
                if let Some(has_transparency) = png_palette_transparency(data) {
                    return SourceColor::Palette { has_transparency };
                }
            }
            // GIF is always indexed; the transparent index decodes to alpha 0
            Some(ImageFormat::Gif) => {
                return SourceColor::Palette {
                    has_transparency: has_translucent_pixel(decoded),
                };
            }
            _ => {}
        }

        match decoded {
            DynamicImage::ImageRgb8(_) => SourceColor::Rgb,
            DynamicImage::ImageRgba8(_) => SourceColor::Rgba,
            DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLumaA16(_) => SourceColor::GrayAlpha,
            other => SourceColor::Other {
                has_alpha: other.color().has_alpha(),
            },
        }
    }

    pub fn target_mode(self) -> ColorMode {
        let keep_alpha = match self {
            SourceColor::Rgb => false,
            SourceColor::Rgba => true,
            SourceColor::Palette { has_transparency } => has_transparency,
            SourceColor::GrayAlpha => true,
            SourceColor::Other { has_alpha } => has_alpha,
        };
        if keep_alpha {
            ColorMode::Rgba
        } else {
            ColorMode::Rgb
        }
    }
}

/// Convert to 8-bit RGB/RGBA; a raster already in the target layout is returned untouched.
pub fn normalize(image: DynamicImage, mode: ColorMode) -> DynamicImage {
    match (mode, image) {
        (ColorMode::Rgb, img @ DynamicImage::ImageRgb8(_)) => img,
        (ColorMode::Rgba, img @ DynamicImage::ImageRgba8(_)) => img,
        (ColorMode::Rgb, img) => DynamicImage::ImageRgb8(img.to_rgb8()),
        (ColorMode::Rgba, img) => DynamicImage::ImageRgba8(img.to_rgba8()),
    }
}

/// `Some(has_tRNS)` for an indexed PNG, `None` for any other PNG.
fn png_palette_transparency(data: &[u8]) -> Option<bool> {
    let png = Png::from_bytes(bytes::Bytes::copy_from_slice(data)).ok()?;
    let ihdr = png.chunk_by_type(PNG_IHDR)?;
    let color_type = *ihdr.contents().get(PNG_COLOR_TYPE_OFFSET)?;
    if color_type != PNG_COLOR_TYPE_INDEXED {
        return None;
    }
    Some(png.chunk_by_type(PNG_TRNS).is_some())
}

fn has_translucent_pixel(image: &DynamicImage) -> bool {
    match image {
        DynamicImage::ImageRgba8(buf) => buf.pixels().any(|p| p.0[3] < u8::MAX),
        other if other.color().has_alpha() => other.to_rgba8().pixels().any(|p| p.0[3] < u8::MAX),
        _ => false,
    }
}
