//! Image processor - decoding, metadata and alpha inspection

use image::{DynamicImage, GenericImageView, ImageDecoder, ImageFormat, ImageReader};
use std::io::Cursor;

use super::color_mode::{normalize, ColorMode, SourceColor};
use crate::error::ProcessingError;
use crate::metadata::ImageMetadata;

/// A decoded upload, owned by a single request
pub struct SourceImage {
    pub image: DynamicImage,
    pub format: Option<ImageFormat>,
    pub color: SourceColor,
    pub size_bytes: usize,
}

impl SourceImage {
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn target_mode(&self) -> ColorMode {
        self.color.target_mode()
    }

    pub fn metadata(&self) -> ImageMetadata {
        let (width, height) = self.dimensions();
        ImageMetadata {
            width,
            height,
            format: self
                .format
                .map(|f| format!("{:?}", f).to_lowercase())
                .unwrap_or_else(|| "unknown".to_string()),
            size_bytes: Some(self.size_bytes as u64),
            color_mode: self.target_mode(),
        }
    }

    /// Consume the source and return the raster the encoder will see.
    pub fn into_normalized(self) -> (DynamicImage, ColorMode) {
        let mode = self.target_mode();
        (normalize(self.image, mode), mode)
    }
}

pub struct ImageProcessor;

impl ImageProcessor {
    /// Decode raw upload bytes
    pub fn decode(data: &[u8]) -> Result<SourceImage, ProcessingError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ProcessingError::Decode(e.to_string()))?;
        let format = reader.format();
        if format.is_none() {
            return Err(ProcessingError::Decode(
                "unrecognized image format".to_string(),
            ));
        }
        let image = reader.decode()?;
        let color = SourceColor::detect(format, data, &image);

        Ok(SourceImage {
            image,
            format,
            color,
            size_bytes: data.len(),
        })
    }

    /// Whether an encoded buffer carries an alpha channel. Reads the header only.
    pub fn has_alpha(data: &[u8]) -> Result<bool, ProcessingError> {
        let decoder = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ProcessingError::Decode(e.to_string()))?
            .into_decoder()?;
        Ok(decoder.color_type().has_alpha())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    fn crc32(bytes: &[u8]) -> u32 {
        let mut crc = 0xFFFF_FFFFu32;
        for &b in bytes {
            crc ^= b as u32;
            for _ in 0..8 {
                let mask = (!(crc & 1)).wrapping_add(1);
                crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
            }
        }
        !crc
    }

    fn chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        let mut body = kind.to_vec();
        body.extend_from_slice(data);
        out.extend_from_slice(&body);
        out.extend_from_slice(&crc32(&body).to_be_bytes());
    }

    /// 1x1 indexed PNG with a one-entry red palette and an optional tRNS entry.
    fn indexed_png(trns: Option<u8>) -> Vec<u8> {
        let mut png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        chunk(&mut png, b"IHDR", &[0, 0, 0, 1, 0, 0, 0, 1, 8, 3, 0, 0, 0]);
        chunk(&mut png, b"PLTE", &[255, 0, 0]);
        if let Some(alpha) = trns {
            chunk(&mut png, b"tRNS", &[alpha]);
        }
        // zlib stored block holding one scanline: filter 0, index 0
        chunk(
            &mut png,
            b"IDAT",
            &[0x78, 0x01, 0x01, 0x02, 0x00, 0xFD, 0xFF, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01],
        );
        chunk(&mut png, b"IEND", &[]);
        png
    }

    #[test]
    fn test_decode_rejects_non_image() {
        let result = ImageProcessor::decode(b"definitely not an image");
        assert!(matches!(result, Err(ProcessingError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_truncated_png() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([1, 2, 3])));
        let png = encode(&img, ImageFormat::Png);
        let result = ImageProcessor::decode(&png[..png.len() / 2]);
        assert!(matches!(result, Err(ProcessingError::Decode(_))));
    }

    #[test]
    fn test_indexed_png_without_transparency_is_rgb() {
        let source = ImageProcessor::decode(&indexed_png(None)).unwrap();
        assert_eq!(
            source.color,
            SourceColor::Palette { has_transparency: false }
        );
        let (img, mode) = source.into_normalized();
        assert_eq!(mode, ColorMode::Rgb);
        assert_eq!(img.as_rgb8().unwrap().get_pixel(0, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_indexed_png_with_trns_is_rgba() {
        let source = ImageProcessor::decode(&indexed_png(Some(0))).unwrap();
        assert_eq!(source.color, SourceColor::Palette { has_transparency: true });
        let (img, mode) = source.into_normalized();
        assert_eq!(mode, ColorMode::Rgba);
        assert_eq!(img.as_rgba8().unwrap().get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_rgba_png_keeps_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 128])));
        let source = ImageProcessor::decode(&encode(&img, ImageFormat::Png)).unwrap();
        assert_eq!(source.color, SourceColor::Rgba);
        let meta = source.metadata();
        assert_eq!((meta.width, meta.height), (4, 4));
        assert_eq!(meta.format, "png");
        assert_eq!(meta.color_mode, ColorMode::Rgba);
    }

    #[test]
    fn test_jpeg_is_rgb() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([200, 100, 50])));
        let source = ImageProcessor::decode(&encode(&img, ImageFormat::Jpeg)).unwrap();
        assert_eq!(source.target_mode(), ColorMode::Rgb);
    }

    #[test]
    fn test_has_alpha_reads_header() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::new(2, 2));
        let rgb = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        assert!(ImageProcessor::has_alpha(&encode(&rgba, ImageFormat::Png)).unwrap());
        assert!(!ImageProcessor::has_alpha(&encode(&rgb, ImageFormat::Png)).unwrap());
        assert!(ImageProcessor::has_alpha(b"nope").is_err());
    }
}
