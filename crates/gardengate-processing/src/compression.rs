//! Adaptive compression to a byte budget
//!
//! One probe at the top quality, then a binary search over the quality range,
//! then a single Lanczos3 downscale when even the lowest quality is too large.

use gardengate_core::constants::{DEFAULT_IMAGE_MAX_BYTES, TARGET_BUDGET_RATIO};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::encoder::{StillImageEncoder, WebpEncoder};
use crate::error::ProcessingError;
use crate::image::{normalize, ColorMode, ImageProcessor};
use crate::metadata::ImageMetadata;

pub const MAX_QUALITY: u8 = 95;
pub const MIN_QUALITY: u8 = 10;
/// Quality of the single encode after downscaling
pub const FALLBACK_QUALITY: u8 = 85;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionConfig {
    pub max_bytes: usize,
    /// Overrides the default of 93% of `max_bytes`
    pub target_bytes: Option<usize>,
}

impl CompressionConfig {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            target_bytes: None,
        }
    }

    pub fn with_target(mut self, target_bytes: usize) -> Self {
        self.target_bytes = Some(target_bytes);
        self
    }

    pub fn target_bytes(&self) -> usize {
        self.target_bytes
            .unwrap_or_else(|| (self.max_bytes as f64 * TARGET_BUDGET_RATIO).floor() as usize)
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_MAX_BYTES)
    }
}

/// Which branch produced the final buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionStrategy {
    /// The first probe already fit
    Direct,
    QualitySearch,
    /// Nothing fit; resized and encoded once. May exceed the target.
    Downscaled,
}

/// Compressed buffer ready for upload
#[derive(Debug, Clone)]
pub struct EncodedAsset {
    pub data: Vec<u8>,
    pub quality: u8,
    pub color_mode: ColorMode,
    pub width: u32,
    pub height: u32,
    pub strategy: CompressionStrategy,
    pub encode_count: u32,
    /// The decoded upload; `None` when compression started from a raster
    pub source: Option<ImageMetadata>,
}

impl EncodedAsset {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

pub struct AdaptiveCompressor<E = WebpEncoder> {
    config: CompressionConfig,
    encoder: Arc<E>,
}

impl<E> Clone for AdaptiveCompressor<E> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            encoder: Arc::clone(&self.encoder),
        }
    }
}

impl AdaptiveCompressor<WebpEncoder> {
    pub fn new(config: CompressionConfig) -> Self {
        Self::with_encoder(config, WebpEncoder::new())
    }
}

impl Default for AdaptiveCompressor<WebpEncoder> {
    fn default() -> Self {
        Self::new(CompressionConfig::default())
    }
}

impl<E: StillImageEncoder> AdaptiveCompressor<E> {
    pub fn with_encoder(config: CompressionConfig, encoder: E) -> Self {
        Self {
            config,
            encoder: Arc::new(encoder),
        }
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    /// Decode, normalize and compress raw upload bytes
    pub fn compress(&self, data: &[u8]) -> Result<EncodedAsset, ProcessingError> {
        let source = ImageProcessor::decode(data)?;
        let metadata = source.metadata();
        tracing::debug!(
            width = metadata.width,
            height = metadata.height,
            format = %metadata.format,
            color = ?source.color,
            input_bytes = data.len(),
            "Decoded source image"
        );
        let (image, mode) = source.into_normalized();
        let mut encoded = self.compress_owned(image, mode)?;
        encoded.source = Some(metadata);
        Ok(encoded)
    }

    /// Compress an already decoded raster. The raster is normalized to `mode` first.
    pub fn compress_image(
        &self,
        image: &DynamicImage,
        mode: ColorMode,
    ) -> Result<EncodedAsset, ProcessingError> {
        self.compress_owned(normalize(image.clone(), mode), mode)
    }

    /// `working` must already be normalized to `mode`.
    fn compress_owned(
        &self,
        working: DynamicImage,
        mode: ColorMode,
    ) -> Result<EncodedAsset, ProcessingError> {
        let start = Instant::now();
        let target = self.config.target_bytes();
        let (width, height) = working.dimensions();
        let mut encode_count = 0u32;

        let probe = self.encoder.encode(&working, MAX_QUALITY)?;
        encode_count += 1;
        let probe_size = probe.len();
        tracing::debug!(quality = MAX_QUALITY, size = probe_size, target = target, "Probe encode");

        if probe_size <= target {
            return Ok(self.finish(
                probe,
                MAX_QUALITY,
                mode,
                (width, height),
                CompressionStrategy::Direct,
                encode_count,
                start,
            ));
        }

        let mut lo = MIN_QUALITY as i32;
        let mut hi = MAX_QUALITY as i32;
        let mut best: Option<(u8, Vec<u8>)> = None;
        while lo <= hi {
            let quality = ((lo + hi) / 2) as u8;
            let candidate = self.encoder.encode(&working, quality)?;
            encode_count += 1;
            let fits = candidate.len() <= target;
            tracing::debug!(quality = quality, size = candidate.len(), fits = fits, "Quality trial");
            if fits {
                best = Some((quality, candidate));
                lo = quality as i32 + 1;
            } else {
                hi = quality as i32 - 1;
            }
        }

        if let Some((quality, data)) = best {
            return Ok(self.finish(
                data,
                quality,
                mode,
                (width, height),
                CompressionStrategy::QualitySearch,
                encode_count,
                start,
            ));
        }

        let scale = (target as f64 / probe_size as f64).sqrt();
        let new_width = ((width as f64 * scale).floor() as u32).max(1);
        let new_height = ((height as f64 * scale).floor() as u32).max(1);
        tracing::debug!(
            scale = scale,
            width = new_width,
            height = new_height,
            "Minimum quality over budget, downscaling"
        );
        let resized = normalize(
            working.resize_exact(new_width, new_height, FilterType::Lanczos3),
            mode,
        );
        let data = self.encoder.encode(&resized, FALLBACK_QUALITY)?;
        encode_count += 1;

        Ok(self.finish(
            data,
            FALLBACK_QUALITY,
            mode,
            (new_width, new_height),
            CompressionStrategy::Downscaled,
            encode_count,
            start,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        data: Vec<u8>,
        quality: u8,
        color_mode: ColorMode,
        (width, height): (u32, u32),
        strategy: CompressionStrategy,
        encode_count: u32,
        start: Instant,
    ) -> EncodedAsset {
        tracing::debug!(
            strategy = ?strategy,
            quality = quality,
            size = data.len(),
            encode_count = encode_count,
            duration_ms = start.elapsed().as_millis() as u64,
            "Compression finished"
        );
        EncodedAsset {
            data,
            quality,
            color_mode,
            width,
            height,
            strategy,
            encode_count,
            source: None,
        }
    }
}

impl<E: StillImageEncoder + 'static> AdaptiveCompressor<E> {
    /// Run `compress` on the blocking pool
    pub async fn compress_blocking(&self, data: Vec<u8>) -> Result<EncodedAsset, ProcessingError> {
        let compressor = self.clone();
        tokio::task::spawn_blocking(move || compressor.compress(&data))
            .await
            .map_err(|e| ProcessingError::Task(e.to_string()))?
    }
}
