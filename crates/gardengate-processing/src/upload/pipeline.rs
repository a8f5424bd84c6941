//! Ingest pipeline: validate → compress → upload.
//!
//! The pipeline produces an [`AssetResult`] and nothing else. Persisting a
//! media record is left to the caller, which only does so after a complete result.

use std::sync::Arc;

use gardengate_core::models::AssetResult;
use gardengate_core::{AppError, Config};
use gardengate_storage::AssetStore;

use super::types::IngestRequest;
use super::uploader::AssetUploader;
use crate::compression::{AdaptiveCompressor, CompressionConfig};
use crate::encoder::{StillImageEncoder, WebpEncoder};
use crate::validator::MediaValidator;

pub struct IngestPipeline<E = WebpEncoder> {
    compressor: AdaptiveCompressor<E>,
    uploader: AssetUploader,
    validator: MediaValidator,
    default_folder: String,
}

impl IngestPipeline<WebpEncoder> {
    pub fn from_config(config: &Config, store: Arc<dyn AssetStore>) -> Self {
        Self::new(
            AdaptiveCompressor::new(CompressionConfig::new(config.image_max_bytes())),
            AssetUploader::new(store),
            MediaValidator::new(config.max_upload_size_bytes()),
            config.default_asset_folder(),
        )
    }
}

impl<E: StillImageEncoder + 'static> IngestPipeline<E> {
    pub fn new(
        compressor: AdaptiveCompressor<E>,
        uploader: AssetUploader,
        validator: MediaValidator,
        default_folder: impl Into<String>,
    ) -> Self {
        Self {
            compressor,
            uploader,
            validator,
            default_folder: default_folder.into(),
        }
    }

    pub fn default_folder(&self) -> &str {
        &self.default_folder
    }

    /// Compress the attached image and upload it.
    ///
    /// Consumes the request so the upload bytes move to the blocking pool.
    /// Fails with `MissingFile` before any decode when nothing is attached.
    #[tracing::instrument(skip(self, request), fields(filename = %request.filename()))]
    pub async fn ingest(&self, request: IngestRequest) -> Result<AssetResult, AppError> {
        let folder = request.folder_or(&self.default_folder).to_string();
        let public_id = request.resolved_public_id();
        let file = self.validator.validate_upload(request.file)?;
        let input_bytes = file.data.len();

        let encoded = self.compressor.compress_blocking(file.data).await?;
        tracing::debug!(
            strategy = ?encoded.strategy,
            quality = encoded.quality,
            color_mode = ?encoded.color_mode,
            source_format = encoded.source.as_ref().map(|s| s.format.as_str()),
            input_bytes = input_bytes,
            output_bytes = encoded.size(),
            "Image compressed"
        );

        self.uploader.upload(encoded.data, &folder, &public_id).await
    }
}
