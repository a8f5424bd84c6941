//! Media library: ingest, persist, list.

use std::sync::Arc;

use gardengate_core::models::{GalleryItem, MediaAsset, NewMediaAsset, UploadedImageResponse};
use gardengate_core::AppError;
use gardengate_db::MediaAssetRepository;
use gardengate_processing::{IngestPipeline, IngestRequest};

#[derive(Clone)]
pub struct MediaLibrary {
    pipeline: Arc<IngestPipeline>,
    assets: Arc<dyn MediaAssetRepository>,
}

impl MediaLibrary {
    pub fn new(pipeline: Arc<IngestPipeline>, assets: Arc<dyn MediaAssetRepository>) -> Self {
        Self { pipeline, assets }
    }

    /// Ingest an upload and record it in the library.
    ///
    /// The record is only written once the store returned a complete result.
    #[tracing::instrument(skip(self, request), fields(filename = %request.filename()))]
    pub async fn upload_image(
        &self,
        request: IngestRequest,
    ) -> Result<UploadedImageResponse, AppError> {
        let folder = request.folder_or(self.pipeline.default_folder()).to_string();
        let filename = request.filename().to_string();
        let alt_text = request.alt_text.clone();

        let result = self.pipeline.ingest(request).await?;

        let record = NewMediaAsset::from_result(&result, folder, filename, alt_text);
        let asset = self.assets.create(record).await?;

        tracing::info!(id = asset.id, public_id = %asset.public_id, "Media asset recorded");
        Ok(UploadedImageResponse::new(&asset, &result))
    }

    /// Library entries for the image picker, newest first
    pub async fn gallery(&self) -> Result<Vec<GalleryItem>, AppError> {
        let assets = self.assets.list().await?;
        Ok(assets.iter().map(GalleryItem::from).collect())
    }

    pub async fn update_alt_text(&self, id: i64, alt_text: &str) -> Result<MediaAsset, AppError> {
        self.assets
            .update_alt_text(id, alt_text)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Media asset {}", id)))
    }
}
