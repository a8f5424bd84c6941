//! Upload stage: hand an encoded buffer to the asset store.

use std::sync::Arc;
use std::time::Instant;

use gardengate_core::models::AssetResult;
use gardengate_core::{AppError, DerivedVariant};
use gardengate_storage::{AssetStore, AssetUpload, DeliveryPolicy};

use crate::image::ImageProcessor;

#[derive(Clone)]
pub struct AssetUploader {
    store: Arc<dyn AssetStore>,
}

impl AssetUploader {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn AssetStore> {
        &self.store
    }

    /// Upload an encoded image and build its derived delivery URLs.
    ///
    /// The delivery policy comes from the encoded buffer itself: with alpha the
    /// store must keep serving WebP, otherwise it may pick the format.
    #[tracing::instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn upload(
        &self,
        data: Vec<u8>,
        folder: &str,
        public_id: &str,
    ) -> Result<AssetResult, AppError> {
        let has_alpha = ImageProcessor::has_alpha(&data)?;
        let delivery = DeliveryPolicy::for_alpha(has_alpha);
        let start = Instant::now();

        let stored = self
            .store
            .upload(AssetUpload {
                data,
                folder: folder.to_string(),
                public_id: public_id.to_string(),
                delivery,
            })
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, backend = %self.store.backend_type(), "Asset upload failed");
                AppError::from(e)
            })?;

        tracing::info!(
            public_id = %stored.public_id,
            delivery = delivery.transformation(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Asset uploaded"
        );

        let web_url = self.store.derived_url(&stored.secure_url, DerivedVariant::Web);
        let thumb_url = self
            .store
            .derived_url(&stored.secure_url, DerivedVariant::Thumb);

        Ok(AssetResult {
            url: stored.url,
            secure_url: stored.secure_url,
            public_id: stored.public_id,
            web_url,
            thumb_url,
            width: stored.width,
            height: stored.height,
            format: stored.format,
            bytes: stored.bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{StillImageEncoder, WebpEncoder};
    use gardengate_storage::InMemoryAssetStore;
    use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

    fn webp(img: &DynamicImage) -> Vec<u8> {
        WebpEncoder::new().encode(img, 80).unwrap()
    }

    fn transparent() -> DynamicImage {
        let mut buf = RgbaImage::from_pixel(16, 16, Rgba([0, 128, 0, 255]));
        buf.put_pixel(3, 3, Rgba([0, 0, 0, 0]));
        DynamicImage::ImageRgba8(buf)
    }

    #[tokio::test]
    async fn test_alpha_forces_webp_delivery() {
        let store = Arc::new(InMemoryAssetStore::new());
        let uploader = AssetUploader::new(store.clone());

        uploader
            .upload(webp(&transparent()), "garden_gate", "logo")
            .await
            .unwrap();

        assert_eq!(store.uploads()[0].delivery, DeliveryPolicy::ForceWebp);
    }

    #[tokio::test]
    async fn test_opaque_gets_auto_delivery_and_derived_urls() {
        let store = Arc::new(InMemoryAssetStore::new());
        let uploader = AssetUploader::new(store.clone());
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([9, 9, 9])));

        let result = uploader
            .upload(webp(&img), "garden_gate", "hero")
            .await
            .unwrap();

        let upload = &store.uploads()[0];
        assert_eq!(upload.delivery, DeliveryPolicy::Auto);
        assert_eq!(upload.folder, "garden_gate");
        assert_eq!(upload.public_id, "hero");

        assert_eq!(
            result.web_url,
            result.secure_url.replace("/upload/", "/upload/f_webp,q_80,w_1920/")
        );
        assert_eq!(
            result.thumb_url,
            result.secure_url.replace("/upload/", "/upload/f_webp,q_80,w_400/")
        );
        assert_eq!(result.format.as_deref(), Some("webp"));
    }

    #[tokio::test]
    async fn test_store_failure_is_verbatim() {
        let store = Arc::new(InMemoryAssetStore::failing("Invalid Signature 1234"));
        let uploader = AssetUploader::new(store);
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));

        let err = uploader
            .upload(webp(&img), "garden_gate", "x")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upload(ref m) if m == "Invalid Signature 1234"));
    }
}
