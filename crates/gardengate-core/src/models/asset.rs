use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::derived_url;

/// Outcome of a successful ingest: store URLs, derived delivery URLs and the
/// store's pass-through metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetResult {
    pub url: String,
    pub secure_url: String,
    pub public_id: String,
    pub web_url: String,
    pub thumb_url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<String>,
    pub bytes: Option<u64>,
}

/// Media library record
///
/// `public_id`, `url` and `secure_url` are written once at creation; only the
/// alt text can change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MediaAsset {
    pub id: i64,
    pub url: String,
    pub secure_url: String,
    pub public_id: String,
    pub folder: String,
    pub filename: String,
    pub alt_text: String,
    pub uploaded_at: DateTime<Utc>,
}

impl MediaAsset {
    pub fn thumb_url(&self) -> String {
        derived_url::thumb_url(&self.secure_url)
    }

    pub fn web_url(&self) -> String {
        derived_url::web_url(&self.secure_url)
    }

    /// Label shown in the gallery: the original filename, else the public id.
    pub fn display_name(&self) -> &str {
        if self.filename.is_empty() {
            &self.public_id
        } else {
            &self.filename
        }
    }
}

/// Insert DTO for a media library record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMediaAsset {
    pub url: String,
    pub secure_url: String,
    pub public_id: String,
    pub folder: String,
    pub filename: String,
    pub alt_text: String,
}

impl NewMediaAsset {
    pub fn from_result(
        result: &AssetResult,
        folder: impl Into<String>,
        filename: impl Into<String>,
        alt_text: impl Into<String>,
    ) -> Self {
        Self {
            url: result.url.clone(),
            secure_url: result.secure_url.clone(),
            public_id: result.public_id.clone(),
            folder: folder.into(),
            filename: filename.into(),
            alt_text: alt_text.into(),
        }
    }
}

/// Response for a dashboard upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImageResponse {
    pub success: bool,
    pub id: i64,
    /// The store's `secure_url`
    pub url: String,
    pub web_url: String,
    pub thumb_url: String,
    pub public_id: String,
}

impl UploadedImageResponse {
    pub fn new(asset: &MediaAsset, result: &AssetResult) -> Self {
        Self {
            success: true,
            id: asset.id,
            url: result.secure_url.clone(),
            web_url: result.web_url.clone(),
            thumb_url: result.thumb_url.clone(),
            public_id: result.public_id.clone(),
        }
    }
}

/// Gallery entry for the image picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: i64,
    pub url: String,
    pub thumb_url: String,
    pub filename: String,
    pub alt_text: String,
}

impl From<&MediaAsset> for GalleryItem {
    fn from(asset: &MediaAsset) -> Self {
        GalleryItem {
            id: asset.id,
            url: asset.secure_url.clone(),
            thumb_url: asset.thumb_url(),
            filename: asset.display_name().to_string(),
            alt_text: asset.alt_text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(filename: &str) -> MediaAsset {
        MediaAsset {
            id: 7,
            url: "http://res.cloudinary.com/g/image/upload/v1/garden_gate/rose.webp".to_string(),
            secure_url: "https://res.cloudinary.com/g/image/upload/v1/garden_gate/rose.webp"
                .to_string(),
            public_id: "garden_gate/rose".to_string(),
            folder: "garden_gate".to_string(),
            filename: filename.to_string(),
            alt_text: "A rose".to_string(),
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn test_gallery_item_uses_shared_thumb_rule() {
        let asset = asset("rose.png");
        let item = GalleryItem::from(&asset);
        assert_eq!(item.url, asset.secure_url);
        assert_eq!(
            item.thumb_url,
            asset
                .secure_url
                .replace("/upload/", "/upload/f_webp,q_80,w_400/")
        );
        assert_eq!(item.filename, "rose.png");
    }

    #[test]
    fn test_gallery_falls_back_to_public_id() {
        let item = GalleryItem::from(&asset(""));
        assert_eq!(item.filename, "garden_gate/rose");
    }
}
