//! Asset store abstraction
//!
//! This module defines the AssetStore trait that every upload backend implements.

use crate::AssetStoreBackend;
use async_trait::async_trait;
use gardengate_core::derived_url::{rewrite_upload_url, DerivedVariant};
use gardengate_core::AppError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Rejected or unreachable; carries the store's message verbatim.
    #[error("{0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UploadFailed(msg) => AppError::Upload(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::IoError(e) => AppError::Upload(e.to_string()),
            StorageError::BackendError(msg) => AppError::Upload(msg),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

/// Declared on every upload
pub const RESOURCE_TYPE: &str = "image";
pub const STORED_FORMAT: &str = "webp";
pub const ACCESS_MODE: &str = "public";

/// How the store may re-encode the asset when serving it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryPolicy {
    /// Alpha present: always serve WebP so transparency survives.
    ForceWebp,
    /// Opaque: the store picks the best format per client.
    Auto,
}

impl DeliveryPolicy {
    pub fn for_alpha(has_alpha: bool) -> Self {
        if has_alpha {
            DeliveryPolicy::ForceWebp
        } else {
            DeliveryPolicy::Auto
        }
    }

    /// Chained transformation: automatic quality, then format.
    pub fn transformation(&self) -> &'static str {
        match self {
            DeliveryPolicy::ForceWebp => "q_auto/f_webp",
            DeliveryPolicy::Auto => "q_auto/f_auto",
        }
    }
}

/// One upload request
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub data: Vec<u8>,
    pub folder: String,
    pub public_id: String,
    pub delivery: DeliveryPolicy,
}

/// The store's answer; the pass-through metadata may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAsset {
    pub url: String,
    pub secure_url: String,
    pub public_id: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub bytes: Option<u64>,
}

/// Asset store abstraction
///
/// A store accepts an encoded image and answers with its delivery URLs. Derived
/// variants come from the shared `/upload/` rewrite unless a backend overrides it.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Upload one asset. No retry is attempted.
    async fn upload(&self, upload: AssetUpload) -> StorageResult<StoredAsset>;

    /// Delivery URL for a variant of a stored asset.
    fn derived_url(&self, secure_url: &str, variant: DerivedVariant) -> String {
        rewrite_upload_url(secure_url, variant)
    }

    /// Get the asset store backend type
    fn backend_type(&self) -> AssetStoreBackend;
}

#[cfg(test)]
mod tests {
    use super::*;
    use gardengate_core::ErrorMetadata;

    #[test]
    fn test_delivery_policy() {
        assert_eq!(DeliveryPolicy::for_alpha(true), DeliveryPolicy::ForceWebp);
        assert_eq!(DeliveryPolicy::for_alpha(false).transformation(), "q_auto/f_auto");
        assert_eq!(DeliveryPolicy::ForceWebp.transformation(), "q_auto/f_webp");
    }

    #[test]
    fn test_upload_failure_maps_to_upload_error() {
        let err: AppError = StorageError::UploadFailed("Invalid Signature".to_string()).into();
        assert!(matches!(err, AppError::Upload(ref m) if m == "Invalid Signature"));
        assert_eq!(err.client_message(), "Invalid Signature");
    }
}
