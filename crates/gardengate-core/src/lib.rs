//! Garden Gate Core Library
//!
//! This crate provides the domain models, error types, configuration and the derived
//! delivery URL rule that are shared across all Garden Gate components.

pub mod config;
pub mod constants;
pub mod derived_url;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod telemetry;

// Re-export commonly used types
pub use config::{BaseConfig, CmsConfig, Config};
pub use derived_url::{rewrite_upload_url, thumb_url, web_url, DerivedUrlBuilder, DerivedVariant};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::{AssetStoreBackend, SignatureAlgorithm};
// Note: AssetStore, StorageError, StorageResult live in gardengate-storage
