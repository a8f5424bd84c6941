//! Garden Gate Storage Library
//!
//! This crate provides the asset store abstraction and its backends: a
//! Cloudinary-compatible signed HTTP upload, the local filesystem, and an
//! in-memory store.
//!
//! # Delivery URL layout
//!
//! Every backend returns URLs containing an `/upload/` path segment followed by
//! `{folder}/{public_id}`, so the shared derived URL rule applies to all of them.
//! Key generation lives in the `keys` module so backends stay consistent.

#[cfg(feature = "storage-cloudinary")]
pub mod cloudinary;
pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-cloudinary")]
pub use cloudinary::{CloudinaryCredentials, CloudinaryStore};
pub use factory::create_asset_store;
pub use gardengate_core::AssetStoreBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalAssetStore;
pub use memory::InMemoryAssetStore;
pub use traits::{AssetStore, AssetUpload, DeliveryPolicy, StorageError, StorageResult, StoredAsset};
