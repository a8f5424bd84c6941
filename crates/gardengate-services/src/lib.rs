//! Garden Gate Services Layer
//!
//! Orchestration between the ingest pipeline, the asset store and the
//! repositories: the media library, section image slots and typed section
//! content. The services also re-export the processing and storage types they
//! accept so callers can depend on this crate alone.

pub mod services;

pub use gardengate_processing::{IngestPipeline, IngestRequest, UploadedFile};
pub use gardengate_storage::{create_asset_store, AssetStore};
pub use services::content::ContentStore;
pub use services::media_library::MediaLibrary;
pub use services::section_images::{DashboardSections, SectionImageService};
