//! Upload module: ingest request types, the upload stage and the end-to-end pipeline

pub mod pipeline;
pub mod types;
pub mod uploader;

pub use pipeline::IngestPipeline;
pub use types::{resolve_public_id, IngestRequest, UploadedFile};
pub use uploader::AssetUploader;
