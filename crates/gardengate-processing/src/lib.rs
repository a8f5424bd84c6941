//! Garden Gate image processing
//!
//! Adaptive WebP compression to a byte budget, transparency-aware color
//! normalization, and the ingest pipeline that hands the result to an asset store.

pub mod compression;
pub mod encoder;
pub mod error;
pub mod image;
pub mod metadata;
pub mod upload;
pub mod validator;

pub use compression::{AdaptiveCompressor, CompressionConfig, CompressionStrategy, EncodedAsset};
pub use encoder::{StillImageEncoder, WebpEncoder};
pub use error::ProcessingError;
pub use self::image::{ColorMode, ImageProcessor, SourceColor, SourceImage};
pub use metadata::ImageMetadata;
pub use upload::{AssetUploader, IngestPipeline, IngestRequest, UploadedFile};
pub use validator::{MediaValidator, ValidationError};
