//! Shared constants

/// Hard ceiling for a compressed image: 10 MiB.
pub const DEFAULT_IMAGE_MAX_BYTES: usize = 10 * 1024 * 1024;

/// Fraction of the ceiling the compressor aims for.
pub const TARGET_BUDGET_RATIO: f64 = 0.93;

/// Folder used when the caller does not name one.
pub const DEFAULT_ASSET_FOLDER: &str = "garden_gate";

/// Filename assumed when an upload carries no name.
pub const DEFAULT_UPLOAD_FILENAME: &str = "image.jpg";

/// Raw upload cap checked before decoding, in megabytes.
pub const DEFAULT_MAX_UPLOAD_SIZE_MB: usize = 50;

pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com";

pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
