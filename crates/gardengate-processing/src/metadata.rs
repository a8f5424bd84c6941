use serde::{Deserialize, Serialize};

use crate::image::ColorMode;

/// What the pipeline learned about an upload before encoding it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub size_bytes: Option<u64>,
    /// Mode after normalization, i.e. what the encoder receives
    pub color_mode: ColorMode,
}
