//! Image processing module
//!
//! - Decoding and alpha inspection (processor)
//! - Source color detection and RGB/RGBA normalization (color_mode)

pub mod color_mode;
pub mod processor;

pub use color_mode::{normalize, ColorMode, SourceColor};
pub use processor::{ImageProcessor, SourceImage};
