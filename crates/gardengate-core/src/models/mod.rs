//! Data models for the application
//!
//! Media library records, section image slots and the typed singleton
//! section documents edited from the dashboard.

mod asset;
pub mod section_content;
mod section_image;

pub use asset::*;
pub use section_content::{SectionContent, SectionForm};
pub use section_image::*;
