pub mod content;
pub mod media_library;
pub mod section_images;
