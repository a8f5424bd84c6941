//! Database repositories for the data access layer
//!
//! One module per table. Each defines the repository trait, its PostgreSQL
//! implementation and an in-memory implementation with the same semantics.

pub mod media_asset;
pub mod section_content;
pub mod section_image;

pub use media_asset::{
    InMemoryMediaAssetRepository, MediaAssetRepository, PgMediaAssetRepository,
};
pub use section_content::{
    InMemorySectionContentRepository, PgSectionContentRepository, SectionContentRepository,
};
pub use section_image::{
    InMemorySectionImageRepository, PgSectionImageRepository, SectionImageRepository,
};

use std::sync::{Mutex, MutexGuard};

/// Lock an in-memory table, recovering from a poisoned mutex.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
