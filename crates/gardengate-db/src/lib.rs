//! Garden Gate persistence
//!
//! Repository traits with a PostgreSQL implementation each, plus in-memory
//! implementations used by the service layer tests.

pub mod db;
pub mod setup;

pub use db::{
    InMemoryMediaAssetRepository, InMemorySectionContentRepository,
    InMemorySectionImageRepository, MediaAssetRepository, PgMediaAssetRepository,
    PgSectionContentRepository, PgSectionImageRepository, SectionContentRepository,
    SectionImageRepository,
};
pub use setup::setup_database;
