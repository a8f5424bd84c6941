use async_trait::async_trait;
use chrono::Utc;
use gardengate_core::models::SectionImage;
use gardengate_core::AppError;
use sqlx::{PgPool, Postgres};
use std::sync::Mutex;

use super::lock;

const SECTION_IMAGE_COLUMNS: &str = "id, section_name, display_name, image_url, image_alt, icon_url, background_image_url, updated_at";

#[async_trait]
pub trait SectionImageRepository: Send + Sync {
    /// Fetch a section by name, creating an empty slot when absent.
    /// The flag is true when the row was created by this call.
    async fn get_or_create(
        &self,
        section_name: &str,
        display_name: &str,
    ) -> Result<(SectionImage, bool), AppError>;

    async fn get(&self, id: i64) -> Result<Option<SectionImage>, AppError>;

    async fn get_by_name(&self, section_name: &str) -> Result<Option<SectionImage>, AppError>;

    /// All sections ordered by display name
    async fn list(&self) -> Result<Vec<SectionImage>, AppError>;

    /// Persist the URL and alt fields of an existing section
    async fn save(&self, section: &SectionImage) -> Result<SectionImage, AppError>;
}

#[derive(Clone)]
pub struct PgSectionImageRepository {
    pool: PgPool,
}

impl PgSectionImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SectionImageRepository for PgSectionImageRepository {
    #[tracing::instrument(skip(self), fields(db.table = "section_images", db.operation = "upsert"))]
    async fn get_or_create(
        &self,
        section_name: &str,
        display_name: &str,
    ) -> Result<(SectionImage, bool), AppError> {
        let insert = format!(
            r#"
            INSERT INTO section_images (section_name, display_name)
            VALUES ($1, $2)
            ON CONFLICT (section_name) DO NOTHING
            RETURNING {}
            "#,
            SECTION_IMAGE_COLUMNS
        );
        let created = sqlx::query_as::<Postgres, SectionImage>(&insert)
            .bind(section_name)
            .bind(display_name)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(section) = created {
            tracing::debug!(section = %section_name, "Section image created");
            return Ok((section, true));
        }

        let existing = self.get_by_name(section_name).await?.ok_or_else(|| {
            AppError::Internal(format!("Section '{}' vanished during upsert", section_name))
        })?;
        Ok((existing, false))
    }

    #[tracing::instrument(skip(self), fields(db.table = "section_images", db.operation = "select", db.record_id = id))]
    async fn get(&self, id: i64) -> Result<Option<SectionImage>, AppError> {
        let query = format!("SELECT {} FROM section_images WHERE id = $1", SECTION_IMAGE_COLUMNS);
        let section = sqlx::query_as::<Postgres, SectionImage>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(section)
    }

    #[tracing::instrument(skip(self), fields(db.table = "section_images", db.operation = "select"))]
    async fn get_by_name(&self, section_name: &str) -> Result<Option<SectionImage>, AppError> {
        let query = format!(
            "SELECT {} FROM section_images WHERE section_name = $1",
            SECTION_IMAGE_COLUMNS
        );
        let section = sqlx::query_as::<Postgres, SectionImage>(&query)
            .bind(section_name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(section)
    }

    #[tracing::instrument(skip(self), fields(db.table = "section_images", db.operation = "select"))]
    async fn list(&self) -> Result<Vec<SectionImage>, AppError> {
        let query = format!(
            "SELECT {} FROM section_images ORDER BY display_name ASC",
            SECTION_IMAGE_COLUMNS
        );
        let sections = sqlx::query_as::<Postgres, SectionImage>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(sections)
    }

    #[tracing::instrument(skip(self, section), fields(db.table = "section_images", db.operation = "update", db.record_id = section.id))]
    async fn save(&self, section: &SectionImage) -> Result<SectionImage, AppError> {
        let query = format!(
            r#"
            UPDATE section_images
            SET image_url = $2, image_alt = $3, icon_url = $4, background_image_url = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SECTION_IMAGE_COLUMNS
        );
        let saved = sqlx::query_as::<Postgres, SectionImage>(&query)
            .bind(section.id)
            .bind(&section.image_url)
            .bind(&section.image_alt)
            .bind(&section.icon_url)
            .bind(&section.background_image_url)
            .fetch_optional(&self.pool)
            .await?;

        saved.ok_or_else(|| AppError::NotFound(format!("Section image {}", section.id)))
    }
}

#[derive(Default)]
pub struct InMemorySectionImageRepository {
    rows: Mutex<Vec<SectionImage>>,
}

impl InMemorySectionImageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SectionImageRepository for InMemorySectionImageRepository {
    async fn get_or_create(
        &self,
        section_name: &str,
        display_name: &str,
    ) -> Result<(SectionImage, bool), AppError> {
        let mut rows = lock(&self.rows);
        if let Some(existing) = rows.iter().find(|r| r.section_name == section_name) {
            return Ok((existing.clone(), false));
        }
        let id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let section = SectionImage {
            id,
            section_name: section_name.to_string(),
            display_name: display_name.to_string(),
            image_url: None,
            image_alt: String::new(),
            icon_url: None,
            background_image_url: None,
            updated_at: Utc::now(),
        };
        rows.push(section.clone());
        Ok((section, true))
    }

    async fn get(&self, id: i64) -> Result<Option<SectionImage>, AppError> {
        Ok(lock(&self.rows).iter().find(|r| r.id == id).cloned())
    }

    async fn get_by_name(&self, section_name: &str) -> Result<Option<SectionImage>, AppError> {
        Ok(lock(&self.rows)
            .iter()
            .find(|r| r.section_name == section_name)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<SectionImage>, AppError> {
        let mut rows = lock(&self.rows).clone();
        rows.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(rows)
    }

    async fn save(&self, section: &SectionImage) -> Result<SectionImage, AppError> {
        let mut rows = lock(&self.rows);
        let row = rows
            .iter_mut()
            .find(|r| r.id == section.id)
            .ok_or_else(|| AppError::NotFound(format!("Section image {}", section.id)))?;
        row.image_url = section.image_url.clone();
        row.image_alt = section.image_alt.clone();
        row.icon_url = section.icon_url.clone();
        row.background_image_url = section.background_image_url.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let repo = InMemorySectionImageRepository::new();
        let (first, created) = repo
            .get_or_create("hero_image", "Hero Section - Main Image")
            .await
            .unwrap();
        assert!(created);
        assert_eq!(first.image_alt, "");
        assert!(first.image_url.is_none());

        let (second, created) = repo.get_or_create("hero_image", "ignored").await.unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);
        assert_eq!(second.display_name, "Hero Section - Main Image");
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_by_display_name() {
        let repo = InMemorySectionImageRepository::new();
        repo.get_or_create("b", "Zeta").await.unwrap();
        repo.get_or_create("a", "Alpha").await.unwrap();

        let names: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.display_name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[tokio::test]
    async fn test_save_updates_fields() {
        let repo = InMemorySectionImageRepository::new();
        let (mut section, _) = repo.get_or_create("about_image", "About").await.unwrap();
        section.image_url = Some("https://cdn/about.webp".to_string());
        section.image_alt = "Team".to_string();
        repo.save(&section).await.unwrap();

        let stored = repo.get_by_name("about_image").await.unwrap().unwrap();
        assert_eq!(stored.image_url.as_deref(), Some("https://cdn/about.webp"));
        assert_eq!(stored.image_alt, "Team");

        section.id = 42;
        assert!(matches!(repo.save(&section).await, Err(AppError::NotFound(_))));
    }
}
