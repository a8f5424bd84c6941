use async_trait::async_trait;
use chrono::Utc;
use gardengate_core::models::{MediaAsset, NewMediaAsset};
use gardengate_core::AppError;
use sqlx::{PgPool, Postgres};
use std::sync::Mutex;

use super::lock;

const MEDIA_ASSET_COLUMNS: &str =
    "id, url, secure_url, public_id, folder, filename, alt_text, uploaded_at";

/// Media library records. Only the alt text can change after creation.
#[async_trait]
pub trait MediaAssetRepository: Send + Sync {
    async fn create(&self, asset: NewMediaAsset) -> Result<MediaAsset, AppError>;

    async fn get(&self, id: i64) -> Result<Option<MediaAsset>, AppError>;

    /// All records, newest first
    async fn list(&self) -> Result<Vec<MediaAsset>, AppError>;

    async fn update_alt_text(
        &self,
        id: i64,
        alt_text: &str,
    ) -> Result<Option<MediaAsset>, AppError>;
}

#[derive(Clone)]
pub struct PgMediaAssetRepository {
    pool: PgPool,
}

impl PgMediaAssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaAssetRepository for PgMediaAssetRepository {
    #[tracing::instrument(skip(self, asset), fields(db.table = "media_assets", db.operation = "insert", public_id = %asset.public_id))]
    async fn create(&self, asset: NewMediaAsset) -> Result<MediaAsset, AppError> {
        let query = format!(
            r#"
            INSERT INTO media_assets (url, secure_url, public_id, folder, filename, alt_text)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            MEDIA_ASSET_COLUMNS
        );
        let created = sqlx::query_as::<Postgres, MediaAsset>(&query)
            .bind(&asset.url)
            .bind(&asset.secure_url)
            .bind(&asset.public_id)
            .bind(&asset.folder)
            .bind(&asset.filename)
            .bind(&asset.alt_text)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    #[tracing::instrument(skip(self), fields(db.table = "media_assets", db.operation = "select", db.record_id = id))]
    async fn get(&self, id: i64) -> Result<Option<MediaAsset>, AppError> {
        let query = format!("SELECT {} FROM media_assets WHERE id = $1", MEDIA_ASSET_COLUMNS);
        let asset = sqlx::query_as::<Postgres, MediaAsset>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(asset)
    }

    #[tracing::instrument(skip(self), fields(db.table = "media_assets", db.operation = "select"))]
    async fn list(&self) -> Result<Vec<MediaAsset>, AppError> {
        let query = format!(
            "SELECT {} FROM media_assets ORDER BY uploaded_at DESC, id DESC",
            MEDIA_ASSET_COLUMNS
        );
        let assets = sqlx::query_as::<Postgres, MediaAsset>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(assets)
    }

    #[tracing::instrument(skip(self, alt_text), fields(db.table = "media_assets", db.operation = "update", db.record_id = id))]
    async fn update_alt_text(
        &self,
        id: i64,
        alt_text: &str,
    ) -> Result<Option<MediaAsset>, AppError> {
        let query = format!(
            "UPDATE media_assets SET alt_text = $2 WHERE id = $1 RETURNING {}",
            MEDIA_ASSET_COLUMNS
        );
        let asset = sqlx::query_as::<Postgres, MediaAsset>(&query)
            .bind(id)
            .bind(alt_text)
            .fetch_optional(&self.pool)
            .await?;

        Ok(asset)
    }
}

#[derive(Default)]
pub struct InMemoryMediaAssetRepository {
    rows: Mutex<Vec<MediaAsset>>,
}

impl InMemoryMediaAssetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.rows).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MediaAssetRepository for InMemoryMediaAssetRepository {
    async fn create(&self, asset: NewMediaAsset) -> Result<MediaAsset, AppError> {
        let mut rows = lock(&self.rows);
        let id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let created = MediaAsset {
            id,
            url: asset.url,
            secure_url: asset.secure_url,
            public_id: asset.public_id,
            folder: asset.folder,
            filename: asset.filename,
            alt_text: asset.alt_text,
            uploaded_at: Utc::now(),
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn get(&self, id: i64) -> Result<Option<MediaAsset>, AppError> {
        Ok(lock(&self.rows).iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<MediaAsset>, AppError> {
        let mut rows = lock(&self.rows).clone();
        rows.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn update_alt_text(
        &self,
        id: i64,
        alt_text: &str,
    ) -> Result<Option<MediaAsset>, AppError> {
        let mut rows = lock(&self.rows);
        Ok(rows.iter_mut().find(|r| r.id == id).map(|row| {
            row.alt_text = alt_text.to_string();
            row.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_asset(name: &str) -> NewMediaAsset {
        NewMediaAsset {
            url: format!("http://res.cloudinary.com/g/image/upload/v1/garden_gate/{}.webp", name),
            secure_url: format!(
                "https://res.cloudinary.com/g/image/upload/v1/garden_gate/{}.webp",
                name
            ),
            public_id: format!("garden_gate/{}", name),
            folder: "garden_gate".to_string(),
            filename: format!("{}.png", name),
            alt_text: String::new(),
        }
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = InMemoryMediaAssetRepository::new();
        repo.create(new_asset("first")).await.unwrap();
        repo.create(new_asset("second")).await.unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].public_id, "garden_gate/second");
        assert_eq!(listed[1].public_id, "garden_gate/first");
    }

    #[tokio::test]
    async fn test_update_alt_text_keeps_urls() {
        let repo = InMemoryMediaAssetRepository::new();
        let created = repo.create(new_asset("rose")).await.unwrap();

        let updated = repo
            .update_alt_text(created.id, "A red rose")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.alt_text, "A red rose");
        assert_eq!(updated.secure_url, created.secure_url);
        assert_eq!(updated.public_id, created.public_id);

        assert!(repo.update_alt_text(999, "x").await.unwrap().is_none());
        assert!(repo.get(999).await.unwrap().is_none());
    }
}
