use async_trait::async_trait;
use gardengate_core::AppError;
use serde_json::Value;
use sqlx::{PgPool, Postgres};
use std::collections::HashMap;
use std::sync::Mutex;

use super::lock;

/// Raw JSON documents keyed by section. Typing is the service layer's job.
#[async_trait]
pub trait SectionContentRepository: Send + Sync {
    async fn load(&self, section_key: &str) -> Result<Option<Value>, AppError>;

    /// Insert `content` unless the key already exists; returns the stored document.
    async fn insert_if_absent(&self, section_key: &str, content: Value)
        -> Result<Value, AppError>;

    /// Insert or replace the document for `section_key`
    async fn store(&self, section_key: &str, content: Value) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PgSectionContentRepository {
    pool: PgPool,
}

impl PgSectionContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SectionContentRepository for PgSectionContentRepository {
    #[tracing::instrument(skip(self), fields(db.table = "section_content", db.operation = "select"))]
    async fn load(&self, section_key: &str) -> Result<Option<Value>, AppError> {
        let content = sqlx::query_scalar::<Postgres, Value>(
            "SELECT content FROM section_content WHERE section_key = $1",
        )
        .bind(section_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(content)
    }

    #[tracing::instrument(skip(self, content), fields(db.table = "section_content", db.operation = "insert"))]
    async fn insert_if_absent(
        &self,
        section_key: &str,
        content: Value,
    ) -> Result<Value, AppError> {
        sqlx::query(
            r#"
            INSERT INTO section_content (section_key, content)
            VALUES ($1, $2)
            ON CONFLICT (section_key) DO NOTHING
            "#,
        )
        .bind(section_key)
        .bind(&content)
        .execute(&self.pool)
        .await?;

        self.load(section_key)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Section '{}' missing after insert", section_key)))
    }

    #[tracing::instrument(skip(self, content), fields(db.table = "section_content", db.operation = "upsert"))]
    async fn store(&self, section_key: &str, content: Value) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO section_content (section_key, content)
            VALUES ($1, $2)
            ON CONFLICT (section_key)
            DO UPDATE SET content = EXCLUDED.content, updated_at = NOW()
            "#,
        )
        .bind(section_key)
        .bind(&content)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySectionContentRepository {
    docs: Mutex<HashMap<String, Value>>,
}

impl InMemorySectionContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.docs).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SectionContentRepository for InMemorySectionContentRepository {
    async fn load(&self, section_key: &str) -> Result<Option<Value>, AppError> {
        Ok(lock(&self.docs).get(section_key).cloned())
    }

    async fn insert_if_absent(
        &self,
        section_key: &str,
        content: Value,
    ) -> Result<Value, AppError> {
        Ok(lock(&self.docs)
            .entry(section_key.to_string())
            .or_insert(content)
            .clone())
    }

    async fn store(&self, section_key: &str, content: Value) -> Result<(), AppError> {
        lock(&self.docs).insert(section_key.to_string(), content);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_if_absent_keeps_first_document() {
        let repo = InMemorySectionContentRepository::new();
        let first = repo
            .insert_if_absent("hero", json!({"title": "One"}))
            .await
            .unwrap();
        let second = repo
            .insert_if_absent("hero", json!({"title": "Two"}))
            .await
            .unwrap();

        assert_eq!(first, json!({"title": "One"}));
        assert_eq!(second, first);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_store_replaces() {
        let repo = InMemorySectionContentRepository::new();
        assert!(repo.load("about").await.unwrap().is_none());

        repo.store("about", json!({"title": "A"})).await.unwrap();
        repo.store("about", json!({"title": "B"})).await.unwrap();
        assert_eq!(repo.load("about").await.unwrap(), Some(json!({"title": "B"})));
    }
}
