//! Typed access to the singleton section documents.

use std::sync::Arc;

use gardengate_core::models::{SectionContent, SectionForm};
use gardengate_core::AppError;
use gardengate_db::SectionContentRepository;

#[derive(Clone)]
pub struct ContentStore {
    repo: Arc<dyn SectionContentRepository>,
}

impl ContentStore {
    pub fn new(repo: Arc<dyn SectionContentRepository>) -> Self {
        Self { repo }
    }

    /// Load section `T`, creating its default document on first access.
    pub async fn content<T: SectionContent>(&self) -> Result<T, AppError> {
        let doc = match self.repo.load(T::KEY).await? {
            Some(doc) => doc,
            None => {
                tracing::debug!(section = T::KEY, "Creating default section content");
                self.repo
                    .insert_if_absent(T::KEY, serde_json::to_value(T::default())?)
                    .await?
            }
        };
        serde_json::from_value(doc).map_err(|e| {
            AppError::Internal(format!("Stored section '{}' is unreadable: {}", T::KEY, e))
        })
    }

    #[tracing::instrument(skip(self, content), fields(section = T::KEY))]
    pub async fn save_content<T: SectionContent>(&self, content: &T) -> Result<(), AppError> {
        self.repo
            .store(T::KEY, serde_json::to_value(content)?)
            .await
    }

    /// Bind a dashboard form onto `T` and save it.
    pub async fn update_from_form<T: SectionContent>(
        &self,
        form: &SectionForm,
    ) -> Result<T, AppError> {
        let content = T::from_form(form)?;
        self.save_content(&content).await?;
        Ok(content)
    }
}
