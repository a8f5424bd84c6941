//! Section image slots: catalog seeding, dashboard edits and the public view.

use std::collections::BTreeMap;
use std::sync::Arc;

use gardengate_core::models::{
    methodology_icon_section, MethodologyIconEdit, SectionForm, SectionImage, SectionImageEdit,
    SectionImageUrls, EXPECTED_SECTIONS, HEADER_LOGO_SECTION, METHODOLOGY_ICON_NAMES,
    SECTION_IMAGE_CATALOG,
};
use gardengate_core::AppError;
use gardengate_db::SectionImageRepository;
use serde::Deserialize;

/// Dashboard index: editable sections plus the header logo shown apart
#[derive(Debug, Clone)]
pub struct DashboardSections {
    pub sections: Vec<SectionImage>,
    pub header_logo: Option<SectionImage>,
}

/// `icon_{n}_url` / `icon_{n}_alt` fields of the methodology icon form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IconFields {
    url: String,
    alt: String,
}

#[derive(Clone)]
pub struct SectionImageService {
    repo: Arc<dyn SectionImageRepository>,
}

impl SectionImageService {
    pub fn new(repo: Arc<dyn SectionImageRepository>) -> Self {
        Self { repo }
    }

    /// Create every catalog slot that does not exist yet; returns how many were created.
    #[tracing::instrument(skip(self))]
    pub async fn ensure_catalog(&self) -> Result<usize, AppError> {
        let mut created = 0;
        for (name, display_name) in SECTION_IMAGE_CATALOG {
            let (_, was_created) = self.repo.get_or_create(name, display_name).await?;
            if was_created {
                created += 1;
            }
        }
        tracing::info!(created = created, "Section image catalog ensured");
        Ok(created)
    }

    pub async fn dashboard_sections(&self) -> Result<DashboardSections, AppError> {
        let all = self.repo.list().await?;
        let header_logo = all
            .iter()
            .find(|s| s.section_name == HEADER_LOGO_SECTION)
            .cloned();
        let sections = all.into_iter().filter(|s| s.is_dashboard_listed()).collect();
        Ok(DashboardSections {
            sections,
            header_logo,
        })
    }

    pub async fn get_section(&self, id: i64) -> Result<SectionImage, AppError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Section image {}", id)))
    }

    /// Apply an edit to the one slot the section owns.
    #[tracing::instrument(skip(self, edit))]
    pub async fn edit_section_image(
        &self,
        id: i64,
        edit: SectionImageEdit,
    ) -> Result<SectionImage, AppError> {
        let mut section = self.get_section(id).await?;
        section.apply_edit(edit);
        let saved = self.repo.save(&section).await?;
        tracing::debug!(section = %saved.section_name, slot = ?saved.slot(), "Section image updated");
        Ok(saved)
    }

    /// The five methodology icon slots in step order, created when missing
    pub async fn methodology_icons(&self) -> Result<Vec<SectionImage>, AppError> {
        let mut icons = Vec::with_capacity(METHODOLOGY_ICON_NAMES.len());
        for index in 1..=METHODOLOGY_ICON_NAMES.len() {
            if let Some((name, display_name)) = methodology_icon_section(index) {
                let (icon, _) = self.repo.get_or_create(&name, &display_name).await?;
                icons.push(icon);
            }
        }
        Ok(icons)
    }

    /// Batch update: edit `n` goes to icon `n + 1`; extra edits are ignored.
    #[tracing::instrument(skip(self, edits), fields(count = edits.len()))]
    pub async fn update_methodology_icons(
        &self,
        edits: &[MethodologyIconEdit],
    ) -> Result<Vec<SectionImage>, AppError> {
        let mut updated = Vec::with_capacity(edits.len());
        for (mut icon, edit) in self.methodology_icons().await?.into_iter().zip(edits) {
            icon.icon_url = Some(edit.icon_url.clone());
            icon.image_alt = edit.icon_alt.clone();
            updated.push(self.repo.save(&icon).await?);
        }
        Ok(updated)
    }

    /// Read the batch edit from a flat form; absent fields clear the icon.
    pub fn methodology_icon_edits(
        form: &SectionForm,
    ) -> Result<Vec<MethodologyIconEdit>, AppError> {
        let fields: Vec<IconFields> = form.bind_indexed("icon", METHODOLOGY_ICON_NAMES.len())?;
        Ok(fields
            .into_iter()
            .map(|f| MethodologyIconEdit {
                icon_url: f.url,
                icon_alt: f.alt,
            })
            .collect())
    }

    /// Public view of one section; empty strings when it does not exist.
    pub async fn section_image(&self, section_name: &str) -> Result<SectionImageUrls, AppError> {
        Ok(self
            .repo
            .get_by_name(section_name)
            .await?
            .map(|s| s.urls())
            .unwrap_or_default())
    }

    /// Every section keyed by name, with the landing page's expected sections always present.
    pub async fn landing_page_images(&self) -> Result<BTreeMap<String, SectionImageUrls>, AppError> {
        let mut images: BTreeMap<String, SectionImageUrls> = self
            .repo
            .list()
            .await?
            .into_iter()
            .map(|s| {
                let urls = s.urls();
                (s.section_name, urls)
            })
            .collect();
        for name in EXPECTED_SECTIONS {
            images.entry(name.to_string()).or_default();
        }
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gardengate_db::InMemorySectionImageRepository;

    fn service() -> SectionImageService {
        SectionImageService::new(Arc::new(InMemorySectionImageRepository::new()))
    }

    async fn section_id(service: &SectionImageService, name: &str) -> i64 {
        service.repo.get_by_name(name).await.unwrap().unwrap().id
    }

    #[tokio::test]
    async fn test_ensure_catalog_is_idempotent() {
        let service = service();
        assert_eq!(service.ensure_catalog().await.unwrap(), 13);
        assert_eq!(service.ensure_catalog().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_dashboard_hides_icons_and_logo() {
        let service = service();
        service.ensure_catalog().await.unwrap();

        let dashboard = service.dashboard_sections().await.unwrap();
        assert_eq!(dashboard.sections.len(), 7);
        assert!(dashboard
            .sections
            .iter()
            .all(|s| !s.section_name.starts_with("methodology_icon_")));
        assert_eq!(
            dashboard.header_logo.map(|s| s.section_name),
            Some("header_logo".to_string())
        );
    }

    #[tokio::test]
    async fn test_edit_background_section() {
        let service = service();
        service.ensure_catalog().await.unwrap();
        let id = section_id(&service, "hero_background").await;

        let saved = service
            .edit_section_image(
                id,
                SectionImageEdit {
                    image_url: "https://cdn/ignored.webp".to_string(),
                    background_image_url: "https://cdn/bg.webp".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(saved.background_image_url.as_deref(), Some("https://cdn/bg.webp"));
        assert!(saved.image_url.is_none());
    }

    #[tokio::test]
    async fn test_edit_missing_section() {
        let err = service()
            .edit_section_image(404, SectionImageEdit::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_methodology_icons_created_and_updated() {
        let service = service();
        let icons = service.methodology_icons().await.unwrap();
        assert_eq!(icons.len(), 5);
        assert_eq!(icons[0].section_name, "methodology_icon_1");
        assert_eq!(icons[4].display_name, "Methodology - Icon 5 (Optimization)");

        let form = SectionForm::new()
            .with("icon_1_url", "https://cdn/assess.webp")
            .with("icon_1_alt", "Magnifier")
            .with("icon_3_url", "https://cdn/manage.webp");
        let edits = SectionImageService::methodology_icon_edits(&form).unwrap();
        assert_eq!(edits.len(), 5);

        let updated = service.update_methodology_icons(&edits).await.unwrap();
        assert_eq!(updated.len(), 5);
        assert_eq!(updated[0].icon_url.as_deref(), Some("https://cdn/assess.webp"));
        assert_eq!(updated[0].image_alt, "Magnifier");
        assert_eq!(updated[1].icon_url.as_deref(), Some(""));
        assert_eq!(updated[2].icon_url.as_deref(), Some("https://cdn/manage.webp"));
    }

    #[tokio::test]
    async fn test_public_view_defaults() {
        let service = service();
        assert_eq!(
            service.section_image("nowhere").await.unwrap(),
            SectionImageUrls::default()
        );

        let images = service.landing_page_images().await.unwrap();
        for name in EXPECTED_SECTIONS {
            assert_eq!(images.get(*name), Some(&SectionImageUrls::default()));
        }
    }

    #[tokio::test]
    async fn test_public_view_reads_saved_urls() {
        let service = service();
        service.ensure_catalog().await.unwrap();
        let id = section_id(&service, "about_image").await;
        service
            .edit_section_image(
                id,
                SectionImageEdit {
                    image_url: "https://cdn/about.webp".to_string(),
                    image_alt: "Our team".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let view = service.section_image("about_image").await.unwrap();
        assert_eq!(view.image_url, "https://cdn/about.webp");
        assert_eq!(view.image_alt, "Our team");
        assert_eq!(view.background_image_url, "");

        let images = service.landing_page_images().await.unwrap();
        assert_eq!(images.len(), 13);
        assert_eq!(images["about_image"].image_url, "https://cdn/about.webp");
    }
}
