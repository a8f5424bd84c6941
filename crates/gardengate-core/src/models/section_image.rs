use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default image slots seeded on first start: `(section_name, display_name)`.
pub const SECTION_IMAGE_CATALOG: &[(&str, &str)] = &[
    ("header_logo", "Header - Logo"),
    ("hero_background", "Hero Section - Background Image"),
    ("hero_image", "Hero Section - Main Image"),
    ("about_image", "About Section - Image"),
    ("about_background", "About Section - Background Image"),
    (
        "statistics_background",
        "Statistics Section - Background Image",
    ),
    ("methodology_icon_1", "Methodology - Icon 1 (Assessment)"),
    ("methodology_icon_2", "Methodology - Icon 2 (Protection)"),
    ("methodology_icon_3", "Methodology - Icon 3 (Management)"),
    ("methodology_icon_4", "Methodology - Icon 4 (Communication)"),
    ("methodology_icon_5", "Methodology - Icon 5 (Optimization)"),
    ("lead_magnet_tablet", "Lead Magnet - Tablet Image"),
    ("final_cta_background", "Final CTA - Background Image"),
];

/// Sections the landing page always reads, present even before anyone edits them.
pub const EXPECTED_SECTIONS: &[&str] = &[
    "hero_background",
    "hero_image",
    "about_background",
    "statistics_background",
];

pub const HEADER_LOGO_SECTION: &str = "header_logo";
pub const METHODOLOGY_ICON_PREFIX: &str = "methodology_icon_";
pub const METHODOLOGY_ICON_NAMES: [&str; 5] = [
    "Assessment",
    "Protection",
    "Management",
    "Communication",
    "Optimization",
];

/// Section name and display name for methodology icon `index` (1-based).
pub fn methodology_icon_section(index: usize) -> Option<(String, String)> {
    let label = METHODOLOGY_ICON_NAMES.get(index.checked_sub(1)?)?;
    Some((
        format!("{}{}", METHODOLOGY_ICON_PREFIX, index),
        format!("Methodology - Icon {} ({})", index, label),
    ))
}

/// Image slot record for one landing page section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SectionImage {
    pub id: i64,
    pub section_name: String,
    pub display_name: String,
    pub image_url: Option<String>,
    pub image_alt: String,
    pub icon_url: Option<String>,
    pub background_image_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Which URL field a section's edit form controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionImageSlot {
    Background,
    Icon,
    Image,
}

impl SectionImageSlot {
    /// Derived from the section name; `background` wins over `icon`.
    pub fn for_section(section_name: &str) -> Self {
        if section_name.contains("background") {
            SectionImageSlot::Background
        } else if section_name.contains("icon") {
            SectionImageSlot::Icon
        } else {
            SectionImageSlot::Image
        }
    }
}

/// Submitted edit form for a section image. Absent fields clear the slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionImageEdit {
    pub image_url: String,
    pub image_alt: String,
    pub icon_url: String,
    pub background_image_url: String,
}

impl SectionImage {
    pub fn slot(&self) -> SectionImageSlot {
        SectionImageSlot::for_section(&self.section_name)
    }

    /// Apply an edit to the slot this section owns, leaving the others untouched.
    pub fn apply_edit(&mut self, edit: SectionImageEdit) {
        match self.slot() {
            SectionImageSlot::Background => {
                self.background_image_url = Some(edit.background_image_url);
            }
            SectionImageSlot::Icon => {
                self.icon_url = Some(edit.icon_url);
            }
            SectionImageSlot::Image => {
                self.image_url = Some(edit.image_url);
                self.image_alt = edit.image_alt;
            }
        }
    }

    pub fn is_methodology_icon(&self) -> bool {
        self.section_name.starts_with(METHODOLOGY_ICON_PREFIX)
    }

    /// Listed on the dashboard index; icons and the logo have their own screens.
    pub fn is_dashboard_listed(&self) -> bool {
        !self.is_methodology_icon() && self.section_name != HEADER_LOGO_SECTION
    }

    pub fn urls(&self) -> SectionImageUrls {
        SectionImageUrls {
            image_url: self.image_url.clone().unwrap_or_default(),
            image_alt: self.image_alt.clone(),
            icon_url: self.icon_url.clone().unwrap_or_default(),
            background_image_url: self.background_image_url.clone().unwrap_or_default(),
        }
    }
}

/// Public view of a section image; missing values render as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionImageUrls {
    pub image_url: String,
    pub image_alt: String,
    pub icon_url: String,
    pub background_image_url: String,
}

/// One row of the methodology icon batch edit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodologyIconEdit {
    pub icon_url: String,
    pub icon_alt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(name: &str) -> SectionImage {
        SectionImage {
            id: 1,
            section_name: name.to_string(),
            display_name: name.to_string(),
            image_url: Some("https://old/image.webp".to_string()),
            image_alt: "old".to_string(),
            icon_url: Some("https://old/icon.webp".to_string()),
            background_image_url: Some("https://old/bg.webp".to_string()),
            updated_at: Utc::now(),
        }
    }

    fn edit() -> SectionImageEdit {
        SectionImageEdit {
            image_url: "https://new/image.webp".to_string(),
            image_alt: "new".to_string(),
            icon_url: "https://new/icon.webp".to_string(),
            background_image_url: "https://new/bg.webp".to_string(),
        }
    }

    #[test]
    fn test_background_section_only_updates_background() {
        let mut s = section("hero_background");
        s.apply_edit(edit());
        assert_eq!(s.background_image_url.as_deref(), Some("https://new/bg.webp"));
        assert_eq!(s.image_url.as_deref(), Some("https://old/image.webp"));
        assert_eq!(s.icon_url.as_deref(), Some("https://old/icon.webp"));
        assert_eq!(s.image_alt, "old");
    }

    #[test]
    fn test_icon_section_only_updates_icon() {
        let mut s = section("methodology_icon_2");
        s.apply_edit(edit());
        assert_eq!(s.icon_url.as_deref(), Some("https://new/icon.webp"));
        assert_eq!(s.background_image_url.as_deref(), Some("https://old/bg.webp"));
    }

    #[test]
    fn test_image_section_updates_image_and_alt() {
        let mut s = section("about_image");
        s.apply_edit(edit());
        assert_eq!(s.image_url.as_deref(), Some("https://new/image.webp"));
        assert_eq!(s.image_alt, "new");
        assert_eq!(s.icon_url.as_deref(), Some("https://old/icon.webp"));
    }

    #[test]
    fn test_background_wins_over_icon() {
        assert_eq!(
            SectionImageSlot::for_section("icon_background"),
            SectionImageSlot::Background
        );
    }

    #[test]
    fn test_dashboard_listing_rules() {
        assert!(section("hero_image").is_dashboard_listed());
        assert!(!section("header_logo").is_dashboard_listed());
        assert!(!section("methodology_icon_5").is_dashboard_listed());
    }

    #[test]
    fn test_methodology_icon_names() {
        assert_eq!(
            methodology_icon_section(1),
            Some((
                "methodology_icon_1".to_string(),
                "Methodology - Icon 1 (Assessment)".to_string()
            ))
        );
        assert!(methodology_icon_section(0).is_none());
        assert!(methodology_icon_section(6).is_none());
    }

    #[test]
    fn test_catalog_contains_expected_sections() {
        assert_eq!(SECTION_IMAGE_CATALOG.len(), 13);
        for name in EXPECTED_SECTIONS {
            assert!(SECTION_IMAGE_CATALOG.iter().any(|(n, _)| n == name));
        }
    }
}
