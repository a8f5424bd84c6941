//! Typed singleton sections
//!
//! Every landing page section is one JSON document stored under a fixed key.
//! A missing document reads as the section's `Default`, and absent form fields
//! fall back to the per-field defaults declared here.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::section_image::METHODOLOGY_ICON_NAMES;

pub const DEFAULT_CTA_LINK: &str = "#consultation";
pub const CONTACT_CTA_LINK: &str = "#contact";

pub const CREDIBILITY_CARD_COUNT: usize = 4;
pub const TESTIMONIAL_COUNT: usize = 3;
pub const STATISTIC_POINT_COUNT: usize = 3;
pub const PAIN_POINT_COUNT: usize = 5;
pub const LEAD_MAGNET_BULLET_COUNT: usize = 3;
pub const SERVICE_CARD_COUNT: usize = 3;
pub const PRICING_PACKAGE_COUNT: usize = 2;

/// A singleton section persisted as one document.
pub trait SectionContent: Serialize + DeserializeOwned + Default + Send + Sync + 'static {
    /// Storage key; at most one document exists per key.
    const KEY: &'static str;

    /// Bind a submitted dashboard form.
    fn from_form(form: &SectionForm) -> Result<Self, serde_json::Error> {
        form.bind()
    }
}

/// Flat key/value form submission
#[derive(Debug, Clone, Default)]
pub struct SectionForm {
    fields: BTreeMap<String, String>,
}

impl SectionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Bind all fields onto `T`, missing ones taking `T`'s defaults.
    pub fn bind<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        bind_map(self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Bind fields named `{prefix}_{field}` onto `T`.
    pub fn bind_prefixed<T: DeserializeOwned>(&self, prefix: &str) -> Result<T, serde_json::Error> {
        let prefix = format!("{}_", prefix);
        bind_map(
            self.fields
                .iter()
                .filter_map(|(k, v)| k.strip_prefix(&prefix).map(|field| (field, v.as_str()))),
        )
    }

    /// Bind `count` children named `{prefix}_{n}_{field}`, n starting at 1.
    pub fn bind_indexed<T: DeserializeOwned>(
        &self,
        prefix: &str,
        count: usize,
    ) -> Result<Vec<T>, serde_json::Error> {
        (1..=count)
            .map(|n| self.bind_prefixed(&format!("{}_{}", prefix, n)))
            .collect()
    }

    /// Values of `{prefix}_1` ..= `{prefix}_{count}`, empty when absent.
    pub fn list(&self, prefix: &str, count: usize) -> Vec<String> {
        (1..=count)
            .map(|n| {
                self.get(&format!("{}_{}", prefix, n))
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SectionForm {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn bind_map<'a, T, I>(entries: I) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned,
    I: Iterator<Item = (&'a str, &'a str)>,
{
    let map: serde_json::Map<String, serde_json::Value> = entries
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
        .collect();
    serde_json::from_value(serde_json::Value::Object(map))
}

/// Accepts `150`, `150.0` or `"150.00"`; form values always arrive as strings.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) if s.trim().is_empty() => Ok(0.0),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

fn default_cta_link() -> String {
    DEFAULT_CTA_LINK.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroSection {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub cta_text: String,
    pub cta_link: String,
}

impl Default for HeroSection {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            description: String::new(),
            cta_text: String::new(),
            cta_link: default_cta_link(),
        }
    }
}

impl SectionContent for HeroSection {
    const KEY: &'static str = "hero";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredibilityCard {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredibilitySection {
    pub title: String,
    pub description: String,
    pub subtitle: String,
    pub subtitle_description: String,
    pub cards: Vec<CredibilityCard>,
}

impl Default for CredibilitySection {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            subtitle: String::new(),
            subtitle_description: String::new(),
            cards: vec![CredibilityCard::default(); CREDIBILITY_CARD_COUNT],
        }
    }
}

impl SectionContent for CredibilitySection {
    const KEY: &'static str = "credibility";

    fn from_form(form: &SectionForm) -> Result<Self, serde_json::Error> {
        let mut section: Self = form.bind_prefixed("section")?;
        section.cards = form.bind_indexed("card", CREDIBILITY_CARD_COUNT)?;
        Ok(section)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Testimonial {
    pub avatar_url: String,
    pub avatar_alt: String,
    pub quote_short: String,
    pub quote_long: String,
    pub author_name: String,
    pub author_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestimonialsSection {
    pub title: String,
    pub cta_text: String,
    pub cta_link: String,
    pub testimonials: Vec<Testimonial>,
}

impl Default for TestimonialsSection {
    fn default() -> Self {
        Self {
            title: String::new(),
            cta_text: String::new(),
            cta_link: default_cta_link(),
            testimonials: vec![Testimonial::default(); TESTIMONIAL_COUNT],
        }
    }
}

impl SectionContent for TestimonialsSection {
    const KEY: &'static str = "testimonials";

    fn from_form(form: &SectionForm) -> Result<Self, serde_json::Error> {
        let mut section: Self = form.bind_prefixed("section")?;
        section.testimonials = form.bind_indexed("testimonial", TESTIMONIAL_COUNT)?;
        Ok(section)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsSection {
    pub title: String,
    pub subtitle: String,
    pub points: Vec<String>,
}

impl Default for StatisticsSection {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            points: vec![String::new(); STATISTIC_POINT_COUNT],
        }
    }
}

impl SectionContent for StatisticsSection {
    const KEY: &'static str = "statistics";

    fn from_form(form: &SectionForm) -> Result<Self, serde_json::Error> {
        let mut section: Self = form.bind()?;
        section.points = form.list("point", STATISTIC_POINT_COUNT);
        Ok(section)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PainPointsSection {
    pub title: String,
    pub description: String,
    pub pain_points: Vec<String>,
    /// Trusted HTML, rendered unescaped
    pub solutions: Vec<String>,
    pub cta_text: String,
    pub cta_link: String,
}

impl Default for PainPointsSection {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            pain_points: vec![String::new(); PAIN_POINT_COUNT],
            solutions: vec![String::new(); PAIN_POINT_COUNT],
            cta_text: String::new(),
            cta_link: default_cta_link(),
        }
    }
}

impl SectionContent for PainPointsSection {
    const KEY: &'static str = "pain_points";

    fn from_form(form: &SectionForm) -> Result<Self, serde_json::Error> {
        let mut section: Self = form.bind()?;
        section.pain_points = form.list("pain_point", PAIN_POINT_COUNT);
        section.solutions = form.list("solution", PAIN_POINT_COUNT);
        Ok(section)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodologyStep {
    pub title: String,
    pub description: String,
    pub result_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodologySection {
    pub title: String,
    pub description: String,
    pub cta_text: String,
    pub cta_link: String,
    pub steps: Vec<MethodologyStep>,
}

impl Default for MethodologySection {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            cta_text: String::new(),
            cta_link: default_cta_link(),
            steps: METHODOLOGY_ICON_NAMES
                .iter()
                .map(|name| MethodologyStep {
                    title: name.to_string(),
                    ..Default::default()
                })
                .collect(),
        }
    }
}

impl SectionContent for MethodologySection {
    const KEY: &'static str = "methodology";

    fn from_form(form: &SectionForm) -> Result<Self, serde_json::Error> {
        let mut section: Self = form.bind_prefixed("section")?;
        section.steps = form.bind_indexed("step", METHODOLOGY_ICON_NAMES.len())?;
        Ok(section)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutSection {
    pub title: String,
    pub content: String,
    pub quote_text: String,
    pub quote_author: String,
    pub cta_text: String,
    pub cta_link: String,
}

impl Default for AboutSection {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            quote_text: String::new(),
            quote_author: String::new(),
            cta_text: String::new(),
            cta_link: default_cta_link(),
        }
    }
}

impl SectionContent for AboutSection {
    const KEY: &'static str = "about";
}

impl AboutSection {
    /// Content split on blank lines.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.content
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionVisionSection {
    pub mission_title: String,
    pub mission_subtitle: String,
    pub mission_description: String,
    pub vision_title: String,
    pub vision_subtitle: String,
    pub vision_description: String,
    pub cta_text: String,
    pub cta_link: String,
}

impl Default for MissionVisionSection {
    fn default() -> Self {
        Self {
            mission_title: "Our Mission".to_string(),
            mission_subtitle: String::new(),
            mission_description: String::new(),
            vision_title: "Our Vision".to_string(),
            vision_subtitle: String::new(),
            vision_description: String::new(),
            cta_text: String::new(),
            cta_link: default_cta_link(),
        }
    }
}

impl SectionContent for MissionVisionSection {
    const KEY: &'static str = "mission_vision";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadMagnetSection {
    pub title: String,
    pub subtitle: String,
    pub bullets: Vec<String>,
    pub description: String,
    pub cta_text: String,
    pub cta_link: String,
}

impl Default for LeadMagnetSection {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            bullets: vec![String::new(); LEAD_MAGNET_BULLET_COUNT],
            description: String::new(),
            cta_text: String::new(),
            cta_link: default_cta_link(),
        }
    }
}

impl SectionContent for LeadMagnetSection {
    const KEY: &'static str = "lead_magnet";

    fn from_form(form: &SectionForm) -> Result<Self, serde_json::Error> {
        let mut section: Self = form.bind()?;
        section.bullets = form.list("bullet", LEAD_MAGNET_BULLET_COUNT);
        Ok(section)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalCtaSection {
    pub title: String,
    pub description: String,
    pub cta_text: String,
    pub cta_link: String,
}

impl Default for FinalCtaSection {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            cta_text: String::new(),
            cta_link: CONTACT_CTA_LINK.to_string(),
        }
    }
}

impl SectionContent for FinalCtaSection {
    const KEY: &'static str = "final_cta";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceCard {
    pub title: String,
    pub subtitle: String,
    pub image_url: String,
    pub image_alt: String,
    /// One feature per line
    pub features: String,
    pub result_text: String,
    pub cta_text: String,
    pub cta_link: String,
}

impl Default for ServiceCard {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            image_url: String::new(),
            image_alt: String::new(),
            features: String::new(),
            result_text: String::new(),
            cta_text: "Learn More".to_string(),
            cta_link: default_cta_link(),
        }
    }
}

impl ServiceCard {
    pub fn features_list(&self) -> Vec<&str> {
        lines(&self.features)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesSection {
    pub title: String,
    pub description: String,
    pub cta_text: String,
    pub cta_link: String,
    pub cards: Vec<ServiceCard>,
}

impl Default for ServicesSection {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            cta_text: "Find Your Fit".to_string(),
            cta_link: default_cta_link(),
            cards: vec![ServiceCard::default(); SERVICE_CARD_COUNT],
        }
    }
}

impl SectionContent for ServicesSection {
    const KEY: &'static str = "services";

    fn from_form(form: &SectionForm) -> Result<Self, serde_json::Error> {
        let mut section: Self = form.bind_prefixed("section")?;
        section.cards = form.bind_indexed("card", SERVICE_CARD_COUNT)?;
        Ok(section)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPackage {
    pub title: String,
    #[serde(deserialize_with = "number_or_string")]
    pub price: f64,
    /// One included service per line
    pub services: String,
}

impl PricingPackage {
    pub fn services_list(&self) -> Vec<&str> {
        lines(&self.services)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSection {
    pub title: String,
    pub subtitle: String,
    pub disclaimer: String,
    pub cta_text: String,
    pub cta_link: String,
    pub packages: Vec<PricingPackage>,
}

impl Default for PricingSection {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            disclaimer: String::new(),
            cta_text: String::new(),
            cta_link: CONTACT_CTA_LINK.to_string(),
            packages: vec![PricingPackage::default(); PRICING_PACKAGE_COUNT],
        }
    }
}

impl SectionContent for PricingSection {
    const KEY: &'static str = "pricing";

    fn from_form(form: &SectionForm) -> Result<Self, serde_json::Error> {
        let mut section: Self = form.bind_prefixed("section")?;
        section.packages = form.bind_indexed("package", PRICING_PACKAGE_COUNT)?;
        Ok(section)
    }
}

/// Header of the blog listing page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogSection {
    pub title: String,
    pub subtitle: String,
}

impl SectionContent for BlogSection {
    const KEY: &'static str = "blog";
}
