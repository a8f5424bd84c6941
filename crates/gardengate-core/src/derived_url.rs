//! Derived delivery URLs
//!
//! The asset store serves transformed variants when a transformation chain is
//! inserted after the `/upload/` path segment. Both the ingestion pipeline and
//! the gallery build their URLs through [`rewrite_upload_url`], so the two can
//! never disagree.
//!
//! The rewrite is a plain substring replacement of every `/upload/`
//! occurrence, not a URL re-parse.

/// Path segment the transformation chain is inserted after.
pub const UPLOAD_SEGMENT: &str = "/upload/";

pub const WEB_WIDTH: u32 = 1920;
pub const THUMB_WIDTH: u32 = 400;
pub const DELIVERY_QUALITY: u8 = 80;

/// The two delivery variants the CMS renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedVariant {
    /// Full-width hero/background rendition
    Web,
    /// Gallery and dashboard thumbnails
    Thumb,
}

impl DerivedVariant {
    pub fn builder(self) -> DerivedUrlBuilder {
        let width = match self {
            DerivedVariant::Web => WEB_WIDTH,
            DerivedVariant::Thumb => THUMB_WIDTH,
        };
        DerivedUrlBuilder::new()
            .format("webp")
            .quality(DELIVERY_QUALITY)
            .width(width)
    }
}

/// Fluent builder for a delivery transformation chain such as `f_webp,q_80,w_400`.
///
/// # Example
///
/// ```rust
/// use gardengate_core::derived_url::DerivedUrlBuilder;
///
/// let url = DerivedUrlBuilder::new()
///     .format("webp")
///     .quality(80)
///     .width(400)
///     .apply("https://res.example.com/demo/image/upload/v1/a.webp");
/// assert_eq!(url, "https://res.example.com/demo/image/upload/f_webp,q_80,w_400/v1/a.webp");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DerivedUrlBuilder {
    format: Option<String>,
    quality: Option<u8>,
    width: Option<u32>,
}

impl DerivedUrlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set delivery format (`f_<format>`)
    pub fn format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    /// Set delivery quality (`q_<quality>`)
    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Set delivery width (`w_<width>`), aspect ratio preserved
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Comma-joined chain, in `f`, `q`, `w` order.
    pub fn transformation(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if let Some(format) = &self.format {
            parts.push(format!("f_{}", format));
        }
        if let Some(quality) = self.quality {
            parts.push(format!("q_{}", quality));
        }
        if let Some(width) = self.width {
            parts.push(format!("w_{}", width));
        }
        parts.join(",")
    }

    /// Insert the chain after every `/upload/` in `secure_url`.
    pub fn apply(&self, secure_url: &str) -> String {
        let chain = self.transformation();
        if chain.is_empty() {
            return secure_url.to_string();
        }
        secure_url.replace(UPLOAD_SEGMENT, &format!("{}{}/", UPLOAD_SEGMENT, chain))
    }
}

/// Rewrite a stored `secure_url` into the given delivery variant.
pub fn rewrite_upload_url(secure_url: &str, variant: DerivedVariant) -> String {
    variant.builder().apply(secure_url)
}

/// `/upload/` → `/upload/f_webp,q_80,w_1920/`
pub fn web_url(secure_url: &str) -> String {
    rewrite_upload_url(secure_url, DerivedVariant::Web)
}

/// `/upload/` → `/upload/f_webp,q_80,w_400/`
pub fn thumb_url(secure_url: &str) -> String {
    rewrite_upload_url(secure_url, DerivedVariant::Thumb)
}
