//! Types for the ingest pipeline.

use gardengate_core::constants::DEFAULT_UPLOAD_FILENAME;

/// Public id used when the filename has no usable stem
const FALLBACK_PUBLIC_ID: &str = "image";

/// Raw attachment as received from the dashboard form
#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub filename: Option<String>,
}

impl UploadedFile {
    pub fn new(data: Vec<u8>, filename: Option<String>) -> Self {
        Self { data, filename }
    }

    pub fn filename(&self) -> &str {
        self.filename
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_UPLOAD_FILENAME)
    }
}

/// One ingest call. `file` is optional so a form without an attachment can be
/// rejected as missing rather than failing to bind.
#[derive(Clone, Debug, Default)]
pub struct IngestRequest {
    pub file: Option<UploadedFile>,
    pub folder: Option<String>,
    pub public_id: Option<String>,
    pub alt_text: String,
}

impl IngestRequest {
    pub fn new(file: UploadedFile) -> Self {
        Self {
            file: Some(file),
            ..Default::default()
        }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn with_public_id(mut self, public_id: impl Into<String>) -> Self {
        self.public_id = Some(public_id.into());
        self
    }

    pub fn with_alt_text(mut self, alt_text: impl Into<String>) -> Self {
        self.alt_text = alt_text.into();
        self
    }

    pub fn filename(&self) -> &str {
        self.file
            .as_ref()
            .map(UploadedFile::filename)
            .unwrap_or(DEFAULT_UPLOAD_FILENAME)
    }

    pub fn folder_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.folder
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or(default)
    }

    pub fn resolved_public_id(&self) -> String {
        resolve_public_id(self.public_id.as_deref(), self.filename())
    }
}

/// Explicit id when given, else the filename with its last extension removed.
pub fn resolve_public_id(explicit: Option<&str>, filename: &str) -> String {
    if let Some(id) = explicit.filter(|id| !id.is_empty()) {
        return id.to_string();
    }
    let stem = strip_extension(filename);
    if stem.is_empty() {
        FALLBACK_PUBLIC_ID.to_string()
    } else {
        stem.to_string()
    }
}

/// Drop the final `.ext` of the last path segment. Leading dots of the segment
/// do not start an extension, so `.hidden` is kept whole.
fn strip_extension(path: &str) -> &str {
    let base_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    let base = &path[base_start..];
    let leading_dots = base.len() - base.trim_start_matches('.').len();
    match base.rfind('.') {
        Some(dot) if dot > leading_dots => &path[..base_start + dot],
        _ => path,
    }
}
