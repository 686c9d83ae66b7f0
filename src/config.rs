//! Configuration types for a PDF-to-Notion upload run.
//!
//! Every parameter of a run lives in [`UploadConfig`], built via its
//! [`UploadConfigBuilder`]. The builder validates the required fields up
//! front so a run never starts rasterising only to fail on an empty token.

use crate::error::Pdf2NotionError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Title used when neither an explicit title nor a file stem is available.
pub const FALLBACK_TITLE: &str = "Lecture Slides";

/// Placeholder text written below every page image.
pub const DEFAULT_NOTE_TEXT: &str = "Notes can be added here...";

/// Default freeimage.host upload endpoint.
pub const DEFAULT_IMAGE_HOST_URL: &str = "https://freeimage.host/api/1/upload";

/// Default Notion REST base URL.
pub const DEFAULT_WORKSPACE_API_URL: &str = "https://api.notion.com/v1";

/// `Notion-Version` header sent with every workspace request.
pub const DEFAULT_WORKSPACE_API_VERSION: &str = "2022-06-28";

/// Configuration for one upload run.
///
/// # Example
/// ```rust
/// use pdf2notion::UploadConfig;
///
/// let config = UploadConfig::builder()
///     .document_path("lecture-03.pdf")
///     .workspace_token("secret_abc")
///     .parent_container_id("0123456789abcdef0123456789abcdef")
///     .image_host_credential("6d207e02198a847aa98d0a2a901485a5")
///     .dpi(150)
///     .build()
///     .unwrap();
/// assert_eq!(config.resolved_title(), "lecture-03");
/// ```
#[derive(Clone)]
pub struct UploadConfig {
    /// Local path of the source PDF.
    pub document_path: PathBuf,

    /// Notion integration token (`secret_…` / `ntn_…`).
    pub workspace_token: String,

    /// Staging directory for rendered page images. Default: `temp_images`.
    pub scratch_folder: PathBuf,

    /// ID of the Notion page under which the new page is created.
    pub parent_container_id: String,

    /// freeimage.host API key.
    pub image_host_credential: String,

    /// Title of the created page. If None, derived from the file stem.
    pub title: Option<String>,

    /// Rendering DPI. Range: 72–400. Default: 200.
    pub dpi: u32,

    /// Paragraph text placed after each image. Default: [`DEFAULT_NOTE_TEXT`].
    pub note_text: String,

    /// What happens to the scratch directory when the run fails.
    pub scratch_policy: ScratchPolicy,

    /// Upload endpoint of the image host.
    pub image_host_url: String,

    /// Base URL of the Notion REST API.
    pub workspace_api_url: String,

    /// Value of the `Notion-Version` header.
    pub workspace_api_version: String,

    /// Per-request HTTP timeout in seconds. Default: 60.
    pub http_timeout_secs: u64,

    /// Explicit pdfium library to bind. Falls back to `PDFIUM_LIB_PATH`,
    /// then the working directory, then the system library.
    pub pdfium_library: Option<PathBuf>,

    /// Per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            document_path: PathBuf::new(),
            workspace_token: String::new(),
            scratch_folder: PathBuf::from("temp_images"),
            parent_container_id: String::new(),
            image_host_credential: String::new(),
            title: None,
            dpi: 200,
            note_text: DEFAULT_NOTE_TEXT.to_string(),
            scratch_policy: ScratchPolicy::default(),
            image_host_url: DEFAULT_IMAGE_HOST_URL.to_string(),
            workspace_api_url: DEFAULT_WORKSPACE_API_URL.to_string(),
            workspace_api_version: DEFAULT_WORKSPACE_API_VERSION.to_string(),
            http_timeout_secs: 60,
            pdfium_library: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadConfig")
            .field("document_path", &self.document_path)
            .field("workspace_token", &redact(&self.workspace_token))
            .field("scratch_folder", &self.scratch_folder)
            .field("parent_container_id", &self.parent_container_id)
            .field("image_host_credential", &redact(&self.image_host_credential))
            .field("title", &self.title)
            .field("dpi", &self.dpi)
            .field("note_text", &self.note_text)
            .field("scratch_policy", &self.scratch_policy)
            .field("image_host_url", &self.image_host_url)
            .field("workspace_api_url", &self.workspace_api_url)
            .field("workspace_api_version", &self.workspace_api_version)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("pdfium_library", &self.pdfium_library)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn UploadProgressCallback>"),
            )
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

impl UploadConfig {
    /// Create a new builder for `UploadConfig`.
    pub fn builder() -> UploadConfigBuilder {
        UploadConfigBuilder {
            config: Self::default(),
        }
    }

    /// Title for the destination page: explicit title, else the document's
    /// file stem, else [`FALLBACK_TITLE`].
    pub fn resolved_title(&self) -> String {
        if let Some(ref t) = self.title {
            if !t.trim().is_empty() {
                return t.trim().to_string();
            }
        }
        title_from_path(&self.document_path).unwrap_or_else(|| FALLBACK_TITLE.to_string())
    }

    /// Check required fields and ranges.
    pub fn validate(&self) -> Result<(), Pdf2NotionError> {
        let required: [(&str, bool); 4] = [
            ("document_path", self.document_path.as_os_str().is_empty()),
            ("workspace_token", self.workspace_token.trim().is_empty()),
            ("parent_container_id", self.parent_container_id.trim().is_empty()),
            ("image_host_credential", self.image_host_credential.trim().is_empty()),
        ];
        if let Some((name, _)) = required.iter().find(|(_, empty)| *empty) {
            return Err(Pdf2NotionError::InvalidConfig(format!(
                "`{name}` must not be empty"
            )));
        }
        if self.scratch_folder.as_os_str().is_empty() {
            return Err(Pdf2NotionError::InvalidConfig(
                "`scratch_folder` must not be empty".into(),
            ));
        }
        if scratch_contains_document(&self.scratch_folder, &self.document_path) {
            return Err(Pdf2NotionError::InvalidConfig(format!(
                "`scratch_folder` '{}' contains the source document; use a dedicated directory",
                self.scratch_folder.display()
            )));
        }
        if self.dpi < 72 || self.dpi > 400 {
            return Err(Pdf2NotionError::InvalidConfig(format!(
                "DPI must be 72–400, got {}",
                self.dpi
            )));
        }
        if self.http_timeout_secs == 0 {
            return Err(Pdf2NotionError::InvalidConfig(
                "HTTP timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(())
    }
}

/// True when `scratch` is the document's folder or one of its ancestors.
fn scratch_contains_document(scratch: &Path, document: &Path) -> bool {
    let doc_dir = match document.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    absolute(doc_dir).starts_with(absolute(scratch))
}

/// Canonical form when the path exists, otherwise joined onto the cwd.
fn absolute(path: &Path) -> PathBuf {
    if let Ok(p) = path.canonicalize() {
        return p;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn title_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|s| s.to_string_lossy().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Builder for [`UploadConfig`].
#[derive(Debug)]
pub struct UploadConfigBuilder {
    config: UploadConfig,
}

impl UploadConfigBuilder {
    pub fn document_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.document_path = path.into();
        self
    }

    pub fn workspace_token(mut self, token: impl Into<String>) -> Self {
        self.config.workspace_token = token.into();
        self
    }

    pub fn scratch_folder(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.scratch_folder = dir.into();
        self
    }

    pub fn parent_container_id(mut self, id: impl Into<String>) -> Self {
        self.config.parent_container_id = id.into();
        self
    }

    pub fn image_host_credential(mut self, key: impl Into<String>) -> Self {
        self.config.image_host_credential = key.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 400);
        self
    }

    pub fn note_text(mut self, text: impl Into<String>) -> Self {
        self.config.note_text = text.into();
        self
    }

    pub fn scratch_policy(mut self, policy: ScratchPolicy) -> Self {
        self.config.scratch_policy = policy;
        self
    }

    pub fn image_host_url(mut self, url: impl Into<String>) -> Self {
        self.config.image_host_url = url.into();
        self
    }

    pub fn workspace_api_url(mut self, url: impl Into<String>) -> Self {
        self.config.workspace_api_url = url.into();
        self
    }

    pub fn workspace_api_version(mut self, version: impl Into<String>) -> Self {
        self.config.workspace_api_version = version.into();
        self
    }

    pub fn http_timeout_secs(mut self, secs: u64) -> Self {
        self.config.http_timeout_secs = secs;
        self
    }

    pub fn pdfium_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, failing fast on empty required fields.
    pub fn build(self) -> Result<UploadConfig, Pdf2NotionError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Fate of the scratch directory when a run aborts.
///
/// A successful run always removes the page images. The directory itself is
/// removed when the run created it, or when it is empty afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScratchPolicy {
    /// Remove the directory on every exit path. (default)
    #[default]
    RemoveAlways,
    /// Leave the directory and any unpublished page images behind after a
    /// fatal error so they can be inspected.
    KeepOnFailure,
}
