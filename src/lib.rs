//! # pdf2notion
//!
//! Turn a PDF (lecture slides, handouts, scanned notes) into a Notion page:
//! one image per PDF page, each followed by an editable note paragraph.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    check the file exists and starts with %PDF
//!  ├─ 2. Scratch  create the staging directory (removed again at the end)
//!  ├─ 3. Render   rasterise every page to page_{n}.png via pdfium
//!  ├─ 4. Page     create one Notion page under the configured parent
//!  └─ 5. Per page upload PNG to freeimage.host → append image + note blocks
//!                 → delete the PNG
//! ```
//!
//! The run is strictly sequential and never retries: the first failed
//! upload or Notion call ends it. Re-running creates a second page.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2notion::{upload, UploadConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = UploadConfig::builder()
//!         .document_path("week-03.pdf")
//!         .workspace_token(std::env::var("NOTION_TOKEN")?)
//!         .parent_container_id(std::env::var("NOTION_PARENT_PAGE_ID")?)
//!         .image_host_credential(std::env::var("FREEIMAGE_API_KEY")?)
//!         .build()?;
//!     let report = upload(&config).await?;
//!     println!("{} pages → {}", report.stats.published_pages, report.page_id);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2notion` binary (clap + anyhow + tracing-subscriber + indicatif + dotenvy) |
//!
//! ## Testing without the network
//!
//! [`upload_with`] takes the three stages as trait objects
//! ([`Rasterizer`], [`ImagePublisher`], [`WorkspaceWriter`]) so a run can be
//! exercised against in-memory fakes.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod upload;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ScratchPolicy, UploadConfig, UploadConfigBuilder};
pub use error::{CleanupWarning, Pdf2NotionError, UploadFailure, WorkspaceOperation};
pub use output::{PublishedPage, RunReport, RunStats};
pub use pipeline::publish::{FreeImageHost, ImagePublisher};
pub use pipeline::render::{PdfiumRasterizer, Rasterizer};
pub use pipeline::workspace::{Block, NotionClient, WorkspaceWriter};
pub use progress::{NoopProgressCallback, ProgressCallback, UploadProgressCallback};
pub use upload::{upload, upload_sync, upload_with};
