//! Progress-callback trait for per-page upload events.
//!
//! Inject an [`Arc<dyn UploadProgressCallback>`] via
//! [`crate::config::UploadConfigBuilder::progress_callback`] to receive
//! events as the run publishes each page.
//!
//! # Example
//!
//! ```rust
//! use pdf2notion::{UploadConfig, UploadProgressCallback};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl UploadProgressCallback for Printer {
//!     fn on_page_start(&self, page_num: usize, total_pages: usize) {
//!         eprintln!("Uploading page {page_num}/{total_pages}...");
//!     }
//! }
//!
//! let config = UploadConfig::builder()
//!     .document_path("slides.pdf")
//!     .workspace_token("secret_abc")
//!     .parent_container_id("0123456789abcdef0123456789abcdef")
//!     .image_host_credential("key")
//!     .progress_callback(Arc::new(Printer))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the orchestrator as it walks the page sequence.
///
/// Pages are processed strictly in order, one at a time, so callbacks are
/// never invoked concurrently. The `Send + Sync` bound lets the callback be
/// shared with a progress-bar thread. All methods default to no-ops.
pub trait UploadProgressCallback: Send + Sync {
    /// Called once the document has been rasterised.
    fn on_run_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called once the destination page exists.
    fn on_container_created(&self, page_id: &str, title: &str) {
        let _ = (page_id, title);
    }

    /// Called just before a page image is uploaded.
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called after a page's blocks were appended.
    fn on_page_complete(&self, page_num: usize, total_pages: usize, image_url: &str) {
        let _ = (page_num, total_pages, image_url);
    }

    /// Called when a page aborts the run.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once after every page was published.
    fn on_run_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl UploadProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::UploadConfig`].
pub type ProgressCallback = Arc<dyn UploadProgressCallback>;
