//! Error types for the pdf2notion library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Pdf2NotionError`] — **Fatal**: the run cannot continue (unreadable
//!   document, image host rejected an upload, Notion refused a write).
//!   Returned as `Err(Pdf2NotionError)` from the top-level `upload*`
//!   functions. Nothing is retried; the first fatal error ends the run.
//!
//! * [`CleanupWarning`] — **Non-fatal**: a local file or the scratch
//!   directory could not be removed. Logged and collected in
//!   [`crate::output::RunReport::warnings`], never propagated.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2notion library.
#[derive(Debug, Error)]
pub enum Pdf2NotionError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Source document was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Rasterisation errors ──────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// pdfium could not render or save a page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium (or pass --pdfium-lib) to point at an\n\
existing copy, or place the library in the working directory.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Scratch storage ───────────────────────────────────────────────────
    /// The scratch directory could not be created or written.
    #[error("Scratch directory '{path}' is unusable: {source}")]
    ScratchDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Image host errors ─────────────────────────────────────────────────
    /// The image host did not return a URL for a page.
    #[error("Upload of page {page} failed: {reason}")]
    UploadFailed { page: usize, reason: UploadFailure },

    // ── Workspace errors ──────────────────────────────────────────────────
    /// Notion rejected a page creation or block append.
    #[error("Notion API error during {operation} (HTTP {status}): {message}")]
    WorkspaceApi {
        operation: WorkspaceOperation,
        status: u16,
        message: String,
    },

    /// An HTTP request never produced a response (DNS, TLS, timeout…).
    #[error("HTTP request to {service} failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The run was cancelled by the operator (Ctrl-C).
    #[error("Interrupted after {completed} of {total} pages")]
    Interrupted { completed: usize, total: usize },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why the image host did not hand back a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadFailure {
    /// HTTP succeeded but the embedded `status_code` reported a failure.
    #[error("image host rejected the upload ({status_code}): {status_txt}")]
    Rejected { status_code: u16, status_txt: String },

    /// The HTTP request itself failed.
    #[error("image host returned HTTP {status}: {body}")]
    Transport { status: u16, body: String },

    /// The request never produced a response (DNS, TLS, timeout…).
    #[error("image host unreachable: {detail}")]
    Unreachable { detail: String },

    /// HTTP and embedded status were fine but the body had no usable URL.
    #[error("image host response could not be decoded: {detail}")]
    Malformed { detail: String },

    /// The local page image could not be read.
    #[error("could not read '{path}': {detail}")]
    ReadFailed { path: PathBuf, detail: String },
}

/// The two remote Notion calls the run makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceOperation {
    CreatePage,
    AppendBlocks,
}

impl std::fmt::Display for WorkspaceOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkspaceOperation::CreatePage => f.write_str("page creation"),
            WorkspaceOperation::AppendBlocks => f.write_str("block append"),
        }
    }
}

/// A non-fatal local cleanup problem.
///
/// Stored in [`crate::output::RunReport`]; the run carries on regardless.
#[derive(Debug, Clone, Error, Serialize)]
pub enum CleanupWarning {
    /// A page image could not be deleted after it was published.
    #[error("could not delete page image '{path}': {detail}")]
    PageImage { path: PathBuf, detail: String },

    /// The scratch directory could not be removed at the end of the run.
    #[error("could not remove scratch directory '{path}': {detail}")]
    ScratchDir { path: PathBuf, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_upload_display_carries_service_text() {
        let e = Pdf2NotionError::UploadFailed {
            page: 2,
            reason: UploadFailure::Rejected {
                status_code: 400,
                status_txt: "Invalid API v1 key.".into(),
            },
        };
        let msg = e.to_string();
        assert!(msg.contains("page 2"), "got: {msg}");
        assert!(msg.contains("Invalid API v1 key."), "got: {msg}");
    }

    #[test]
    fn transport_upload_display_carries_status_and_body() {
        let reason = UploadFailure::Transport {
            status: 502,
            body: "<html>bad gateway</html>".into(),
        };
        let msg = reason.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("bad gateway"));
    }

    #[test]
    fn workspace_error_names_operation() {
        let e = Pdf2NotionError::WorkspaceApi {
            operation: WorkspaceOperation::AppendBlocks,
            status: 404,
            message: "Could not find block".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("block append"));
        assert!(msg.contains("404"));
        assert!(msg.contains("Could not find block"));
    }

    #[test]
    fn cleanup_warning_display() {
        let w = CleanupWarning::PageImage {
            path: PathBuf::from("temp_images/page_3.png"),
            detail: "busy".into(),
        };
        assert!(w.to_string().contains("page_3.png"));
    }
}
