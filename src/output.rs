//! Result types returned by a completed upload run.

use crate::error::CleanupWarning;
use serde::Serialize;
use std::path::PathBuf;

/// Everything a successful run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// ID of the Notion page that was created.
    pub page_id: String,
    /// Title the page was created with.
    pub title: String,
    /// One entry per published page, in page order.
    pub pages: Vec<PublishedPage>,
    /// Non-fatal cleanup problems encountered along the way.
    pub warnings: Vec<CleanupWarning>,
    pub stats: RunStats,
}

/// A page image that was uploaded and attached to the Notion page.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedPage {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Public URL returned by the image host.
    pub image_url: String,
    /// Local file the URL was produced from (already deleted on success).
    pub local_path: PathBuf,
    /// Upload + append wall-clock time.
    pub duration_ms: u64,
}

/// Timing and count summary for a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub total_pages: usize,
    pub published_pages: usize,
    /// Always `2 × published_pages`: an image block and a note block each.
    pub blocks_appended: usize,
    pub render_duration_ms: u64,
    pub publish_duration_ms: u64,
    pub total_duration_ms: u64,
}
