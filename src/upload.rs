//! Run orchestration: rasterise once, create one page, then publish and
//! append page by page.
//!
//! ## Ordering guarantees
//!
//! * The destination page is created exactly once, before any append.
//! * Pages are handled strictly one after another in ascending order:
//!   upload page *i*, append its two blocks, delete its PNG, then move on.
//! * The first upload or append failure ends the run. Pages before it keep
//!   their blocks; nothing is written for it or any later page.
//!
//! ## Cleanup
//!
//! A failed page-image delete is a [`CleanupWarning`], never an abort. The
//! scratch directory is cleaned up after the last page; on a fatal error its
//! fate is decided by [`crate::config::ScratchPolicy`]. A directory the run
//! did not create is never removed recursively.

use crate::config::UploadConfig;
use crate::error::{CleanupWarning, Pdf2NotionError};
use crate::output::{PublishedPage, RunReport, RunStats};
use crate::pipeline::publish::{FreeImageHost, ImagePublisher};
use crate::pipeline::render::{PdfiumRasterizer, Rasterizer};
use crate::pipeline::scratch::{self, ScratchDir};
use crate::pipeline::workspace::{NotionClient, WorkspaceWriter};
use crate::pipeline::input;
use std::time::Instant;
use tracing::{error, info};

/// Upload a PDF to Notion using the real pdfium, freeimage.host and Notion
/// backends described by `config`.
///
/// # Errors
/// Any rasterisation, upload, or Notion failure aborts the run and is
/// returned as-is. Nothing is retried.
pub async fn upload(config: &UploadConfig) -> Result<RunReport, Pdf2NotionError> {
    let rasterizer = PdfiumRasterizer::new(config.pdfium_library.clone());
    let publisher = FreeImageHost::new(
        &config.image_host_url,
        &config.image_host_credential,
        config.http_timeout_secs,
    )?;
    let writer = NotionClient::new(
        &config.workspace_api_url,
        &config.workspace_token,
        &config.workspace_api_version,
        &config.note_text,
        config.http_timeout_secs,
    )?;

    upload_with(config, &rasterizer, &publisher, &writer).await
}

/// Synchronous wrapper around [`upload`].
///
/// Creates a temporary tokio runtime internally.
pub fn upload_sync(config: &UploadConfig) -> Result<RunReport, Pdf2NotionError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2NotionError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(upload(config))
}

/// Drive a run against caller-supplied stage implementations.
///
/// The configuration is validated first; an invalid one fails with
/// [`Pdf2NotionError::InvalidConfig`] before any stage runs.
pub async fn upload_with(
    config: &UploadConfig,
    rasterizer: &dyn Rasterizer,
    publisher: &dyn ImagePublisher,
    writer: &dyn WorkspaceWriter,
) -> Result<RunReport, Pdf2NotionError> {
    config.validate()?;
    let total_start = Instant::now();
    info!("Starting upload: {}", config.document_path.display());

    // ── Step 1: Validate input ───────────────────────────────────────────
    input::validate_document(&config.document_path)?;

    // ── Step 2: Scratch directory ────────────────────────────────────────
    let mut scratch = ScratchDir::acquire(&config.scratch_folder, config.scratch_policy)?;

    // ── Step 3: Rasterise ────────────────────────────────────────────────
    let render_start = Instant::now();
    let images = rasterizer
        .rasterize(&config.document_path, scratch.path(), config.dpi)
        .await?;
    scratch.track(&images);
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    let total_pages = images.len();
    info!("Rendered {} pages in {}ms", total_pages, render_duration_ms);

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(total_pages);
    }

    // ── Step 4: Destination page ─────────────────────────────────────────
    let title = config.resolved_title();
    let page_id = writer
        .create_container(&config.parent_container_id, &title)
        .await?;
    info!("Created Notion page '{}' ({})", title, page_id);

    if let Some(ref cb) = config.progress_callback {
        cb.on_container_created(&page_id, &title);
    }

    // ── Step 5: Publish + append, one page at a time ─────────────────────
    let publish_start = Instant::now();
    let mut published = Vec::with_capacity(total_pages);
    let mut warnings: Vec<CleanupWarning> = Vec::new();

    for (idx, image) in images.iter().enumerate() {
        let page_num = idx + 1;
        let page_start = Instant::now();
        info!("Uploading page {}/{}...", page_num, total_pages);
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, total_pages);
        }

        let step = async {
            let url = publisher
                .publish(image)
                .await
                .map_err(|reason| Pdf2NotionError::UploadFailed {
                    page: page_num,
                    reason,
                })?;
            writer.append_page_blocks(&page_id, &url).await?;
            Ok::<_, Pdf2NotionError>(url)
        };

        let image_url = match step.await {
            Ok(url) => url,
            Err(e) => {
                error!("Page {}/{} aborted the run: {}", page_num, total_pages, e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_error(page_num, total_pages, &e.to_string());
                }
                return Err(e);
            }
        };

        if let Some(w) = scratch::remove_page_image(image) {
            warnings.push(w);
        }

        if let Some(ref cb) = config.progress_callback {
            cb.on_page_complete(page_num, total_pages, &image_url);
        }

        published.push(PublishedPage {
            page_num,
            image_url,
            local_path: image.clone(),
            duration_ms: page_start.elapsed().as_millis() as u64,
        });
    }
    let publish_duration_ms = publish_start.elapsed().as_millis() as u64;

    // ── Step 6: Clean up scratch directory ───────────────────────────────
    warnings.extend(scratch.close());

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(total_pages);
    }

    let stats = RunStats {
        total_pages,
        published_pages: published.len(),
        blocks_appended: published.len() * 2,
        render_duration_ms,
        publish_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Upload complete: {} pages → '{}' in {}ms ({} warnings)",
        stats.published_pages,
        title,
        stats.total_duration_ms,
        warnings.len()
    );

    Ok(RunReport {
        page_id,
        title,
        pages: published,
        warnings,
        stats,
    })
}
