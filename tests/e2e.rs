//! End-to-end tests for pdf2notion.
//!
//! These render a real PDF with pdfium and, for the upload test, talk to
//! freeimage.host and Notion. They are gated behind `E2E_ENABLED` so they
//! never run in CI unless explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 E2E_PDF=slides.pdf \
//!   NOTION_TOKEN=... NOTION_PARENT_PAGE_ID=... FREEIMAGE_API_KEY=... \
//!   cargo test --test e2e -- --nocapture

use pdf2notion::{
    upload, PdfiumRasterizer, Pdf2NotionError, Rasterizer, ScratchPolicy, UploadConfig,
};
use std::path::PathBuf;

/// Skip unless `E2E_ENABLED` is set and `E2E_PDF` points at a file.
macro_rules! e2e_skip_unless_ready {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let p = match std::env::var("E2E_PDF") {
            Ok(p) => PathBuf::from(p),
            Err(_) => {
                println!("SKIP — set E2E_PDF=/path/to/document.pdf");
                return;
            }
        };
        if !p.exists() {
            println!("SKIP — test file not found: {}", p.display());
            return;
        }
        p
    }};
}

fn env_or_skip(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Some(v),
        _ => {
            println!("SKIP — {name} not set");
            None
        }
    }
}

// ── No network, no pdfium ────────────────────────────────────────────────────

#[tokio::test]
async fn upload_rejects_incomplete_config_before_any_io() {
    let config = UploadConfig {
        document_path: PathBuf::from("slides.pdf"),
        ..UploadConfig::default()
    };
    let err = upload(&config).await.unwrap_err();
    assert!(
        matches!(err, Pdf2NotionError::InvalidConfig(ref m) if m.contains("workspace_token")),
        "got: {err}"
    );
}

// ── pdfium only ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn pdfium_renders_one_png_per_page() {
    let pdf = e2e_skip_unless_ready!();
    let out = tempfile::tempdir().unwrap();

    let pages = PdfiumRasterizer::default()
        .rasterize(&pdf, out.path(), 100)
        .await
        .expect("rasterise should succeed");

    assert!(!pages.is_empty());
    for (i, p) in pages.iter().enumerate() {
        assert_eq!(
            p.file_name().unwrap().to_string_lossy(),
            format!("page_{}.png", i + 1)
        );
        let img = image::open(p).expect("valid PNG");
        assert!(img.width() > 0 && img.height() > 0);
    }
    println!("Rendered {} pages", pages.len());
}

#[tokio::test]
async fn pdfium_rejects_corrupt_document() {
    let _ = e2e_skip_unless_ready!();
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("broken.pdf");
    std::fs::write(&bogus, b"%PDF-1.4\nthis is not really a pdf").unwrap();

    let err = PdfiumRasterizer::default()
        .rasterize(&bogus, dir.path(), 100)
        .await
        .unwrap_err();
    assert!(matches!(err, Pdf2NotionError::CorruptPdf { .. }), "got: {err}");
}

// ── Live services ────────────────────────────────────────────────────────────

#[tokio::test]
async fn live_upload_creates_page_with_two_blocks_per_slide() {
    let pdf = e2e_skip_unless_ready!();
    let (Some(token), Some(parent), Some(key)) = (
        env_or_skip("NOTION_TOKEN"),
        env_or_skip("NOTION_PARENT_PAGE_ID"),
        env_or_skip("FREEIMAGE_API_KEY"),
    ) else {
        return;
    };
    let root = tempfile::tempdir().unwrap();
    let scratch = root.path().join("temp_images");

    let config = UploadConfig::builder()
        .document_path(&pdf)
        .workspace_token(token)
        .parent_container_id(parent)
        .image_host_credential(key)
        .scratch_folder(&scratch)
        .scratch_policy(ScratchPolicy::RemoveAlways)
        .dpi(100)
        .title("pdf2notion e2e")
        .build()
        .expect("valid config");

    let report = upload(&config).await.expect("upload should succeed");

    assert_eq!(report.stats.blocks_appended, report.stats.total_pages * 2);
    assert!(report.pages.iter().all(|p| p.image_url.starts_with("http")));
    assert!(!scratch.exists());
    println!(
        "Created {} ({} pages)",
        report.page_id, report.stats.published_pages
    );
}
