//! PDF rasterisation: render every page to a PNG file via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! `pdfium-render` wraps the pdfium C++ library, which keeps thread-local
//! state and is CPU-bound. The work runs on tokio's blocking pool so the
//! runtime threads never stall while a long deck renders.
//!
//! ## All or nothing
//!
//! Either every page lands on disk or the call fails. Files written before
//! a mid-document failure are removed again so callers never see a partial
//! page sequence.

use crate::error::Pdf2NotionError;
use async_trait::async_trait;
use image::ImageFormat;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// pdfium renders at 72 points per inch; scale factors are relative to it.
const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Turns a document into one image file per page.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// Render `document` into `out_dir` at `dpi`.
    ///
    /// Returns the image paths in page order (page 1 first).
    async fn rasterize(
        &self,
        document: &Path,
        out_dir: &Path,
        dpi: u32,
    ) -> Result<Vec<PathBuf>, Pdf2NotionError>;
}

/// File name for a 1-indexed page: `page_{n}.png`.
pub fn page_file_name(page_num: usize) -> String {
    format!("page_{page_num}.png")
}

/// pdfium-backed [`Rasterizer`].
#[derive(Debug, Clone, Default)]
pub struct PdfiumRasterizer {
    library: Option<PathBuf>,
}

impl PdfiumRasterizer {
    /// Bind to `library` if given, else `PDFIUM_LIB_PATH`, else the
    /// working directory, else the system library.
    pub fn new(library: Option<PathBuf>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Rasterizer for PdfiumRasterizer {
    async fn rasterize(
        &self,
        document: &Path,
        out_dir: &Path,
        dpi: u32,
    ) -> Result<Vec<PathBuf>, Pdf2NotionError> {
        let library = self.library.clone();
        let document = document.to_path_buf();
        let out_dir = out_dir.to_path_buf();

        tokio::task::spawn_blocking(move || {
            let pdfium = bind_pdfium(library.as_deref())?;
            let mut written = Vec::new();
            let result = render_blocking(&pdfium, &document, &out_dir, dpi, &mut written);
            if result.is_err() {
                discard(&written);
            }
            result.map(|()| written)
        })
        .await
        .map_err(|e| Pdf2NotionError::Internal(format!("Render task panicked: {}", e)))?
    }
}

fn bind_pdfium(explicit: Option<&Path>) -> Result<Pdfium, Pdf2NotionError> {
    let configured = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os("PDFIUM_LIB_PATH").map(PathBuf::from));

    let bindings = match configured {
        Some(path) => Pdfium::bind_to_library(&path).map_err(|e| {
            Pdf2NotionError::PdfiumBindingFailed(format!("{}: {}", path.display(), e))
        })?,
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| Pdf2NotionError::PdfiumBindingFailed(e.to_string()))?,
    };

    Ok(Pdfium::new(bindings))
}

fn render_blocking(
    pdfium: &Pdfium,
    document_path: &Path,
    out_dir: &Path,
    dpi: u32,
    written: &mut Vec<PathBuf>,
) -> Result<(), Pdf2NotionError> {
    let document = pdfium
        .load_pdf_from_file(document_path, None)
        .map_err(|e| Pdf2NotionError::CorruptPdf {
            path: document_path.to_path_buf(),
            detail: format!("{:?}", e),
        })?;

    let pages = document.pages();
    info!("PDF loaded: {} pages", pages.len());

    let render_config =
        PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / PDF_POINTS_PER_INCH);

    for (idx, page) in pages.iter().enumerate() {
        let page_num = idx + 1;

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            Pdf2NotionError::RasterisationFailed {
                page: page_num,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image();
        let path = out_dir.join(page_file_name(page_num));
        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| Pdf2NotionError::RasterisationFailed {
                page: page_num,
                detail: format!("could not write {}: {}", path.display(), e),
            })?;

        debug!(
            "Rendered page {} → {}x{} px → {}",
            page_num,
            image.width(),
            image.height(),
            path.display()
        );
        written.push(path);
    }

    Ok(())
}

fn discard(paths: &[PathBuf]) {
    for p in paths {
        if let Err(e) = std::fs::remove_file(p) {
            warn!("Could not remove partial render {}: {}", p.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_files_are_one_indexed_png() {
        assert_eq!(page_file_name(1), "page_1.png");
        assert_eq!(page_file_name(12), "page_12.png");
    }

    #[test]
    fn discard_removes_written_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = (1..=2).map(|n| dir.path().join(page_file_name(n))).collect();
        for p in &paths {
            std::fs::write(p, b"png").unwrap();
        }
        discard(&paths);
        assert!(paths.iter().all(|p| !p.exists()));
    }

    #[test]
    fn explicit_missing_library_fails_to_bind() {
        let err = bind_pdfium(Some(Path::new("/nonexistent/libpdfium.so"))).unwrap_err();
        assert!(matches!(err, Pdf2NotionError::PdfiumBindingFailed(_)));
    }
}
