//! Scratch storage for rendered page images.
//!
//! [`ScratchDir`] owns the staging directory for the duration of a run.
//! [`ScratchDir::close`] cleans it up after the last page; if the guard is
//! dropped without being closed (fatal error, or the run future was
//! cancelled by Ctrl-C) the [`ScratchPolicy`] decides whether it is cleaned
//! up or left behind for inspection.
//!
//! Only a directory the run created is removed recursively. A directory that
//! already existed loses the page images this run wrote and is removed only
//! if nothing else is left in it.

use crate::config::ScratchPolicy;
use crate::error::{CleanupWarning, Pdf2NotionError};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Guard over the run's scratch directory.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    policy: ScratchPolicy,
    created: bool,
    page_images: Vec<PathBuf>,
    closed: bool,
}

impl ScratchDir {
    /// Create `path` (and parents) if missing. An existing directory is reused.
    pub fn acquire(path: impl Into<PathBuf>, policy: ScratchPolicy) -> Result<Self, Pdf2NotionError> {
        let path = path.into();
        let created = !path.exists();
        std::fs::create_dir_all(&path).map_err(|source| Pdf2NotionError::ScratchDirFailed {
            path: path.clone(),
            source,
        })?;
        debug!(
            "Scratch directory ready: {} (created: {})",
            path.display(),
            created
        );
        Ok(Self {
            path,
            policy,
            created,
            page_images: Vec::new(),
            closed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this run created the directory.
    pub fn created(&self) -> bool {
        self.created
    }

    /// Record page images written by this run so cleanup can find them.
    pub fn track(&mut self, images: &[PathBuf]) {
        self.page_images.extend_from_slice(images);
    }

    /// Clean up after a completed run.
    pub fn close(mut self) -> Vec<CleanupWarning> {
        self.closed = true;
        let warnings = self.release();
        if warnings.is_empty() {
            info!("Scratch directory {} cleaned up", self.path.display());
        }
        warnings
    }

    fn release(&self) -> Vec<CleanupWarning> {
        if self.created {
            return remove_tree(&self.path).into_iter().collect();
        }
        let warnings: Vec<CleanupWarning> = self
            .page_images
            .iter()
            .filter(|p| p.exists())
            .filter_map(|p| remove_page_image(p))
            .collect();
        match std::fs::remove_dir(&self.path) {
            Ok(()) => debug!("Removed emptied scratch directory {}", self.path.display()),
            Err(_) => debug!(
                "Keeping pre-existing scratch directory {}",
                self.path.display()
            ),
        }
        warnings
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        match self.policy {
            ScratchPolicy::RemoveAlways => {
                if self.release().is_empty() {
                    debug!("Scratch directory {} cleaned up after abort", self.path.display());
                }
            }
            ScratchPolicy::KeepOnFailure => {
                info!(
                    "Run aborted; leaving scratch directory {} in place",
                    self.path.display()
                );
            }
        }
    }
}

/// Delete a published page image. Failure is reported, never fatal.
pub fn remove_page_image(path: &Path) -> Option<CleanupWarning> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!("Deleted {} from the local machine", path.display());
            None
        }
        Err(e) => {
            let w = CleanupWarning::PageImage {
                path: path.to_path_buf(),
                detail: e.to_string(),
            };
            warn!("{w}");
            Some(w)
        }
    }
}

fn remove_tree(path: &Path) -> Option<CleanupWarning> {
    if !path.exists() {
        return None;
    }
    let w = std::fs::remove_dir_all(path)
        .err()
        .map(|e| CleanupWarning::ScratchDir {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
    warn!("{w}");
    Some(w)
}
