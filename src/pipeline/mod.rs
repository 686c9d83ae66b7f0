//! Pipeline stages for a PDF-to-Notion run.
//!
//! Each submodule implements exactly one step. The three remote-facing
//! stages sit behind traits ([`render::Rasterizer`],
//! [`publish::ImagePublisher`], [`workspace::WorkspaceWriter`]) so the
//! orchestrator can be driven by in-memory fakes in tests.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ scratch ──▶ render ──▶ workspace ──▶ ┌ publish ┐ per page
//! (%PDF)    (mkdir)     (pdfium)   (create page) └ append  ┘
//! ```
//!
//! 1. [`input`]     — check the source document exists and is a PDF
//! 2. [`scratch`]   — staging directory guard with guaranteed cleanup
//! 3. [`render`]    — rasterise every page to `page_{n}.png`
//! 4. [`publish`]   — upload one image, return its public URL
//! 5. [`workspace`] — create the Notion page, append image + note blocks

pub mod input;
pub mod publish;
pub mod render;
pub mod scratch;
pub mod workspace;

#[cfg(test)]
pub(crate) mod stub_server;
