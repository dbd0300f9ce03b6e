//! Document and completion pipeline used by the `/insight` command.
//!
//! ## Data Flow
//!
//! ```text
//! PDF bytes ──▶ render ──▶ encode ──▶ llm ──▶ format   (Slack message)
//!                                         └─▶ document (uploaded PDF)
//! ```
//!
//! 1. [`render`]: rasterise every page at a fixed DPI; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 2. [`encode`]: PNG-encode and base64-wrap each page for the request body
//! 3. [`llm`]: the only stage with network I/O
//! 4. [`format`]: line-local plain text → Slack mrkdwn
//! 5. [`document`]: plain text → paginated PDF
//!
//! [`DocumentRenderer`] bundles the two pdfium stages behind a trait so the
//! HTTP handlers can be exercised without a pdfium library.

pub mod document;
pub mod encode;
pub mod format;
pub mod llm;
pub mod render;

use crate::error::BotError;
use async_trait::async_trait;
use image::DynamicImage;
use std::path::PathBuf;

/// PDF in, page images out; text in, PDF out.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Rasterise every page of `pdf` in order.
    async fn page_images(&self, pdf: Vec<u8>) -> Result<Vec<DynamicImage>, BotError>;

    /// Lay out `text` as a paginated PDF.
    async fn text_document(&self, text: String) -> Result<Vec<u8>, BotError>;
}

/// [`DocumentRenderer`] backed by pdfium.
#[derive(Debug, Clone)]
pub struct PdfiumRenderer {
    dpi: u32,
    lib_path: Option<PathBuf>,
}

impl PdfiumRenderer {
    pub fn new(dpi: u32, lib_path: Option<PathBuf>) -> Self {
        Self { dpi, lib_path }
    }
}

#[async_trait]
impl DocumentRenderer for PdfiumRenderer {
    async fn page_images(&self, pdf: Vec<u8>) -> Result<Vec<DynamicImage>, BotError> {
        render::render_pdf_pages(pdf, self.dpi, self.lib_path.clone()).await
    }

    async fn text_document(&self, text: String) -> Result<Vec<u8>, BotError> {
        document::render_text_document(text, self.lib_path.clone()).await
    }
}
