//! PDF rasterisation: render every page of an uploaded report to a
//! `DynamicImage` via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which is CPU-bound
//! and not async-aware. `tokio::task::spawn_blocking` moves the work onto the
//! blocking pool so webhook acknowledgements on the worker threads are not
//! held up by a large report.

use crate::error::BotError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// PDF user space is defined at 72 points per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Bind to pdfium, preferring an explicit library path over the system one.
pub(crate) fn bind_pdfium(lib_path: Option<&Path>) -> Result<Pdfium, BotError> {
    let bindings = match lib_path {
        Some(path) => Pdfium::bind_to_library(path.to_string_lossy().to_string()),
        None => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| BotError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// Rasterise every page of an in-memory PDF at `dpi`.
///
/// # Returns
/// One image per page, in page order.
pub async fn render_pdf_pages(
    pdf_bytes: Vec<u8>,
    dpi: u32,
    lib_path: Option<PathBuf>,
) -> Result<Vec<DynamicImage>, BotError> {
    tokio::task::spawn_blocking(move || {
        render_pdf_pages_blocking(&pdf_bytes, dpi, lib_path.as_deref())
    })
    .await
    .map_err(|e| BotError::Internal(format!("Render task panicked: {}", e)))?
}

/// Blocking implementation of page rendering.
fn render_pdf_pages_blocking(
    pdf_bytes: &[u8],
    dpi: u32,
    lib_path: Option<&Path>,
) -> Result<Vec<DynamicImage>, BotError> {
    let pdfium = bind_pdfium(lib_path)?;

    let document = pdfium
        .load_pdf_from_byte_slice(pdf_bytes, None)
        .map_err(|e| BotError::CorruptPdf {
            detail: format!("{:?}", e),
        })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    if total_pages == 0 {
        return Err(BotError::EmptyPdf);
    }
    info!("PDF loaded: {} pages", total_pages);

    let render_config = PdfRenderConfig::new().scale_page_by_factor(scale_for_dpi(dpi));

    let mut images = Vec::with_capacity(total_pages);
    for (idx, page) in pages.iter().enumerate() {
        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            BotError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );
        images.push(image);
    }

    Ok(images)
}

/// Scale factor turning PDF points into pixels at the requested DPI.
fn scale_for_dpi(dpi: u32) -> f32 {
    dpi as f32 / POINTS_PER_INCH
}
