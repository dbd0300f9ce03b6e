//! Generated text → paginated PDF.
//!
//! The layout is a plain typewriter model: one text line per output line,
//! 14 pt apart, starting one inch below the top of a US-Letter page. When the
//! next baseline would fall inside the bottom margin a new page starts. No
//! wrapping is attempted; long lines run off the right edge.
//!
//! Layout is computed separately from drawing so pagination can be checked
//! without a pdfium library.

use crate::error::BotError;
use crate::pipeline::render::bind_pdfium;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// US-Letter height in points.
pub const PAGE_HEIGHT: f32 = 792.0;
/// 1-inch margin on every side.
pub const MARGIN: f32 = 72.0;
/// Distance between consecutive baselines.
pub const LINE_SPACING: f32 = 14.0;
/// Body font size.
pub const FONT_SIZE: f32 = 12.0;

/// One line of text at a fixed baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine<'a> {
    pub y: f32,
    pub text: &'a str,
}

/// Number of lines that fit on one page with the fixed constants.
pub fn lines_per_page() -> usize {
    ((PAGE_HEIGHT - 2.0 * MARGIN) / LINE_SPACING).floor() as usize + 1
}

/// Split `text` into pages of placed lines.
///
/// Always returns at least one page.
pub fn layout_lines(text: &str) -> Vec<Vec<PlacedLine<'_>>> {
    let top = PAGE_HEIGHT - MARGIN;
    let mut pages = Vec::new();
    let mut current = Vec::new();
    let mut y = top;

    for line in text.split('\n') {
        current.push(PlacedLine { y, text: line });
        y -= LINE_SPACING;
        if y < MARGIN {
            pages.push(std::mem::take(&mut current));
            y = top;
        }
    }
    if !current.is_empty() || pages.is_empty() {
        pages.push(current);
    }
    pages
}

/// Render `text` into a PDF and return the file bytes.
pub async fn render_text_document(
    text: String,
    lib_path: Option<PathBuf>,
) -> Result<Vec<u8>, BotError> {
    tokio::task::spawn_blocking(move || render_text_document_blocking(&text, lib_path.as_deref()))
        .await
        .map_err(|e| BotError::Internal(format!("Document task panicked: {}", e)))?
}

fn render_text_document_blocking(text: &str, lib_path: Option<&Path>) -> Result<Vec<u8>, BotError> {
    let write_err = |e: PdfiumError| BotError::DocumentWriteFailed {
        detail: format!("{:?}", e),
    };

    let pdfium = bind_pdfium(lib_path)?;
    let mut document = pdfium.create_new_pdf().map_err(write_err)?;
    let font = document.fonts_mut().helvetica();

    let pages = layout_lines(text);
    for lines in &pages {
        let mut page = document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::new_portrait(
                PdfPagePaperStandardSize::USLetterAnsiA,
            ))
            .map_err(write_err)?;

        for line in lines.iter().filter(|l| !l.text.is_empty()) {
            page.objects_mut()
                .create_text_object(
                    PdfPoints::new(MARGIN),
                    PdfPoints::new(line.y),
                    line.text,
                    font,
                    PdfPoints::new(FONT_SIZE),
                )
                .map_err(write_err)?;
        }
    }

    let bytes = document.save_to_bytes().map_err(write_err)?;
    debug!(pages = pages.len(), bytes = bytes.len(), "Wrote insight PDF");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(n: usize) -> String {
        (0..n).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn forty_seven_lines_per_letter_page() {
        assert_eq!(lines_per_page(), 47);
    }

    #[test]
    fn page_count_is_ceiling_of_lines() {
        let per_page = lines_per_page();
        for n in [1, 2, 46, 47, 48, 94, 95, 200] {
            let text = text_of(n);
            let pages = layout_lines(&text);
            assert_eq!(pages.len(), n.div_ceil(per_page), "n = {n}");
            assert_eq!(pages.iter().map(Vec::len).sum::<usize>(), n);
        }
    }

    #[test]
    fn empty_text_still_yields_one_page() {
        let pages = layout_lines("");
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].len(), 1);
    }

    #[test]
    fn baselines_step_down_from_top_margin() {
        let pages = layout_lines("a\nb\nc");
        let ys: Vec<f32> = pages[0].iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![720.0, 706.0, 692.0]);
    }

    #[test]
    fn last_line_stays_above_bottom_margin() {
        let text = text_of(47);
        let pages = layout_lines(&text);
        let last = pages[0].last().unwrap();
        assert!(last.y >= MARGIN, "y = {}", last.y);
        assert_eq!(layout_lines(&text_of(48))[1][0].y, 720.0);
    }

    #[tokio::test]
    async fn writes_a_pdf() {
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP: set E2E_ENABLED=1 to run pdfium tests");
            return;
        }
        let lib = std::env::var("PDFIUM_LIB_PATH").ok().map(PathBuf::from);
        let bytes = render_text_document(text_of(60), lib.clone()).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        // 60 lines at 47 per page
        let pdfium = bind_pdfium(lib.as_deref()).unwrap();
        let document = pdfium.load_pdf_from_byte_slice(&bytes, None).unwrap();
        assert_eq!(document.pages().len() as usize, 2);
    }
}
