//! Image encoding: `DynamicImage` → base64 PNG wrapped in `ImageData`.
//!
//! Vision APIs accept images as base64 data embedded in the JSON request
//! body. PNG keeps the report text crisp; JPEG artefacts around small print
//! noticeably degrade what the model can read off a scanned report.

use crate::error::BotError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::ImageData;
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode one rasterised page as a base64 PNG with `detail: "high"`.
pub fn encode_page(img: &DynamicImage) -> Result<ImageData, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded image → {} bytes base64", b64.len());

    Ok(ImageData::new(b64, "image/png").with_detail("high"))
}

/// Encode all pages in order, failing on the first page that cannot be encoded.
pub fn encode_pages(images: &[DynamicImage]) -> Result<Vec<ImageData>, BotError> {
    images
        .iter()
        .enumerate()
        .map(|(idx, img)| {
            encode_page(img).map_err(|e| BotError::EncodingFailed {
                page: idx + 1,
                detail: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn solid(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([255, 0, 0, 255])))
    }

    #[test]
    fn encode_small_image() {
        let data = encode_page(&solid(10, 10)).expect("encode should succeed");
        assert_eq!(data.mime_type, "image/png");
        let decoded = STANDARD.decode(&data.data).expect("valid base64");
        // PNG signature
        assert_eq!(&decoded[..4], b"\x89PNG");
    }

    #[test]
    fn encode_pages_keeps_order_and_count() {
        let pages = vec![solid(4, 4), solid(8, 8), solid(2, 2)];
        let encoded = encode_pages(&pages).unwrap();
        assert_eq!(encoded.len(), 3);
        assert!(encoded.iter().all(|d| d.mime_type == "image/png"));
    }
}
