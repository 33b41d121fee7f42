//! PDF page rasterization
//!
//! Renders every page of a PDF to a PNG image via MuPDF. A document is
//! processed whole inside a single blocking task; MuPDF handles never cross
//! thread boundaries.

use std::io::Cursor;

use image::DynamicImage;
use mupdf::{Colorspace, Document, Matrix};
use thiserror::Error;

/// Rasterization resolution. PDF points are 72 per inch, so the render
/// matrix scales by `RENDER_DPI / 72`.
pub const RENDER_DPI: f32 = 200.0;

#[derive(Debug, Error)]
pub enum RasterizeError {
    #[error("failed to open document: {0}")]
    Open(String),

    #[error("document has no pages")]
    Empty,

    #[error("failed to render page {page}: {message}")]
    Render { page: usize, message: String },

    #[error("failed to encode page {page}: {message}")]
    Encode { page: usize, message: String },

    #[error("render task aborted: {0}")]
    Join(String),
}

/// Rasterizes PDF payloads into per-page PNG images.
#[derive(Debug, Clone)]
pub struct PdfRasterizer {
    scale: f32,
}

impl PdfRasterizer {
    pub fn new() -> Self {
        Self {
            scale: RENDER_DPI / 72.0,
        }
    }

    /// Render every page of `data` to a PNG, in page order.
    ///
    /// Fails as a whole on the first unrenderable page; a partially
    /// converted document is never returned.
    pub async fn rasterize(&self, data: Vec<u8>) -> Result<Vec<Vec<u8>>, RasterizeError> {
        let scale = self.scale;
        tokio::task::spawn_blocking(move || rasterize_blocking(&data, scale))
            .await
            .map_err(|e| RasterizeError::Join(e.to_string()))?
    }
}

impl Default for PdfRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

fn rasterize_blocking(data: &[u8], scale: f32) -> Result<Vec<Vec<u8>>, RasterizeError> {
    let doc = Document::from_bytes(data, "application/pdf")
        .map_err(|e| RasterizeError::Open(e.to_string()))?;

    let page_count = doc
        .page_count()
        .map_err(|e| RasterizeError::Open(e.to_string()))? as usize;
    if page_count == 0 {
        return Err(RasterizeError::Empty);
    }

    let matrix = Matrix::new_scale(scale, scale);
    let colorspace = Colorspace::device_rgb();

    let mut pages = Vec::with_capacity(page_count);
    for index in 0..page_count {
        let page = doc.load_page(index as i32).map_err(|e| RasterizeError::Render {
            page: index + 1,
            message: e.to_string(),
        })?;

        let pixmap = page
            .to_pixmap(&matrix, &colorspace, true, true)
            .map_err(|e| RasterizeError::Render {
                page: index + 1,
                message: e.to_string(),
            })?;

        pages.push(encode_png(&pixmap, index + 1)?);
    }

    Ok(pages)
}

fn encode_png(pixmap: &mupdf::Pixmap, page: usize) -> Result<Vec<u8>, RasterizeError> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize;

    // Convert to RGBA buffer
    let mut rgba_buffer = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(0);
            let g = samples.get(offset + 1).copied().unwrap_or(0);
            let b = samples.get(offset + 2).copied().unwrap_or(0);
            let a = if n >= 4 {
                samples.get(offset + 3).copied().unwrap_or(255)
            } else {
                255
            };
            rgba_buffer.extend_from_slice(&[r, g, b, a]);
        }
    }

    let img = image::RgbaImage::from_raw(width, height, rgba_buffer).ok_or_else(|| {
        RasterizeError::Encode {
            page,
            message: "failed to create image buffer".to_string(),
        }
    })?;

    let mut output = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png)
        .map_err(|e| RasterizeError::Encode {
            page,
            message: e.to_string(),
        })?;

    Ok(output)
}
