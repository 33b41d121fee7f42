//! PDF handling
//!
//! Low-level page rasterization via MuPDF.

mod rasterizer;

pub use rasterizer::{PdfRasterizer, RasterizeError, RENDER_DPI};
