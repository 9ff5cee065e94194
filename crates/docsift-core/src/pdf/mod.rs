//! PDF page rasterization for OCR.

mod rasterizer;

pub use rasterizer::{inspect, PdftoppmRasterizer};

use std::path::Path;

use image::DynamicImage;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Renders every page of a PDF to an image, in page order.
pub trait PageRasterizer: Send + Sync {
    fn rasterize(&self, path: &Path) -> Result<Vec<DynamicImage>>;
}
