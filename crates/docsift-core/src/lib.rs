//! Core library for scanned document processing.
//!
//! This crate provides:
//! - OCR adapter with an enhance-then-fallback recognition policy
//! - PDF page rasterization for OCR
//! - Text normalization for OCR-degraded output
//! - Schema-free inference of key/value pairs, sections and generic fields

pub mod analysis;
pub mod error;
pub mod models;
pub mod ocr;
pub mod pdf;

pub use analysis::{analyze, analyze_raw, normalize, DocumentAnalyzer, Extractor};
pub use error::{OcrError, PdfError, Result, SiftError};
pub use models::analysis::{AnalysisResult, ExtractedFields, FieldKey, KeyValueMap, SectionMap};
pub use models::config::SiftConfig;
pub use ocr::{DocumentReader, ImageEnhancer, ImageStrategy, OcrBackend, TesseractBackend};
pub use pdf::{PageRasterizer, PdftoppmRasterizer};

#[cfg(feature = "onnx")]
pub use ocr::PureOcrEngine;
