//! OCR adapter: recognition backends, scan enhancement and the
//! strategy-list document reader.

mod preprocessing;
mod reader;
mod tesseract;

#[cfg(feature = "onnx")]
mod pure_engine;

pub use preprocessing::ImageEnhancer;
pub use reader::{DocumentReader, ImageStrategy};
pub use tesseract::TesseractBackend;

#[cfg(feature = "onnx")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;

use crate::error::OcrError;
use crate::models::config::{OcrEngineKind, SiftConfig};

/// A text recognizer for a single in-memory image.
pub trait OcrBackend: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    /// Recognize all text in `image` using language `lang`.
    fn recognize(&self, image: &DynamicImage, lang: &str) -> Result<String, OcrError>;
}

/// Build the backend selected by `ocr.engine`.
pub fn create_backend(config: &SiftConfig) -> Result<Box<dyn OcrBackend>, OcrError> {
    match config.ocr.engine {
        OcrEngineKind::Tesseract => Ok(Box::new(TesseractBackend::from_config(&config.ocr))),
        #[cfg(feature = "onnx")]
        OcrEngineKind::Onnx => Ok(Box::new(PureOcrEngine::from_config(config)?)),
        #[cfg(not(feature = "onnx"))]
        OcrEngineKind::Onnx => Err(OcrError::BackendNotAvailable(
            "onnx engine requires building with the `onnx` feature".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backend_is_tesseract() {
        let backend = create_backend(&SiftConfig::default()).unwrap();
        assert_eq!(backend.name(), "tesseract");
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn test_onnx_backend_needs_feature() {
        let mut config = SiftConfig::default();
        config.ocr.engine = OcrEngineKind::Onnx;
        assert!(matches!(
            create_backend(&config),
            Err(OcrError::BackendNotAvailable(_))
        ));
    }
}
