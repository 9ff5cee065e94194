//! Configuration structures for the OCR adapter and extractors.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SiftError};

/// Main configuration for the docsift pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Image enhancement applied before the first recognition attempt.
    pub preprocess: PreprocessConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Text inference configuration.
    pub extraction: ExtractionConfig,

    /// Model configuration (ONNX backend only).
    pub models: ModelConfig,
}

/// Which OCR backend recognizes text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrEngineKind {
    /// External `tesseract` executable.
    #[default]
    Tesseract,
    /// PaddleOCR models through pure-onnx-ocr (feature `onnx`).
    Onnx,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Backend used for recognition.
    pub engine: OcrEngineKind,

    /// Path or name of the tesseract executable.
    pub tesseract_cmd: PathBuf,

    /// Language code passed to the OCR backend.
    pub language: String,

    /// An enhanced-image result must have more cleaned characters than
    /// this to be accepted without trying the original image.
    pub min_text_chars: usize,

    /// Keep `[UNK]` tokens emitted by the ONNX recognizer.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: OcrEngineKind::Tesseract,
            tesseract_cmd: PathBuf::from("tesseract"),
            language: "eng".to_string(),
            min_text_chars: 20,
            keep_unk: false,
        }
    }
}

/// Image enhancement configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Images whose longer side is below this are upscaled.
    pub upscale_below: u32,

    /// Upscale factor for small images.
    pub upscale_factor: f32,

    /// CLAHE clip limit (relative to the mean histogram bin).
    pub clahe_clip_limit: f32,

    /// CLAHE tiles per axis.
    pub clahe_grid: u32,

    /// Median filter radius (1 = 3x3).
    pub median_radius: u32,

    /// Adaptive threshold neighbourhood size (odd).
    pub threshold_block_size: u32,

    /// Subtracted from the local mean before thresholding.
    pub threshold_offset: i32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            upscale_below: 1000,
            upscale_factor: 1.5,
            clahe_clip_limit: 2.0,
            clahe_grid: 8,
            median_radius: 1,
            threshold_block_size: 31,
            threshold_offset: 11,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Path or name of the pdftoppm executable.
    pub pdftoppm_cmd: PathBuf,

    /// DPI for rendering PDF pages to images.
    pub render_dpi: u32,

    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            pdftoppm_cmd: PathBuf::from("pdftoppm"),
            render_dpi: 200,
            max_pages: 0,
        }
    }
}

/// Text inference configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Longest label accepted as a key.
    pub max_label_chars: usize,

    /// Lowercase label prefixes rejected as known OCR misreads.
    pub noise_prefixes: Vec<String>,

    /// Longest line (in tokens) that can be a section heading.
    pub heading_max_tokens: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_label_chars: 40,
            noise_prefixes: ["cofull", "ofull", "odeveloped", "developeda", "oal", "e"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            heading_max_tokens: 5,
        }
    }
}

/// Model file paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl SiftConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| SiftError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| SiftError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        let pre = &self.preprocess;
        if pre.threshold_block_size < 3 || pre.threshold_block_size % 2 == 0 {
            return Err(SiftError::Config(format!(
                "preprocess.threshold_block_size must be odd and >= 3, got {}",
                pre.threshold_block_size
            )));
        }
        if pre.clahe_grid == 0 {
            return Err(SiftError::Config("preprocess.clahe_grid must be positive".to_string()));
        }
        if !(pre.upscale_factor > 0.0) {
            return Err(SiftError::Config(
                "preprocess.upscale_factor must be positive".to_string(),
            ));
        }
        if self.ocr.language.trim().is_empty() {
            return Err(SiftError::Config("ocr.language must not be empty".to_string()));
        }
        if self.pdf.render_dpi == 0 {
            return Err(SiftError::Config("pdf.render_dpi must be positive".to_string()));
        }
        Ok(())
    }

    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.models.model_dir.join(model_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SiftConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ocr.min_text_chars, 20);
        assert_eq!(config.extraction.noise_prefixes.len(), 6);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "ocr": { "language": "deu" } }"#).unwrap();

        let config = SiftConfig::from_file(&path).unwrap();
        assert_eq!(config.ocr.language, "deu");
        assert_eq!(config.ocr.tesseract_cmd, PathBuf::from("tesseract"));
        assert_eq!(config.pdf.render_dpi, 200);
    }

    #[test]
    fn test_even_block_size_rejected() {
        let mut config = SiftConfig::default();
        config.preprocess.threshold_block_size = 30;
        assert!(matches!(config.validate(), Err(SiftError::Config(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = SiftConfig::default();
        config.extraction.heading_max_tokens = 3;
        config.save(&path).unwrap();

        let loaded = SiftConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.heading_max_tokens, 3);
    }
}
