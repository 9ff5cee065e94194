//! Tesseract OCR through its command-line interface.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::{DynamicImage, ImageFormat};
use tracing::{debug, info};

use super::OcrBackend;
use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Runs the `tesseract` executable on a staged PNG.
#[derive(Debug, Clone)]
pub struct TesseractBackend {
    command: PathBuf,
}

impl TesseractBackend {
    /// Use `tesseract` from `PATH`.
    pub fn new() -> Self {
        Self::with_command("tesseract")
    }

    pub fn with_command(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::with_command(config.tesseract_cmd.clone())
    }

    pub fn command(&self) -> &Path {
        &self.command
    }

    /// Recognize an image file already on disk.
    pub fn recognize_file(&self, image_path: &Path, lang: &str) -> Result<String, OcrError> {
        let output = Command::new(&self.command)
            .arg(image_path)
            .arg("stdout")
            .args(["-l", lang])
            .output();

        match output {
            Ok(output) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(OcrError::Recognition(format!(
                    "{} exited with {}: {}",
                    self.command.display(),
                    output.status,
                    stderr.trim()
                )))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OcrError::BackendNotAvailable(format!(
                    "{} not found (install tesseract-ocr)",
                    self.command.display()
                )))
            }
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}

impl Default for TesseractBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrBackend for TesseractBackend {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn recognize(&self, image: &DynamicImage, lang: &str) -> Result<String, OcrError> {
        let staged = tempfile::Builder::new()
            .prefix("docsift-")
            .suffix(".png")
            .tempfile()?;

        image
            .save_with_format(staged.path(), ImageFormat::Png)
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;
        debug!("Staged {}x{} image at {}", image.width(), image.height(), staged.path().display());

        let text = self.recognize_file(staged.path(), lang)?;
        info!("tesseract ({}) returned {} chars", lang, text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;

    fn blank() -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, image::Luma([255])))
    }

    #[test]
    fn test_missing_executable() {
        let backend = TesseractBackend::with_command("/nonexistent/docsift-tesseract");
        let err = backend.recognize(&blank(), "eng").unwrap_err();
        assert!(matches!(err, OcrError::BackendNotAvailable(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_executable() {
        let backend = TesseractBackend::with_command("false");
        let err = backend.recognize(&blank(), "eng").unwrap_err();
        assert!(matches!(err, OcrError::Recognition(_)));
    }

    #[test]
    fn test_from_config() {
        let config = OcrConfig {
            tesseract_cmd: PathBuf::from("/opt/tess/bin/tesseract"),
            ..Default::default()
        };
        let backend = TesseractBackend::from_config(&config);
        assert_eq!(backend.command(), Path::new("/opt/tess/bin/tesseract"));
    }
}
