//! File-level OCR with an ordered list of recognition strategies.

use std::path::Path;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info, warn};

use super::{create_backend, ImageEnhancer, OcrBackend};
use crate::analysis::{normalize, DocumentAnalyzer};
use crate::error::{OcrError, Result, SiftError};
use crate::models::analysis::AnalysisResult;
use crate::models::config::SiftConfig;
use crate::pdf::{PageRasterizer, PdftoppmRasterizer};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "bmp", "webp"];

/// How an image is prepared before recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStrategy {
    /// Run the scan enhancement transform first.
    Enhanced,
    /// Recognize the image as loaded.
    Original,
}

impl ImageStrategy {
    /// Default order: enhanced first, original as fallback.
    pub const DEFAULT_ORDER: [ImageStrategy; 2] = [ImageStrategy::Enhanced, ImageStrategy::Original];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageStrategy::Enhanced => "enhanced",
            ImageStrategy::Original => "original",
        }
    }
}

/// Reads images and PDFs into raw text, and optionally analyzes them.
pub struct DocumentReader {
    backend: Box<dyn OcrBackend>,
    rasterizer: Box<dyn PageRasterizer>,
    enhancer: ImageEnhancer,
    analyzer: DocumentAnalyzer,
    strategies: Vec<ImageStrategy>,
    language: String,
    min_text_chars: usize,
}

impl DocumentReader {
    /// Create a reader with default enhancement and analysis settings.
    pub fn new(backend: Box<dyn OcrBackend>, rasterizer: Box<dyn PageRasterizer>) -> Self {
        let defaults = SiftConfig::default();
        Self {
            backend,
            rasterizer,
            enhancer: ImageEnhancer::new(),
            analyzer: DocumentAnalyzer::new(),
            strategies: ImageStrategy::DEFAULT_ORDER.to_vec(),
            language: defaults.ocr.language,
            min_text_chars: defaults.ocr.min_text_chars,
        }
    }

    /// Build the configured backend and a pdftoppm rasterizer.
    pub fn from_config(config: &SiftConfig) -> Result<Self> {
        config.validate()?;
        let backend = create_backend(config)?;
        let rasterizer = Box::new(PdftoppmRasterizer::from_config(&config.pdf));

        Ok(Self {
            backend,
            rasterizer,
            enhancer: ImageEnhancer::with_config(config.preprocess.clone()),
            analyzer: DocumentAnalyzer::from_config(&config.extraction),
            strategies: ImageStrategy::DEFAULT_ORDER.to_vec(),
            language: config.ocr.language.clone(),
            min_text_chars: config.ocr.min_text_chars,
        })
    }

    pub fn with_enhancer(mut self, enhancer: ImageEnhancer) -> Self {
        self.enhancer = enhancer;
        self
    }

    pub fn with_analyzer(mut self, analyzer: DocumentAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn with_strategies(mut self, strategies: Vec<ImageStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_min_text_chars(mut self, min_text_chars: usize) -> Self {
        self.min_text_chars = min_text_chars;
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn analyzer(&self) -> &DocumentAnalyzer {
        &self.analyzer
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// OCR a single image, trying each strategy until one yields enough text.
    ///
    /// The last strategy's result is returned whatever its length.
    pub fn ocr_image(&self, path: &Path, lang: &str) -> Result<String> {
        let Some((&last, fallbacks)) = self.strategies.split_last() else {
            return Err(OcrError::Exhausted("no strategies configured".to_string()).into());
        };

        for &strategy in fallbacks {
            let start = Instant::now();
            match self.run_strategy(strategy, path, lang) {
                Ok(text) => {
                    let chars = normalize(&text).chars().count();
                    if chars > self.min_text_chars {
                        info!(
                            "OCR of {} via {} strategy: {} chars in {:?}",
                            path.display(),
                            strategy.as_str(),
                            text.len(),
                            start.elapsed()
                        );
                        return Ok(text);
                    }
                    warn!(
                        "{} strategy produced {} chars for {}, falling back",
                        strategy.as_str(),
                        chars,
                        path.display()
                    );
                }
                Err(e) => {
                    warn!(
                        "{} strategy failed for {}: {}, falling back",
                        strategy.as_str(),
                        path.display(),
                        e
                    );
                }
            }
        }

        let start = Instant::now();
        let text = self
            .run_strategy(last, path, lang)
            .map_err(|e| OcrError::Exhausted(e.to_string()))?;
        info!(
            "OCR of {} via {} strategy: {} chars in {:?}",
            path.display(),
            last.as_str(),
            text.len(),
            start.elapsed()
        );
        Ok(text)
    }

    /// OCR every page of a PDF, each page's text followed by a line break.
    pub fn ocr_pdf(&self, path: &Path, lang: &str) -> Result<String> {
        let start = Instant::now();
        let pages = self.rasterizer.rasterize(path)?;

        let mut text = String::new();
        for (index, page) in pages.iter().enumerate() {
            let page_text = self.backend.recognize(page, lang)?;
            debug!("Page {}: {} chars", index + 1, page_text.len());
            text.push_str(&page_text);
            text.push('\n');
        }

        info!(
            "OCR of {} ({} pages): {} chars in {:?}",
            path.display(),
            pages.len(),
            text.len(),
            start.elapsed()
        );
        Ok(text)
    }

    /// OCR a file in the configured language, dispatching on its extension.
    pub fn read(&self, path: &Path) -> Result<String> {
        self.read_with_lang(path, &self.language)
    }

    pub fn read_with_lang(&self, path: &Path, lang: &str) -> Result<String> {
        let extension = lowercase_extension(path);

        if extension == "pdf" {
            self.ocr_pdf(path, lang)
        } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            self.ocr_image(path, lang)
        } else {
            Err(SiftError::UnsupportedFormat(path.display().to_string()))
        }
    }

    /// Whether `read` accepts this file type.
    pub fn supports(path: &Path) -> bool {
        let extension = lowercase_extension(path);
        extension == "pdf" || IMAGE_EXTENSIONS.contains(&extension.as_str())
    }

    /// Read, normalize and analyze a file.
    pub fn analyze_file(&self, path: &Path) -> Result<AnalysisResult> {
        let raw = self.read(path)?;
        Ok(self.analyzer.analyze_raw(&raw))
    }

    fn run_strategy(
        &self,
        strategy: ImageStrategy,
        path: &Path,
        lang: &str,
    ) -> std::result::Result<String, OcrError> {
        let image = load_image(path)?;
        match strategy {
            ImageStrategy::Enhanced => {
                let enhanced = self.enhancer.enhance(&image)?;
                self.backend.recognize(&enhanced, lang)
            }
            ImageStrategy::Original => self.backend.recognize(&image, lang),
        }
    }
}

fn lowercase_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

fn load_image(path: &Path) -> std::result::Result<DynamicImage, OcrError> {
    image::open(path).map_err(|e| OcrError::InvalidImage(format!("{}: {}", path.display(), e)))
}
