//! Pure Rust OCR backend using `pure-onnx-ocr` and PaddleOCR models.

use std::cmp::Ordering;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info};

use super::OcrBackend;
use crate::error::OcrError;
use crate::models::config::SiftConfig;

/// Rows closer than this many pixels are read as one line.
const ROW_HEIGHT: f32 = 20.0;

/// OCR backend backed by `pure-onnx-ocr` (no external ONNX Runtime).
pub struct PureOcrEngine {
    engine: Mutex<pure_onnx_ocr::engine::OcrEngine>,
    keep_unk: bool,
}

impl PureOcrEngine {
    /// Load detection, recognition and dictionary files named in `config.models`.
    pub fn from_config(config: &SiftConfig) -> Result<Self, OcrError> {
        let det_path = config.model_path(&config.models.detection_model);
        let rec_path = config.model_path(&config.models.recognition_model);
        let dict_path = config.model_path(&config.models.dictionary);

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::BackendNotAvailable(format!(
                    "model file not found: {}",
                    path.display()
                )));
            }
        }

        let engine = Self::build(&det_path, &rec_path, &dict_path)?;
        info!("Loaded pure-onnx-ocr engine from {}", config.models.model_dir.display());

        Ok(Self {
            engine: Mutex::new(engine),
            keep_unk: config.ocr.keep_unk,
        })
    }

    fn build(
        det_path: &Path,
        rec_path: &Path,
        dict_path: &Path,
    ) -> Result<pure_onnx_ocr::engine::OcrEngine, OcrError> {
        pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(det_path)
            .rec_model_path(rec_path)
            .dictionary_path(dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))
    }
}

impl OcrBackend for PureOcrEngine {
    fn name(&self) -> &'static str {
        "onnx"
    }

    fn recognize(&self, image: &DynamicImage, lang: &str) -> Result<String, OcrError> {
        let start = Instant::now();
        debug!("pure-onnx-ocr ignores language {:?}; using loaded models", lang);

        let results = {
            let engine = self
                .engine
                .lock()
                .map_err(|_| OcrError::Recognition("engine lock poisoned".to_string()))?;
            engine
                .run_from_image(image)
                .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?
        };

        let mut regions: Vec<((f32, f32), String)> = results
            .iter()
            .map(|r| {
                let text = if self.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                (top_left(&r.bounding_box), text)
            })
            .collect();

        // Reading order: rows top to bottom, then left to right
        regions.sort_by(|((ax, ay), _), ((bx, by), _)| {
            let row_a = (ay / ROW_HEIGHT) as i32;
            let row_b = (by / ROW_HEIGHT) as i32;
            row_a
                .cmp(&row_b)
                .then_with(|| ax.partial_cmp(bx).unwrap_or(Ordering::Equal))
        });

        let text = regions
            .into_iter()
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join("\n");

        info!(
            "pure-onnx-ocr: {} chars in {:?}",
            text.len(),
            start.elapsed()
        );
        Ok(text)
    }
}

/// Minimum x and y over the region polygon.
fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    polygon
        .exterior()
        .coords()
        .fold((f32::INFINITY, f32::INFINITY), |(x, y), c| {
            (x.min(c.x as f32), y.min(c.y as f32))
        })
}
