//! Schema-free inference over normalized OCR text.

mod fields;
mod key_value;
mod normalize;
mod sections;
pub mod rules;

pub use fields::FieldExtractor;
pub use key_value::{to_camel_case, KeyValueExtractor};
pub use normalize::normalize;
pub use sections::SectionSegmenter;

use std::time::Instant;

use tracing::debug;

use crate::models::analysis::AnalysisResult;
use crate::models::config::ExtractionConfig;

/// Trait for line-stream extractors.
///
/// Extractors are total: any text, including the empty string, produces
/// an output (possibly empty).
pub trait Extractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract from normalized text.
    fn extract(&self, text: &str) -> Self::Output;
}

/// Runs the key/value, section and field extractors over the same text.
#[derive(Debug, Clone, Default)]
pub struct DocumentAnalyzer {
    key_values: KeyValueExtractor,
    sections: SectionSegmenter,
    fields: FieldExtractor,
}

impl DocumentAnalyzer {
    /// Create an analyzer with the built-in rule tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with configured rule parameters.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            key_values: KeyValueExtractor::from_config(config),
            sections: SectionSegmenter::from_config(config),
            fields: FieldExtractor::new(),
        }
    }

    pub fn with_key_value_extractor(mut self, extractor: KeyValueExtractor) -> Self {
        self.key_values = extractor;
        self
    }

    pub fn with_section_segmenter(mut self, segmenter: SectionSegmenter) -> Self {
        self.sections = segmenter;
        self
    }

    pub fn with_field_extractor(mut self, extractor: FieldExtractor) -> Self {
        self.fields = extractor;
        self
    }

    /// Analyze already-normalized text.
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let start = Instant::now();

        let key_value_pairs = self.key_values.extract(text);
        let sections = self.sections.extract(text);
        let extracted_fields = self.fields.extract(text);

        debug!(
            "Analyzed {} chars: {} pairs, {} sections, {} fields in {:?}",
            text.len(),
            key_value_pairs.len(),
            sections.len(),
            extracted_fields.len(),
            start.elapsed()
        );

        AnalysisResult {
            clean_text: text.to_string(),
            key_value_pairs,
            sections,
            extracted_fields,
        }
    }

    /// Normalize raw OCR text, then analyze it.
    pub fn analyze_raw(&self, raw: &str) -> AnalysisResult {
        self.analyze(&normalize(raw))
    }
}

/// Analyze normalized text with the built-in rules.
pub fn analyze(text: &str) -> AnalysisResult {
    DocumentAnalyzer::new().analyze(text)
}

/// Normalize and analyze raw OCR text with the built-in rules.
pub fn analyze_raw(raw: &str) -> AnalysisResult {
    DocumentAnalyzer::new().analyze_raw(raw)
}
