//! Generic field extraction (document id, recipient, date, total, marks).

use tracing::trace;

use super::rules::{standard_field_rules, FieldRule};
use super::Extractor;
use crate::models::analysis::ExtractedFields;

/// Runs every field rule on every line, top to bottom.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    rules: Vec<FieldRule>,
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self {
            rules: standard_field_rules(),
        }
    }

    /// Use a custom rule table.
    pub fn with_rules(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for FieldExtractor {
    type Output = ExtractedFields;

    fn extract(&self, text: &str) -> ExtractedFields {
        let mut fields = ExtractedFields::default();
        let lines: Vec<&str> = text.split('\n').collect();

        for (index, line) in lines.iter().enumerate() {
            let lower = line.to_lowercase();
            for rule in &self.rules {
                if let Some(value) = rule.apply(&lines, index, &lower) {
                    trace!("Line {} sets {} = {:?}", index, rule.key, value);
                    fields.set(rule.key, value);
                }
            }
        }

        fields
    }
}
