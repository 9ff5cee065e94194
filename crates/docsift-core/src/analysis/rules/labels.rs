//! Rejection rules for key/value labels.
//!
//! OCR turns certificate and invoice boilerplate into lines that look like
//! `label: value` pairs. Each rule here describes one such signature; a
//! candidate label is dropped when any rule fires. The table is plain data
//! so callers can replace or extend it.

use regex::Regex;

use super::patterns::{ANY_LETTER, MISREAD_BULLET_LABEL, NUMBERING_LABEL};
use crate::models::config::ExtractionConfig;

/// A single label rejection rule.
#[derive(Debug, Clone)]
pub enum LabelRule {
    /// Label has more characters than allowed.
    MaxChars(usize),
    /// Label has no ASCII letter.
    RequiresLetter,
    /// Lowercased label starts with one of these prefixes.
    NoisePrefixes(Vec<String>),
    /// Label matches the pattern.
    Pattern(Regex),
}

impl LabelRule {
    /// Whether this rule rejects the (trimmed) label.
    pub fn rejects(&self, label: &str) -> bool {
        match self {
            LabelRule::MaxChars(max) => label.chars().count() > *max,
            LabelRule::RequiresLetter => !ANY_LETTER.is_match(label),
            LabelRule::NoisePrefixes(prefixes) => {
                let lower = label.to_lowercase();
                prefixes.iter().any(|p| lower.starts_with(p.as_str()))
            }
            LabelRule::Pattern(regex) => regex.is_match(label),
        }
    }
}

/// Ordered set of label rejection rules.
#[derive(Debug, Clone)]
pub struct LabelRules {
    rules: Vec<LabelRule>,
}

impl LabelRules {
    /// Create a rule set from explicit rules.
    pub fn new(rules: Vec<LabelRule>) -> Self {
        Self { rules }
    }

    /// Rules tuned for English certificates and invoices.
    pub fn standard() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Build the standard rule shape with configured limits and prefixes.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(vec![
            LabelRule::MaxChars(config.max_label_chars),
            LabelRule::RequiresLetter,
            LabelRule::NoisePrefixes(
                config.noise_prefixes.iter().map(|p| p.to_lowercase()).collect(),
            ),
            LabelRule::Pattern(MISREAD_BULLET_LABEL.clone()),
            LabelRule::Pattern(NUMBERING_LABEL.clone()),
        ])
    }

    /// Append a rule.
    pub fn with_rule(mut self, rule: LabelRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The first rule that rejects the label, if any.
    pub fn rejection(&self, label: &str) -> Option<&LabelRule> {
        self.rules.iter().find(|rule| rule.rejects(label))
    }

    /// Whether any rule rejects the label.
    pub fn rejects(&self, label: &str) -> bool {
        self.rejection(label).is_some()
    }

    pub fn rules(&self) -> &[LabelRule] {
        &self.rules
    }
}

impl Default for LabelRules {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_labels() {
        let rules = LabelRules::standard();
        assert!(!rules.rejects("Full Name"));
        assert!(!rules.rejects("Marks (%)"));
        assert!(!rules.rejects("Roll No."));
    }

    #[test]
    fn test_rejects_long_label() {
        let rules = LabelRules::standard();
        let label = "a".repeat(41);
        assert!(matches!(rules.rejection(&label), Some(LabelRule::MaxChars(40))));
        assert!(!rules.rejects(&"a".repeat(40)));
    }

    #[test]
    fn test_rejects_letterless_label() {
        let rules = LabelRules::standard();
        assert!(matches!(rules.rejection("12 (3)"), Some(LabelRule::RequiresLetter)));
    }

    #[test]
    fn test_rejects_noise_prefixes() {
        let rules = LabelRules::standard();
        assert!(rules.rejects("Cofull stack course"));
        assert!(rules.rejects("oal Something"));
        assert!(rules.rejects("Developeda thing"));
        // Any label starting with "e" is treated as a misread.
        assert!(rules.rejects("Email"));
    }

    #[test]
    fn test_rejects_misread_bullet() {
        let rules = LabelRules::new(vec![LabelRule::Pattern(MISREAD_BULLET_LABEL.clone())]);
        assert!(rules.rejects("oName"));
        assert!(!rules.rejects("Name"));
        assert!(!rules.rejects("order"));
    }

    #[test]
    fn test_rejects_numbering() {
        let rules = LabelRules::standard();
        assert!(rules.rejects("A12"));
        assert!(!rules.rejects("AB12"));
    }

    #[test]
    fn test_custom_prefixes() {
        let config = ExtractionConfig {
            noise_prefixes: vec!["Page".to_string()],
            ..Default::default()
        };
        let rules = LabelRules::from_config(&config);
        assert!(rules.rejects("page 1 of"));
        assert!(!rules.rejects("Email"));
    }
}
