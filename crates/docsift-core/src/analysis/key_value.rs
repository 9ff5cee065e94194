//! `label: value` extraction.

use tracing::trace;

use super::rules::patterns::{BULLET_ITEM, LABELED_VALUE, NON_KEY_CHARS};
use super::rules::LabelRules;
use super::Extractor;
use crate::models::analysis::KeyValueMap;
use crate::models::config::ExtractionConfig;

/// Extracts `label: value` and `label - value` lines into a camelCase map.
#[derive(Debug, Clone, Default)]
pub struct KeyValueExtractor {
    label_rules: LabelRules,
}

impl KeyValueExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            label_rules: LabelRules::from_config(config),
        }
    }

    /// Replace the label rejection rules.
    pub fn with_label_rules(mut self, rules: LabelRules) -> Self {
        self.label_rules = rules;
        self
    }

    /// Parse one line into `(key, value)`.
    pub fn parse_line(&self, line: &str) -> Option<(String, String)> {
        let line = line.trim();
        if line.split_whitespace().count() < 2 {
            return None;
        }

        if is_bullet_item(line) {
            return None;
        }

        let caps = LABELED_VALUE.captures(line)?;
        let label = caps[1].trim();
        let value = caps[2].trim();

        if let Some(rule) = self.label_rules.rejection(label) {
            trace!("Rejected label {:?} by {:?}", label, rule);
            return None;
        }

        Some((to_camel_case(label), value.to_string()))
    }
}

impl Extractor for KeyValueExtractor {
    type Output = KeyValueMap;

    fn extract(&self, text: &str) -> KeyValueMap {
        let mut pairs = KeyValueMap::new();
        for line in text.split('\n') {
            if let Some((key, value)) = self.parse_line(line) {
                pairs.insert(key, value);
            }
        }
        pairs
    }
}

/// A list bullet read as text ("• item", "o item") with no separator anywhere.
fn is_bullet_item(line: &str) -> bool {
    BULLET_ITEM.is_match(line) && !line.contains(':') && !line.contains('-')
}

/// Convert a label to a camelCase key.
///
/// Everything but ASCII letters, digits and spaces is dropped first.
/// A label with no words left is returned unchanged.
pub fn to_camel_case(label: &str) -> String {
    let cleaned = NON_KEY_CHARS.replace_all(label, "");
    let mut words = cleaned.split_whitespace();

    let Some(first) = words.next() else {
        return label.to_string();
    };

    let mut key = first.to_lowercase();
    for word in words {
        let mut chars = word.chars();
        if let Some(head) = chars.next() {
            key.extend(head.to_uppercase());
            key.push_str(&chars.as_str().to_lowercase());
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::rules::LabelRule;
    use pretty_assertions::assert_eq;

    fn extract(text: &str) -> KeyValueMap {
        KeyValueExtractor::new().extract(text)
    }

    #[test]
    fn test_colon_pair() {
        let pairs = extract("Full Name: John Smith");
        assert_eq!(pairs.get("fullName").map(String::as_str), Some("John Smith"));
    }

    #[test]
    fn test_hyphen_pair() {
        let pairs = extract("Course Title - Advanced Rust");
        assert_eq!(pairs.get("courseTitle").map(String::as_str), Some("Advanced Rust"));
    }

    #[test]
    fn test_bullet_line_skipped() {
        assert!(extract("- item one").is_empty());
        assert!(extract("• item one").is_empty());
        assert!(extract("o item one").is_empty());
    }

    #[test]
    fn test_separator_exempts_bullet_guard() {
        assert!(is_bullet_item("• item one"));
        assert!(!is_bullet_item("• Name: Jane Doe"));
        assert!(!is_bullet_item("o item-one list"));
    }

    #[test]
    fn test_exempt_bullets_reach_label_parsing() {
        // '•' is outside the label alphabet, so the pair regex rejects the line.
        assert!(extract("• Name: Jane Doe").is_empty());

        // '-' and 'o' markers are label characters and stay in the key.
        let pairs = extract("- Name: Jane Doe");
        assert_eq!(pairs.get("name").map(String::as_str), Some("Jane Doe"));

        let pairs = extract("o Name: Jane Doe");
        assert_eq!(pairs.get("oName").map(String::as_str), Some("Jane Doe"));

        // A hyphen anywhere lifts the guard and becomes the separator.
        let pairs = extract("o item-one list");
        assert_eq!(pairs.get("oItem").map(String::as_str), Some("one list"));
    }

    #[test]
    fn test_last_line_wins() {
        let pairs = extract("Score: 10\nName: Jane Doe\nScore: 20");
        assert_eq!(pairs.get("score").map(String::as_str), Some("20"));
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_single_token_lines_skipped() {
        assert!(extract("Name:John").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_rejected_labels() {
        // "e" prefix, misread bullet, bare numbering, no letters
        let text = "Email: jane@example.com\noName: Jane Doe\nA12: something\n123 45: value";
        assert!(extract(text).is_empty());
    }

    #[test]
    fn test_label_length_limit() {
        let label = "Word ".repeat(9);
        let text = format!("{}: value here", label.trim());
        assert!(extract(&text).is_empty());
    }

    #[test]
    fn test_value_kept_verbatim() {
        let pairs = extract("Marks (%): 87.5 % (Distinction)");
        assert_eq!(pairs.get("marks").map(String::as_str), Some("87.5 % (Distinction)"));
    }

    #[test]
    fn test_custom_rules() {
        let extractor = KeyValueExtractor::new()
            .with_label_rules(LabelRules::new(vec![LabelRule::MaxChars(40)]));
        let pairs = extractor.extract("Email Address: jane@example.com");
        assert_eq!(
            pairs.get("emailAddress").map(String::as_str),
            Some("jane@example.com")
        );
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("Full Name"), "fullName");
        assert_eq!(to_camel_case("DATE OF ISSUE"), "dateOfIssue");
        assert_eq!(to_camel_case("Roll No."), "rollNo");
        assert_eq!(to_camel_case("Marks (%)"), "marks");
        assert_eq!(to_camel_case("  gst-in number "), "gstinNumber");
        assert_eq!(to_camel_case("(%)"), "(%)");
    }
}
