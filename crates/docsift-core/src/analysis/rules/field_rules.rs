//! Rule table for the generic field extractor.
//!
//! Each rule pairs a trigger (does this line talk about the field?) with a
//! capture (where is the value?). Every rule is tried on every line.

use regex::Regex;

use super::patterns::{AMOUNT, DATE, DOCUMENT_ID, RATIO, SLASH_DATE};
use crate::models::analysis::FieldKey;

/// When a rule looks at a line.
#[derive(Debug, Clone)]
pub enum Trigger {
    /// Every line.
    Always,
    /// The lowercased line contains a phrase, or one of the words as a whole token.
    Keywords {
        phrases: &'static [&'static str],
        words: &'static [&'static str],
    },
}

impl Trigger {
    /// Whether the trigger fires for a lowercased line.
    pub fn fires(&self, lower: &str) -> bool {
        match self {
            Trigger::Always => true,
            Trigger::Keywords { phrases, words } => {
                phrases.iter().any(|p| lower.contains(*p))
                    || (!words.is_empty()
                        && lower
                            .split(|c: char| !c.is_alphanumeric())
                            .any(|token| words.iter().any(|w| *w == token)))
            }
        }
    }
}

/// How a rule pulls the value out once triggered.
#[derive(Debug, Clone)]
pub enum Capture {
    /// First match in the same line, with the listed substrings removed.
    Search {
        pattern: Regex,
        remove: &'static [&'static str],
    },
    /// The following line, if its token count is within bounds.
    NextLine { min_tokens: usize, max_tokens: usize },
    /// First match in the line, unless the line also matches `unless`.
    SearchUnless { pattern: Regex, unless: Regex },
}

impl Capture {
    fn capture(&self, lines: &[&str], index: usize) -> Option<String> {
        let line = lines[index];
        match self {
            Capture::Search { pattern, remove } => pattern.find(line).map(|m| {
                let mut value = m.as_str().to_string();
                for needle in remove.iter() {
                    value = value.replace(*needle, "");
                }
                value.trim().to_string()
            }),
            Capture::NextLine {
                min_tokens,
                max_tokens,
            } => {
                let next = lines.get(index + 1)?.trim();
                let tokens = next.split_whitespace().count();
                (*min_tokens..=*max_tokens)
                    .contains(&tokens)
                    .then(|| next.to_string())
            }
            Capture::SearchUnless { pattern, unless } => {
                if unless.is_match(line) {
                    return None;
                }
                pattern.find(line).map(|m| m.as_str().to_string())
            }
        }
    }
}

/// One generic field rule.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub key: FieldKey,
    pub trigger: Trigger,
    pub capture: Capture,
}

impl FieldRule {
    /// Value for line `index`, or `None` when the rule does not apply.
    pub fn apply(&self, lines: &[&str], index: usize, lower: &str) -> Option<String> {
        if !self.trigger.fires(lower) {
            return None;
        }
        self.capture.capture(lines, index)
    }
}

/// The built-in rule table.
pub fn standard_field_rules() -> Vec<FieldRule> {
    vec![
        FieldRule {
            key: FieldKey::DocumentId,
            trigger: Trigger::Keywords {
                phrases: &["certificate", "invoice", "bill"],
                words: &[],
            },
            capture: Capture::Search {
                pattern: DOCUMENT_ID.clone(),
                remove: &[],
            },
        },
        FieldRule {
            key: FieldKey::RecipientName,
            trigger: Trigger::Keywords {
                phrases: &["presented to", "awarded to"],
                words: &[],
            },
            capture: Capture::NextLine {
                min_tokens: 2,
                max_tokens: 5,
            },
        },
        FieldRule {
            key: FieldKey::Date,
            trigger: Trigger::Keywords {
                phrases: &["date", "completed", "issued"],
                words: &[],
            },
            capture: Capture::Search {
                pattern: DATE.clone(),
                remove: &[],
            },
        },
        FieldRule {
            key: FieldKey::TotalAmount,
            trigger: Trigger::Keywords {
                phrases: &["total", "amount"],
                words: &[],
            },
            capture: Capture::Search {
                pattern: AMOUNT.clone(),
                remove: &["₹"],
            },
        },
        FieldRule {
            key: FieldKey::Marks,
            trigger: Trigger::Always,
            capture: Capture::SearchUnless {
                pattern: RATIO.clone(),
                unless: SLASH_DATE.clone(),
            },
        },
    ]
}

/// Opt-in documentId rule for lines labeled with the word `id`
/// ("Student ID: AB12345"). Not part of the standard table, since a later
/// customer or account id would overwrite the document number.
pub fn labeled_id_rule() -> FieldRule {
    FieldRule {
        key: FieldKey::DocumentId,
        trigger: Trigger::Keywords {
            phrases: &[],
            words: &["id"],
        },
        capture: Capture::Search {
            pattern: DOCUMENT_ID.clone(),
            remove: &[],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_trigger() {
        let trigger = Trigger::Keywords {
            phrases: &["invoice"],
            words: &["id"],
        };
        assert!(trigger.fires("tax invoice"));
        assert!(trigger.fires("student id: ab1234"));
        assert!(!trigger.fires("provided by"));
    }

    #[test]
    fn test_next_line_bounds() {
        let capture = Capture::NextLine {
            min_tokens: 2,
            max_tokens: 5,
        };
        let lines = ["Awarded to", "  Jane Doe  ", "Madonna"];
        assert_eq!(capture.capture(&lines, 0), Some("Jane Doe".to_string()));
        assert_eq!(capture.capture(&lines, 1), None);
        assert_eq!(capture.capture(&lines, 2), None);
    }

    #[test]
    fn test_labeled_id_rule_is_word_based() {
        let rule = labeled_id_rule();
        let lines = ["Student ID: AB12345"];
        assert_eq!(
            rule.apply(&lines, 0, &lines[0].to_lowercase()),
            Some("AB12345".to_string())
        );

        let lines = ["Provided by ACME CORP"];
        assert_eq!(rule.apply(&lines, 0, &lines[0].to_lowercase()), None);
    }

    #[test]
    fn test_standard_table_covers_every_field() {
        let rules = standard_field_rules();
        for key in FieldKey::ALL {
            assert!(rules.iter().any(|r| r.key == key), "missing rule for {}", key);
        }
    }
}
