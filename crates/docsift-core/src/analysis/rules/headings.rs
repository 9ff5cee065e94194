//! Heading detection rule.

use crate::models::config::ExtractionConfig;

/// Letter casing that marks a line as a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStyle {
    /// At least one cased letter and no lowercase letters ("TOTAL DUE").
    Upper,
    /// Every word starts uppercase and continues lowercase ("Course Details").
    Title,
}

impl CaseStyle {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            CaseStyle::Upper => is_upper(text),
            CaseStyle::Title => is_title(text),
        }
    }
}

/// Short lines in one of the accepted casings are headings.
#[derive(Debug, Clone)]
pub struct HeadingRule {
    /// Maximum number of whitespace-separated tokens.
    pub max_tokens: usize,
    /// Accepted casings.
    pub styles: Vec<CaseStyle>,
}

impl HeadingRule {
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            max_tokens: config.heading_max_tokens,
            ..Self::default()
        }
    }

    /// Whether the (trimmed) line is a heading.
    pub fn is_heading(&self, line: &str) -> bool {
        line.split_whitespace().count() <= self.max_tokens
            && self.styles.iter().any(|style| style.matches(line))
    }
}

impl Default for HeadingRule {
    fn default() -> Self {
        Self {
            max_tokens: 5,
            styles: vec![CaseStyle::Upper, CaseStyle::Title],
        }
    }
}

fn is_titlecase_char(c: char) -> bool {
    // Digraphs such as 'ǅ' are neither upper nor lower but still cased.
    !c.is_uppercase() && !c.is_lowercase() && c.to_lowercase().ne(std::iter::once(c))
}

/// At least one cased character and none of them lowercase.
pub fn is_upper(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() || is_titlecase_char(c) {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// Uppercase letters only start words, lowercase letters only continue them.
pub fn is_title(text: &str) -> bool {
    let mut cased = false;
    let mut previous_cased = false;
    for c in text.chars() {
        if c.is_uppercase() || is_titlecase_char(c) {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else {
            previous_cased = false;
        }
    }
    cased
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_upper() {
        assert!(is_upper("CERTIFICATE"));
        assert!(is_upper("ID: ABC-12345"));
        assert!(!is_upper("Certificate"));
        assert!(!is_upper("12/05/2023"));
        assert!(!is_upper(""));
    }

    #[test]
    fn test_is_title() {
        assert!(is_title("Course Details"));
        assert!(is_title("Bye"));
        assert!(is_title("Date Issued: 12/05/2023"));
        assert!(is_title("O'Neil"));
        assert!(!is_title("Hello world"));
        assert!(!is_title("McDonald"));
        assert!(!is_title("2023"));
    }

    #[test]
    fn test_heading_token_limit() {
        let rule = HeadingRule::default();
        assert!(rule.is_heading("Terms And Conditions Of Use"));
        assert!(!rule.is_heading("Terms And Conditions Of Fair Use"));
        assert!(!rule.is_heading(""));
    }

    #[test]
    fn test_upper_only_rule() {
        let rule = HeadingRule {
            max_tokens: 5,
            styles: vec![CaseStyle::Upper],
        };
        assert!(rule.is_heading("SUMMARY"));
        assert!(!rule.is_heading("Summary"));
    }
}
