//! Heading-based section segmentation.

use super::rules::HeadingRule;
use super::Extractor;
use crate::models::analysis::SectionMap;
use crate::models::config::ExtractionConfig;

/// Groups body lines under the closest preceding heading.
///
/// Short all-caps body fragments are classified as headings too; such a
/// heading with no body of its own is dropped.
#[derive(Debug, Clone, Default)]
pub struct SectionSegmenter {
    heading_rule: HeadingRule,
}

impl SectionSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            heading_rule: HeadingRule::from_config(config),
        }
    }

    pub fn with_heading_rule(mut self, rule: HeadingRule) -> Self {
        self.heading_rule = rule;
        self
    }
}

impl Extractor for SectionSegmenter {
    type Output = SectionMap;

    fn extract(&self, text: &str) -> SectionMap {
        let mut sections = SectionMap::new();
        let mut current: Option<&str> = None;
        let mut body: Vec<String> = Vec::new();

        for line in text.split('\n') {
            let line = line.trim();

            if self.heading_rule.is_heading(line) {
                if let Some(heading) = current {
                    if !body.is_empty() {
                        sections.insert(heading.to_string(), std::mem::take(&mut body));
                    }
                }
                current = Some(line);
                body.clear();
            } else if current.is_some() {
                body.push(line.to_string());
            }
        }

        if let Some(heading) = current {
            if !body.is_empty() {
                sections.insert(heading.to_string(), body);
            }
        }

        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn segment(text: &str) -> SectionMap {
        SectionSegmenter::new().extract(text)
    }

    fn section(heading: &str, body: &[&str]) -> (String, Vec<String>) {
        (heading.to_string(), body.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_upper_case_headings() {
        let sections = segment("INTRODUCTION\nHello world\nCONCLUSION\nBye for now");
        let expected: SectionMap = [
            section("INTRODUCTION", &["Hello world"]),
            section("CONCLUSION", &["Bye for now"]),
        ]
        .into_iter()
        .collect();
        assert_eq!(sections, expected);
    }

    #[test]
    fn test_single_title_word_is_a_heading() {
        // "Bye" is title-cased, so it opens a section and leaves CONCLUSION empty.
        let sections = segment("INTRODUCTION\nHello world\nCONCLUSION\nBye");
        let expected: SectionMap = [section("INTRODUCTION", &["Hello world"])].into_iter().collect();
        assert_eq!(sections, expected);
    }

    #[test]
    fn test_empty_heading_dropped() {
        let sections = segment("HEADING ONE\nHEADING TWO\nbody");
        let expected: SectionMap = [section("HEADING TWO", &["body"])].into_iter().collect();
        assert_eq!(sections, expected);
    }

    #[test]
    fn test_lines_before_first_heading_ignored() {
        let sections = segment("this certifies that\nDETAILS\nsome text here");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections["DETAILS"], vec!["some text here".to_string()]);
    }

    #[test]
    fn test_blank_body_lines_kept() {
        let sections = segment("NOTES\nfirst line\n\n   second line  ");
        assert_eq!(
            sections["NOTES"],
            vec!["first line".to_string(), String::new(), "second line".to_string()]
        );
    }

    #[test]
    fn test_repeated_heading_overwrites() {
        let sections = segment("ITEMS\nfirst batch\nITEMS\nsecond batch");
        assert_eq!(sections["ITEMS"], vec!["second batch".to_string()]);
    }

    #[test]
    fn test_no_headings() {
        assert!(segment("just some text\nand more text").is_empty());
        assert!(segment("").is_empty());
    }
}
