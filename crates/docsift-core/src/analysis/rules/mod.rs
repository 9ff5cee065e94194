//! Data tables driving the extractors.

pub mod field_rules;
pub mod headings;
pub mod labels;
pub mod patterns;

pub use field_rules::{labeled_id_rule, standard_field_rules, Capture, FieldRule, Trigger};
pub use headings::{is_title, is_upper, CaseStyle, HeadingRule};
pub use labels::{LabelRule, LabelRules};
