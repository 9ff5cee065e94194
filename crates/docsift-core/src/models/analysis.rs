//! Analysis result data model.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// camelCase label → value, last occurrence wins.
pub type KeyValueMap = BTreeMap<String, String>;

/// Heading → body lines in document order.
pub type SectionMap = BTreeMap<String, Vec<String>>;

/// Structured record produced for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Normalized OCR text.
    pub clean_text: String,
    /// Inferred `label: value` attributes.
    pub key_value_pairs: KeyValueMap,
    /// Heading-delimited sections.
    pub sections: SectionMap,
    /// Domain-agnostic fields.
    pub extracted_fields: ExtractedFields,
}

/// The fixed set of generic fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    DocumentId,
    RecipientName,
    Date,
    TotalAmount,
    Marks,
}

impl FieldKey {
    pub const ALL: [FieldKey; 5] = [
        FieldKey::DocumentId,
        FieldKey::RecipientName,
        FieldKey::Date,
        FieldKey::TotalAmount,
        FieldKey::Marks,
    ];

    /// Serialized key name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::DocumentId => "documentId",
            FieldKey::RecipientName => "recipientName",
            FieldKey::Date => "date",
            FieldKey::TotalAmount => "totalAmount",
            FieldKey::Marks => "marks",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generic fields found in the document. Unset fields are not serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<String>,
}

impl ExtractedFields {
    fn slot_mut(&mut self, key: FieldKey) -> &mut Option<String> {
        match key {
            FieldKey::DocumentId => &mut self.document_id,
            FieldKey::RecipientName => &mut self.recipient_name,
            FieldKey::Date => &mut self.date,
            FieldKey::TotalAmount => &mut self.total_amount,
            FieldKey::Marks => &mut self.marks,
        }
    }

    /// Get a field value.
    pub fn get(&self, key: FieldKey) -> Option<&str> {
        match key {
            FieldKey::DocumentId => self.document_id.as_deref(),
            FieldKey::RecipientName => self.recipient_name.as_deref(),
            FieldKey::Date => self.date.as_deref(),
            FieldKey::TotalAmount => self.total_amount.as_deref(),
            FieldKey::Marks => self.marks.as_deref(),
        }
    }

    /// Set a field, replacing any earlier value.
    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        *self.slot_mut(key) = Some(value.into());
    }

    /// Iterate over the fields that are set.
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        FieldKey::ALL
            .into_iter()
            .filter_map(move |key| self.get(key).map(|value| (key, value)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serializes_four_camel_case_fields() {
        let mut result = AnalysisResult {
            clean_text: "Total: 10".to_string(),
            ..Default::default()
        };
        result.extracted_fields.set(FieldKey::TotalAmount, "10");

        let json = serde_json::to_value(&result).unwrap();
        let object = json.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(|k| k.as_str()).collect();
        keys.sort();
        assert_eq!(keys, vec!["cleanText", "extractedFields", "keyValuePairs", "sections"]);
        assert_eq!(json["extractedFields"], serde_json::json!({ "totalAmount": "10" }));
    }

    #[test]
    fn test_set_overwrites() {
        let mut fields = ExtractedFields::default();
        fields.set(FieldKey::Marks, "10/20");
        fields.set(FieldKey::Marks, "85/100");

        assert_eq!(fields.get(FieldKey::Marks), Some("85/100"));
        assert_eq!(fields.len(), 1);
    }
}
