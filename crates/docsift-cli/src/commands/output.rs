//! Rendering of analysis results.

use std::fmt::Write as _;

use docsift_core::AnalysisResult;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output (one row per field, pair and section)
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_result(result: &AnalysisResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &AnalysisResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["kind", "key", "value"])?;
    for (key, value) in result.extracted_fields.iter() {
        wtr.write_record(["field", key.as_str(), value])?;
    }
    for (key, value) in &result.key_value_pairs {
        wtr.write_record(["pair", key.as_str(), value.as_str()])?;
    }
    for (heading, body) in &result.sections {
        wtr.write_record(["section", heading.as_str(), body.join("\n").as_str()])?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(result: &AnalysisResult) -> String {
    let mut output = String::new();

    output.push_str("Fields:\n");
    if result.extracted_fields.is_empty() {
        output.push_str("  (none)\n");
    }
    for (key, value) in result.extracted_fields.iter() {
        let _ = writeln!(output, "  {}: {}", key, value);
    }

    output.push_str("\nKey/value pairs:\n");
    if result.key_value_pairs.is_empty() {
        output.push_str("  (none)\n");
    }
    for (key, value) in &result.key_value_pairs {
        let _ = writeln!(output, "  {}: {}", key, value);
    }

    output.push_str("\nSections:\n");
    if result.sections.is_empty() {
        output.push_str("  (none)\n");
    }
    for (heading, body) in &result.sections {
        let _ = writeln!(output, "  {}", heading);
        for line in body {
            let _ = writeln!(output, "    {}", line);
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnalysisResult {
        docsift_core::analyze("CERTIFICATE\nPresented to\nJane Doe\nScore: 85/100")
    }

    #[test]
    fn test_json_uses_camel_case() {
        let json = format_result(&sample(), OutputFormat::Json).unwrap();
        assert!(json.contains("\"cleanText\""));
        assert!(json.contains("\"keyValuePairs\""));
        assert!(json.contains("\"recipientName\": \"Jane Doe\""));
    }

    #[test]
    fn test_csv_rows() {
        let csv = format_result(&sample(), OutputFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("kind,key,value"));
        assert!(csv.contains("field,recipientName,Jane Doe"));
        assert!(csv.contains("pair,score,85/100"));
    }

    #[test]
    fn test_text_summary() {
        let text = format_result(&AnalysisResult::default(), OutputFormat::Text).unwrap();
        assert!(text.starts_with("Fields:\n  (none)\n"));
        assert!(text.contains("Sections:\n  (none)\n"));
    }
}
