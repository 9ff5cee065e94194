//! Cleanup of raw OCR text.

use super::rules::patterns::{NEWLINE_RUN, SPACES_AFTER_NEWLINE, SPACES_BEFORE_NEWLINE, SPACE_RUN};

/// Normalize raw OCR output.
///
/// Rules, in order: join words hyphenated across a line break, collapse
/// blank lines, collapse space runs, strip spaces around line breaks, trim.
/// The pass repeats until the text is stable, so the result is a fixed
/// point (`normalize(normalize(x)) == normalize(x)`).
pub fn normalize(raw: &str) -> String {
    let mut current = normalize_pass(raw);
    loop {
        let next = normalize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// A single application of the six rules.
fn normalize_pass(text: &str) -> String {
    let text = text.replace("-\n", "");
    let text = NEWLINE_RUN.replace_all(&text, "\n");
    let text = SPACE_RUN.replace_all(&text, " ");
    let text = SPACES_BEFORE_NEWLINE.replace_all(&text, "\n");
    let text = SPACES_AFTER_NEWLINE.replace_all(&text, "\n");
    text.trim().to_string()
}
