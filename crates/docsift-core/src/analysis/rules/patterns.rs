//! Common regex patterns for OCR text inference.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Normalization
    pub static ref NEWLINE_RUN: Regex = Regex::new(r"\n+").unwrap();

    pub static ref SPACE_RUN: Regex = Regex::new(r"[ ]{2,}").unwrap();

    pub static ref SPACES_BEFORE_NEWLINE: Regex = Regex::new(r" +\n").unwrap();

    pub static ref SPACES_AFTER_NEWLINE: Regex = Regex::new(r"\n +").unwrap();

    // Key/value lines
    pub static ref BULLET_ITEM: Regex = Regex::new(
        r"^[-•*oOe0]{1,4}\s?[a-zA-Z]"
    ).unwrap();

    pub static ref LABELED_VALUE: Regex = Regex::new(
        r"^([A-Za-z0-9\s().\-%]{3,60})\s*[:\-]\s*(.{2,200})$"
    ).unwrap();

    pub static ref ANY_LETTER: Regex = Regex::new(r"[a-zA-Z]").unwrap();

    // OCR reads a leading bullet as "o"/"e" glued to the label
    pub static ref MISREAD_BULLET_LABEL: Regex = Regex::new(r"^[oe][A-Z]").unwrap();

    // Stray numbering such as "12" or "A3"
    pub static ref NUMBERING_LABEL: Regex = Regex::new(r"^[a-zA-Z]?\d{1,4}$").unwrap();

    pub static ref NON_KEY_CHARS: Regex = Regex::new(r"[^a-zA-Z0-9 ]").unwrap();

    // Generic fields
    pub static ref DOCUMENT_ID: Regex = Regex::new(r"[A-Z]{1,4}-?[A-Z0-9]{4,}").unwrap();

    pub static ref DATE: Regex = Regex::new(r"\d{1,2}[/-]\d{1,2}[/-]\d{4}").unwrap();

    pub static ref SLASH_DATE: Regex = Regex::new(r"\d{1,2}/\d{1,2}/\d{4}").unwrap();

    pub static ref AMOUNT: Regex = Regex::new(r"₹?\s?\d{1,3}(?:,\d{3})*(?:\.\d{2})?").unwrap();

    pub static ref RATIO: Regex = Regex::new(r"\d{2,3}/\d{2,3}").unwrap();
}
