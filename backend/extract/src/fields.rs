//! Field extraction from raw OCR text.
//!
//! Each extractor is a pure function over one opaque string. OCR output is
//! noisy, so every pattern is deliberately narrow and the first match wins.

use once_cell::sync::Lazy;
use regex::Regex;

/// First run of 7-or-more consecutive decimal digits, on word boundaries.
static OPERATION_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{7,}\b").unwrap());

/// `S/` prefix, optional whitespace, grouped thousands, exactly two decimals.
static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"S/\s*(\d{1,3}(?:,\d{3})*\.\d{2})").unwrap());

/// Day, three-letter month (optional trailing dot), four-digit year.
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}\s+[A-Za-z]{3}\.?\s+\d{4}\b").unwrap());

/// Clock time with an a.m./p.m. marker; dot and spacing variants tolerated.
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b\d{1,2}:\d{2}\s*[ap]\.?\s*m\.?").unwrap());

/// Everything extracted from one receipt text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub operation_code: Option<String>,
    pub amount: Option<String>,
    pub date_time: Option<String>,
}

impl ExtractedFields {
    /// Whether all three fields resolved.
    pub fn is_complete(&self) -> bool {
        self.operation_code.is_some() && self.amount.is_some() && self.date_time.is_some()
    }
}

/// Run all extractors over one OCR text.
pub fn extract_fields(text: &str) -> ExtractedFields {
    ExtractedFields {
        operation_code: operation_code(text),
        amount: amount(text),
        date_time: date_time(text),
    }
}

/// First 7+-digit run in the text.
pub fn operation_code(text: &str) -> Option<String> {
    OPERATION_CODE_RE.find(text).map(|m| m.as_str().to_string())
}

/// First currency-prefixed amount, returned without the `S/` prefix.
pub fn amount(text: &str) -> Option<String> {
    AMOUNT_RE
        .captures(text)
        .map(|caps| caps[1].to_string())
}

/// Date and time fragments joined as `"<date> <time>"`; either fragment
/// alone is returned as-is.
pub fn date_time(text: &str) -> Option<String> {
    let date = DATE_RE.find(text).map(|m| m.as_str().to_string());
    let time = TIME_RE.find(text).map(|m| m.as_str().to_string());

    match (date, time) {
        (Some(d), Some(t)) => Some(format!("{d} {t}")),
        (Some(d), None) => Some(d),
        (None, Some(t)) => Some(t),
        (None, None) => None,
    }
}
