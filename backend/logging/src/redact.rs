//! Log Redaction Layer
//!
//! Scrubs API keys, bearer tokens, and phone numbers from strings prior to
//! logging. Receipt texts carry the payer's phone number, so anything that
//! quotes OCR output goes through here first.

use regex::Regex;
use std::sync::LazyLock;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d{9,15}").unwrap());
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(whsec_[A-Za-z0-9+/=]{8,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)|(\b[Kk]\d{8,}\b)")
        .unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = TOKEN_RE.replace_all(input, "[REDACTED_TOKEN]");
    PHONE_RE.replace_all(&redacted, "[REDACTED_PHONE]").to_string()
}
