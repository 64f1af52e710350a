//! `recibo-extract` — deterministic field extraction over OCR text.
//!
//! No I/O here: every function takes the text and returns what it found,
//! so the extractors stay unit-testable in isolation.

pub mod fields;
pub mod validity;

pub use fields::{amount, date_time, extract_fields, operation_code, ExtractedFields};
pub use validity::{is_valid_receipt, ValidationTargets};

/// Persisted representation of a field the extractors could not find.
/// Extractors themselves return `Option`; this sentinel only appears where
/// records are rendered for the ledger.
pub const NOT_FOUND: &str = "NOT_FOUND";
