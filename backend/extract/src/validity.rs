//! Receipt validity: completeness of extracted fields plus an identity
//! check against the configured recipient name and phone.

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::fields::ExtractedFields;

/// Identity the receipt must name to count as a payment to us.
/// Injected from configuration, never hard-coded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationTargets {
    /// Case-insensitive regex pattern for the recipient name.
    pub name_pattern: String,
    /// Exact, case-sensitive phone substring.
    pub phone: String,
}

/// A receipt is valid iff all three fields resolved AND the text names the
/// configured recipient AND contains the configured phone.
///
/// Misconfigured targets (empty values, unparseable name pattern) force the
/// verdict to false with an operator-facing error log; they never panic and
/// never error out of the pipeline.
pub fn is_valid_receipt(
    text: &str,
    fields: &ExtractedFields,
    targets: &ValidationTargets,
) -> bool {
    if !fields.is_complete() {
        return false;
    }

    if targets.name_pattern.trim().is_empty() || targets.phone.trim().is_empty() {
        error!("Validation targets are not configured; marking receipt invalid");
        return false;
    }

    let name_re = match RegexBuilder::new(&targets.name_pattern)
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            error!(pattern = %targets.name_pattern, error = %e, "Invalid target name pattern; marking receipt invalid");
            return false;
        }
    };

    name_re.is_match(text) && text.contains(&targets.phone)
}
