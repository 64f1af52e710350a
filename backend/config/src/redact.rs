//! Config redaction: produce safe-to-share config snapshots by masking
//! sensitive fields (credentials and the validation phone number).

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Keys whose string values are always masked.
static SENSITIVE_KEYS: &[&str] = &[
    "apiKey",
    "api_key",
    "secret",
    "token",
    "targetPhone",
    "target_phone",
];

/// Bare phone-number-shaped values get masked wherever they appear.
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9]{9,15}$").unwrap());

/// Redact a config JSON value, masking all sensitive fields.
///
/// The resulting value is safe to log or print from `check-config`.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_string(s: &str, key: &str) -> Value {
    if s.is_empty() {
        return Value::String(String::new());
    }
    if is_sensitive_key(key) || PHONE_PATTERN.is_match(s) {
        // Keep a short prefix so operators can tell secrets apart.
        let hint = if s.len() > 4 {
            format!("{}***", &s[..4])
        } else {
            "***".to_string()
        };
        return Value::String(hint);
    }
    Value::String(s.to_string())
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) => redact_string(s, key),
        Value::Array(items) => {
            Value::Array(items.iter().map(|v| redact_recursive(v, key)).collect())
        }
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_recursive(v, k)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn masks_credentials_and_phone() {
        let config = json!({
            "inbox": {"apiKey": "re_supersecret", "baseUrl": "https://api.resend.com"},
            "validation": {"targetName": "Juan Perez", "targetPhone": "987654321"}
        });
        let redacted = redact(&config);
        assert_eq!(redacted["inbox"]["apiKey"], "re_s***");
        assert_eq!(redacted["inbox"]["baseUrl"], "https://api.resend.com");
        assert_eq!(redacted["validation"]["targetName"], "Juan Perez");
        assert_eq!(redacted["validation"]["targetPhone"], "9876***");
    }

    #[test]
    fn short_secrets_are_fully_masked() {
        let config = json!({"webhook": {"secret": "abc"}});
        let redacted = redact(&config);
        assert_eq!(redacted["webhook"]["secret"], "***");
    }
}
