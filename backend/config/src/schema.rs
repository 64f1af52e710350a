//! recibo runtime configuration schema.
//!
//! Typed for serde YAML/JSON deserialization. Every credential and
//! validation target is required; the service refuses to start without
//! them rather than limping along with defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the recibo service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReciboConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Webhook signature verification
    pub webhook: WebhookConfig,

    /// Inbox provider (attachment listing/retrieval) credentials
    pub inbox: InboxConfig,

    /// Image host used to obtain a stable public link
    pub image_host: ImageHostConfig,

    /// OCR service credentials and knobs
    pub ocr: OcrConfig,

    /// Spreadsheet-backed ledger
    pub ledger: LedgerConfig,

    /// Expected recipient identity on valid receipts
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Address the gateway binds, e.g. `0.0.0.0:8080`
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Fallback log filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory for rolling NDJSON logs; console-only when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    /// Shared signing secret from the inbox provider (`whsec_...`)
    pub secret: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxConfig {
    pub api_key: String,
    /// REST base URL, e.g. `https://api.resend.com`
    pub base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageHostConfig {
    pub api_key: String,
    /// Upload endpoint receiving the multipart image POST
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrConfig {
    pub api_key: String,

    #[serde(default = "default_ocr_endpoint")]
    pub endpoint: String,

    /// Language hint sent with every request
    #[serde(default = "default_ocr_language")]
    pub language: String,

    /// OCR engine selector understood by the service
    #[serde(default = "default_ocr_engine")]
    pub engine: u8,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_ocr_endpoint(),
            language: default_ocr_language(),
            engine: default_ocr_engine(),
        }
    }
}

fn default_ocr_endpoint() -> String {
    "https://api.ocr.space/parse/image".to_string()
}

fn default_ocr_language() -> String {
    "spa".to_string()
}

fn default_ocr_engine() -> u8 {
    2
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerConfig {
    /// Spreadsheet identifier rows are appended to
    pub sheet_id: String,

    /// Bearer token authorizing the append call
    pub token: String,

    /// Values-append API base; the sheet id is interpolated into it
    #[serde(default = "default_ledger_endpoint")]
    pub endpoint: String,
}

fn default_ledger_endpoint() -> String {
    "https://sheets.googleapis.com/v4/spreadsheets".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationConfig {
    /// Case-insensitive pattern the OCR text must match (recipient name)
    pub target_name: String,

    /// Exact substring the OCR text must contain (recipient phone)
    pub target_phone: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_yaml() {
        let yaml = r#"
webhook:
  secret: whsec_abc
inbox:
  apiKey: re_123
  baseUrl: https://api.resend.com
imageHost:
  apiKey: host_key
  endpoint: https://img.example.com/upload
ocr:
  apiKey: K123
ledger:
  sheetId: sheet-1
  token: ya29.token
validation:
  targetName: "Juan\\s+Perez"
  targetPhone: "987654321"
"#;
        let config: ReciboConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.ocr.language, "spa");
        assert_eq!(config.ocr.engine, 2);
        assert_eq!(config.validation.target_phone, "987654321");
    }
}
