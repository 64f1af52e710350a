//! Config validation: required-field checks with user-friendly messages.

use crate::schema::ReciboConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &ReciboConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    require(&mut report, "webhook.secret", &config.webhook.secret);
    require(&mut report, "inbox.apiKey", &config.inbox.api_key);
    require(&mut report, "inbox.baseUrl", &config.inbox.base_url);
    require(&mut report, "imageHost.apiKey", &config.image_host.api_key);
    require(&mut report, "imageHost.endpoint", &config.image_host.endpoint);
    require(&mut report, "ocr.apiKey", &config.ocr.api_key);
    require(&mut report, "ocr.endpoint", &config.ocr.endpoint);
    require(&mut report, "ledger.sheetId", &config.ledger.sheet_id);
    require(&mut report, "ledger.token", &config.ledger.token);
    require(&mut report, "validation.targetName", &config.validation.target_name);
    require(&mut report, "validation.targetPhone", &config.validation.target_phone);

    if config.server.bind_address.parse::<std::net::SocketAddr>().is_err() {
        report.error(
            "server.bindAddress",
            format!("Not a valid socket address: {}", config.server.bind_address),
        );
    }

    if !(1..=3).contains(&config.ocr.engine) {
        report.warn(
            "ocr.engine",
            format!("Unusual OCR engine selector: {}", config.ocr.engine),
        );
    }

    if !config.validation.target_phone.is_empty()
        && !config.validation.target_phone.chars().all(|c| c.is_ascii_digit())
    {
        report.warn(
            "validation.targetPhone",
            "Phone contains non-digit characters; the match is an exact substring check",
        );
    }

    report
}

fn require(report: &mut ValidationReport, path: &str, value: &str) {
    if value.trim().is_empty() {
        report.error(path, "Required field is empty");
    }
}
