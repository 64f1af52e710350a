//! `recibo-config` — service configuration management.
//!
//! Provides:
//! - Typed config schema (server, webhook, inbox, image host, OCR, ledger,
//!   validation targets)
//! - YAML loading with `${ENV_VAR}` substitution for secrets
//! - Deep required-field validation
//! - Config redaction for safe logging/display

pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config};
pub use redact::redact;
pub use schema::ReciboConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;

/// Load a config file, substitute env vars, and validate it.
///
/// This is the main entry point for loading a config at runtime. Every
/// credential is required; a failed validation is a startup error, not a
/// warning.
pub async fn load_and_prepare(path: &Path) -> Result<ReciboConfig> {
    let raw_config = load_config(path).await?;

    // Serialize to Value for the env-substitution pass.
    let value: Value = serde_json::to_value(&raw_config)
        .context("Failed to serialize config for processing")?;

    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;

    let config: ReciboConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        bail!(
            "Config at {} has {} error(s); see log output",
            path.display(),
            report.errors.len()
        );
    }

    Ok(config)
}
