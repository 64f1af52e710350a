//! Config file location and loading.

use crate::schema::ReciboConfig;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the recibo config directory.
/// Priority: `RECIBO_CONFIG_DIR` env > `~/.recibo/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("RECIBO_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(".recibo"))
        .unwrap_or_else(|| PathBuf::from(".recibo"))
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk.
///
/// Unlike tools that can run unconfigured, this service has no usable
/// defaults for its credentials: a missing file is a startup error.
pub async fn load_config(path: &Path) -> Result<ReciboConfig> {
    if !path.exists() {
        bail!("Config file not found: {}", path.display());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: ReciboConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}
