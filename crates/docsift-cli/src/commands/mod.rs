//! CLI subcommands.

pub mod analyze;
pub mod batch;
pub mod config;
pub mod output;
pub mod process;

use std::path::{Path, PathBuf};

use tracing::debug;

use docsift_core::SiftConfig;

/// `<config dir>/docsift/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docsift")
        .join("config.json")
}

/// Load the explicit config file, else the default one if present, else defaults.
pub fn load_config(config_path: Option<&Path>) -> anyhow::Result<SiftConfig> {
    if let Some(path) = config_path {
        return Ok(SiftConfig::from_file(path)?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        Ok(SiftConfig::from_file(&default_path)?)
    } else {
        Ok(SiftConfig::default())
    }
}
