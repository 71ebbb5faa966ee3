//! Writing configuration files.
//!
//! # Configuration File Format
//!
//! ```toml
//! [http]
//! base_url = "https://www.theguardian.com/crosswords"
//! timeout_secs = 30
//! connect_timeout_secs = 10
//!
//! [search]
//! max_attempts = 8
//! direction = "descending"
//!
//! [puzzles]
//! default_type = "quick"
//!
//! [[puzzles.types]]
//! name = "cryptic"
//! cadence = { daily_except = "Sun" }
//! anchor = { date = "2026-02-17", number = 29900 }
//!
//! [logging]
//! level = "info"
//! format = "text"
//! ```

use std::path::Path;

use super::Config;

/// Render a configuration as TOML
pub fn render_config(config: &Config) -> Result<String, ConfigFileError> {
    toml::to_string_pretty(config).map_err(|e| ConfigFileError::Serialize(e.to_string()))
}

/// Write a configuration to a TOML file, creating parent directories
pub fn save_config(config: &Config, path: &Path) -> Result<(), ConfigFileError> {
    let content = render_config(config)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }
    }

    std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
