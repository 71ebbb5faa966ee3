//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `CROSSWORD_FETCH_` (nested keys use a
//! double underscore, e.g. `CROSSWORD_FETCH_SEARCH__MAX_ATTEMPTS=4`).

mod file_config;

pub use file_config::{render_config, save_config, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{CatalogError, PuzzleCatalog, PuzzleType, DEFAULT_PUZZLE_TYPE};
use crate::retrieval::SearchPolicy;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CROSSWORD_FETCH";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Outbound HTTP settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Candidate search settings
    #[serde(default)]
    pub search: SearchPolicy,

    /// Puzzle types and the default type
    #[serde(default)]
    pub puzzles: PuzzlesConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Build the puzzle catalog: the built-in types plus any configured ones
    pub fn catalog(&self) -> Result<PuzzleCatalog, CatalogError> {
        let mut catalog = PuzzleCatalog::default();
        for puzzle_type in &self.puzzles.types {
            catalog.insert(puzzle_type.clone());
        }
        PuzzleCatalog::new(catalog.iter().cloned().collect(), &self.puzzles.default_type)
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Page URL prefix; pages live at `{base_url}/{type}/{number}`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept")]
    pub accept: String,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    #[serde(default = "default_referer")]
    pub referer: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            accept: default_accept(),
            accept_language: default_accept_language(),
            referer: default_referer(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.theguardian.com/crosswords".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string()
}

fn default_accept() -> String {
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"
        .to_string()
}

fn default_accept_language() -> String {
    "en-GB,en;q=0.9,en-US;q=0.8".to_string()
}

fn default_referer() -> String {
    "https://www.theguardian.com/crosswords".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

/// Puzzle type configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzlesConfig {
    /// Type used when a request names none
    #[serde(default = "default_puzzle_type")]
    pub default_type: String,

    /// Extra or overridden puzzle types
    #[serde(default)]
    pub types: Vec<PuzzleType>,
}

impl Default for PuzzlesConfig {
    fn default() -> Self {
        Self {
            default_type: default_puzzle_type(),
            types: Vec::new(),
        }
    }
}

fn default_puzzle_type() -> String {
    DEFAULT_PUZZLE_TYPE.to_string()
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let loaded: Config = settings.try_deserialize()?;
    if loaded.search.max_attempts == 0 {
        return Err(config::ConfigError::Message(
            "search.max_attempts must be at least 1".to_string(),
        ));
    }
    Ok(loaded)
}

/// Find a config file in the default locations.
///
/// Checks `./crossword-fetch.toml`, then `<config dir>/crossword-fetch/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("crossword-fetch.toml");
    if local.is_file() {
        return Some(local);
    }

    default_config_path().filter(|path| path.is_file())
}

/// Platform config location, e.g. `~/.config/crossword-fetch/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("crossword-fetch").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Anchor, Cadence, EditionNumber};
    use crate::retrieval::SearchDirection;
    use chrono::{NaiveDate, Weekday};
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.search.max_attempts, 8);
        assert_eq!(config.search.direction, SearchDirection::Descending);
        assert_eq!(config.puzzles.default_type, "quick");
        assert_eq!(config.http.timeout_secs, 30);
        assert!(config.http.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[http]
base_url = "http://localhost:9999/crosswords"
timeout_secs = 5

[search]
max_attempts = 3
direction = "ascending"

[puzzles]
default_type = "cryptic"

[[puzzles.types]]
name = "cryptic"
cadence = {{ daily_except = "Sun" }}
anchor = {{ date = "2026-02-17", number = 29900 }}

[logging]
level = "debug"
format = "json"
"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(config.http.base_url, "http://localhost:9999/crosswords");
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert_eq!(config.search.max_attempts, 3);
        assert_eq!(config.search.direction, SearchDirection::Ascending);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);

        let catalog = config.catalog().unwrap();
        let cryptic = catalog.default_type();
        assert_eq!(cryptic.name, "cryptic");
        assert_eq!(cryptic.cadence, Cadence::DailyExcept(Weekday::Sun));
        assert_eq!(
            cryptic.anchor,
            Anchor {
                date: NaiveDate::from_ymd_opt(2026, 2, 17).unwrap(),
                number: EditionNumber::new(29900).unwrap(),
            }
        );
        assert!(catalog.get("quick").is_some());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Some(Path::new("/nonexistent/crossword-fetch.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_rejects_zero_attempts() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "[search]\nmax_attempts = 0\n").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("max_attempts"));
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("CROSSWORD_FETCH_HTTP__REFERER", "http://localhost/env-referer");
        let config = load_config(None);
        std::env::remove_var("CROSSWORD_FETCH_HTTP__REFERER");

        let config = config.unwrap();
        assert_eq!(config.http.referer, "http://localhost/env-referer");
        assert_eq!(config.puzzles.default_type, "quick");
    }

    #[test]
    fn test_catalog_rejects_unknown_default() {
        let mut config = Config::default();
        config.puzzles.default_type = "prize".to_string();
        assert!(config.catalog().is_err());
    }
}
