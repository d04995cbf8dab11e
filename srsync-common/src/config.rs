//! Configuration file loading and secret resolution
//!
//! Configuration file path priority:
//! 1. Command-line argument (highest priority)
//! 2. `SRSYNC_CONFIG` environment variable
//! 3. `<platform config dir>/srsync/config.toml`
//!
//! A missing configuration file is not an error: a warning is logged and the
//! compiled defaults are used. A file that exists but does not parse is an
//! error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "SRSYNC_CONFIG";

/// Default values used when the TOML file omits a field
pub mod defaults {
    pub const OPENAI_MODEL: &str = "gpt-3.5-turbo";
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
    pub const NOTION_BASE_URL: &str = "https://api.notion.com/v1";
    pub const ANKI_CONNECT_URL: &str = "http://127.0.0.1:8765";
    pub const DECK_NAME: &str = "Default";
    pub const TAG_MARKER: &str = "srs-item";
    /// Only documents edited within this many days are searched
    pub const SEARCH_PERIOD_DAYS: u32 = 5;
    pub const LOG_LEVEL: &str = "info";
}

/// Contents of `config.toml`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Notion integration secret (ENV `NOTION_KEY` takes priority)
    #[serde(default)]
    pub notion_api_key: Option<String>,

    /// Text-generation API key (ENV `OPENAI_API_KEY` takes priority)
    #[serde(default)]
    pub openai_api_key: Option<String>,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    #[serde(default = "default_notion_base_url")]
    pub notion_base_url: String,

    #[serde(default = "default_anki_connect_url")]
    pub anki_connect_url: String,

    /// Destination deck for committed cards
    #[serde(default = "default_deck_name")]
    pub deck_name: String,

    /// Text inside a block that requests a flashcard
    #[serde(default = "default_tag_marker")]
    pub tag_marker: String,

    #[serde(default = "default_search_period_days")]
    pub search_period_days: u32,

    /// Optional free-text filter passed to the document search
    #[serde(default)]
    pub search_query: Option<String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            notion_api_key: None,
            openai_api_key: None,
            openai_model: default_openai_model(),
            openai_base_url: default_openai_base_url(),
            notion_base_url: default_notion_base_url(),
            anki_connect_url: default_anki_connect_url(),
            deck_name: default_deck_name(),
            tag_marker: default_tag_marker(),
            search_period_days: default_search_period_days(),
            search_query: None,
            logging: LoggingConfig::default(),
        }
    }
}

fn default_openai_model() -> String {
    defaults::OPENAI_MODEL.to_string()
}

fn default_openai_base_url() -> String {
    defaults::OPENAI_BASE_URL.to_string()
}

fn default_notion_base_url() -> String {
    defaults::NOTION_BASE_URL.to_string()
}

fn default_anki_connect_url() -> String {
    defaults::ANKI_CONNECT_URL.to_string()
}

fn default_deck_name() -> String {
    defaults::DECK_NAME.to_string()
}

fn default_tag_marker() -> String {
    defaults::TAG_MARKER.to_string()
}

fn default_search_period_days() -> u32 {
    defaults::SEARCH_PERIOD_DAYS
}

fn default_log_level() -> String {
    defaults::LOG_LEVEL.to_string()
}

/// Resolve which configuration file to read
///
/// Returns `None` only when no explicit path was given and the platform
/// config directory cannot be determined.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path()
}

/// `<platform config dir>/srsync/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("srsync").join("config.toml"))
}

/// Load configuration, falling back to defaults when the file is absent
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = path else {
        warn!("Could not determine a configuration file location, using defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!(
            "Configuration file not found at {}, using defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = parse_toml_config(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Configuration loaded from {}", path.display());
    Ok(config)
}

/// Parse TOML text into a [`TomlConfig`]
pub fn parse_toml_config(content: &str) -> std::result::Result<TomlConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Validate a secret (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve a secret from the environment, then the TOML file
///
/// **Priority:** ENV → TOML
///
/// Warns when both sources hold a valid value. Fails with a `Config` error
/// explaining both ways to provide the secret when neither does.
pub fn resolve_secret(label: &str, env_var: &str, toml_value: Option<&str>) -> Result<String> {
    let env_value = std::env::var(env_var).ok().filter(|k| is_valid_key(k));
    let toml_value = toml_value.filter(|k| is_valid_key(k));

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in both environment and TOML config. Using environment (highest priority).",
            label
        );
    }

    if let Some(key) = env_value {
        info!("{} loaded from environment variable", label);
        return Ok(key.trim().to_string());
    }

    if let Some(key) = toml_value {
        info!("{} loaded from TOML config", label);
        return Ok(key.trim().to_string());
    }

    Err(Error::Config(format!(
        "{label} not configured. Please configure using one of:\n\
         1. Environment: {env_var}=your-key-here\n\
         2. TOML config: {} ({} = \"your-key\")",
        default_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "config.toml".to_string()),
        toml_field_for(env_var),
    )))
}

fn toml_field_for(env_var: &str) -> &'static str {
    match env_var {
        "NOTION_KEY" => "notion_api_key",
        "OPENAI_API_KEY" => "openai_api_key",
        _ => "<key>",
    }
}
