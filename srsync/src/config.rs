//! Resolved runtime configuration
//!
//! Built once in `main` from the TOML file, the environment and CLI
//! overrides, then passed by reference to every component. Nothing reads
//! configuration from globals after startup.

use chrono::{DateTime, Duration, Utc};
use srsync_common::config::{resolve_secret, TomlConfig};
use srsync_common::{Error, Result};

pub const NOTION_KEY_ENV: &str = "NOTION_KEY";
pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";

/// Which phase the configuration is resolved for
///
/// Only `scan` talks to the text generator, so only `scan` requires its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Scan,
    Commit,
}

/// Everything the scan and commit phases need
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub notion_api_key: String,
    pub notion_base_url: String,
    /// Resolved for [`Phase::Scan`] only
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub anki_connect_url: String,
    pub deck_name: String,
    pub tag_marker: String,
    pub search_period_days: u32,
    pub search_query: Option<String>,
}

/// Command-line values that take priority over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub search_period_days: Option<u32>,
    pub tag_marker: Option<String>,
    pub deck_name: Option<String>,
}

impl SyncConfig {
    /// Resolve secrets (ENV → TOML) and apply CLI overrides
    pub fn resolve(toml: &TomlConfig, overrides: &Overrides, phase: Phase) -> Result<Self> {
        let notion_api_key =
            resolve_secret("Notion API key", NOTION_KEY_ENV, toml.notion_api_key.as_deref())?;
        let openai_api_key = match phase {
            Phase::Scan => Some(resolve_secret(
                "OpenAI API key",
                OPENAI_KEY_ENV,
                toml.openai_api_key.as_deref(),
            )?),
            Phase::Commit => None,
        };

        let tag_marker = overrides
            .tag_marker
            .clone()
            .unwrap_or_else(|| toml.tag_marker.clone());
        if tag_marker.trim().is_empty() {
            return Err(Error::Config("tag_marker must not be empty".to_string()));
        }

        Ok(Self {
            notion_api_key,
            notion_base_url: toml.notion_base_url.clone(),
            openai_api_key,
            openai_base_url: toml.openai_base_url.clone(),
            openai_model: toml.openai_model.clone(),
            anki_connect_url: toml.anki_connect_url.clone(),
            deck_name: overrides
                .deck_name
                .clone()
                .unwrap_or_else(|| toml.deck_name.clone()),
            tag_marker,
            search_period_days: overrides
                .search_period_days
                .unwrap_or(toml.search_period_days),
            search_query: toml.search_query.clone().filter(|q| !q.trim().is_empty()),
        })
    }

    /// Text-generation key, required by the scan phase
    pub fn openai_api_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| Error::Config("OpenAI API key was not resolved".to_string()))
    }

    /// Oldest last-edited time still searched, relative to `now`
    ///
    /// Fails when the search period reaches past the representable date range.
    pub fn search_threshold(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        now.checked_sub_signed(Duration::days(i64::from(self.search_period_days)))
            .ok_or_else(|| {
                Error::Config(format!(
                    "search_period_days {} reaches past the supported date range",
                    self.search_period_days
                ))
            })
    }
}
