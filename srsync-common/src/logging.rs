//! Tracing subscriber initialisation
//!
//! `RUST_LOG` takes priority. Without it, the `[logging] level` from the TOML
//! file applies to the srsync crates and `warn` to everything else.

use crate::config::LoggingConfig;
use crate::{Error, Result};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Crates whose level follows the configured level
const OWN_TARGETS: [&str; 2] = ["srsync", "srsync_common"];

/// Build the filter directive string for a configured level
pub fn filter_directives(level: &str) -> String {
    let mut directives = vec!["warn".to_string()];
    directives.extend(OWN_TARGETS.iter().map(|t| format!("{}={}", t, level)));
    directives.join(",")
}

/// Install the global tracing subscriber
///
/// Fails if the configured log file cannot be opened or a subscriber is
/// already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directives(&config.level)))
        .map_err(|e| Error::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match &config.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| Error::Config(format!("Tracing initialisation failed: {}", e)))
}
