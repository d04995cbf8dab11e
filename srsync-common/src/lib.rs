//! # srsync Common Library
//!
//! Shared code for the srsync workspace:
//! - Common error type
//! - TOML configuration file model and loading
//! - Tracing initialisation
//! - Atomic file replacement

pub mod config;
pub mod error;
pub mod fs;
pub mod logging;

pub use error::{Error, Result};
