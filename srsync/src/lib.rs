//! srsync library interface
//!
//! Turns tagged passages in a Notion workspace into Anki cloze cards, once
//! per passage, across repeated and interrupted runs.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod workflow;

pub use crate::error::{ErrorKind, SyncError, SyncResult};
