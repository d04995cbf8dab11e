//! Error types for srsync
//!
//! Errors are grouped into four kinds that decide how far a failure reaches:
//! - **Transport**: a service call failed. Aborts the current passage, or the
//!   whole run when raised while listing documents or blocks.
//! - **Validation**: generated output is unusable. Aborts only the current
//!   passage; the batch continues.
//! - **State**: nothing to do or a bad argument. User-facing message, clean exit.
//! - **Consistency**: a broken invariant that was repaired on the spot.

use crate::services::{AnkiError, NotionError, OpenAiError};
use std::path::PathBuf;
use thiserror::Error;

/// How far an error reaches, see module docs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Validation,
    State,
    Consistency,
}

/// Workflow error type
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Document store error: {0}")]
    DocumentStore(#[from] NotionError),

    #[error("Text generation error: {0}")]
    TextGeneration(#[from] OpenAiError),

    #[error("Flashcard store error: {0}")]
    FlashcardStore(#[from] AnkiError),

    /// Classifier returned a label outside the topic list
    #[error("Invalid classification: '{0}' is not a known topic")]
    InvalidClassification(String),

    /// Generator returned nothing usable
    #[error("Text generation returned empty output")]
    EmptyGeneration,

    /// Repaired output has no `{{cN::...}}` span
    #[error("Generated card has no cloze deletion: {0}")]
    MalformedCloze(String),

    /// Block had no text left once the tag marker was removed
    #[error("Passage is empty after removing the tag marker")]
    EmptyPassage,

    #[error("No staged cards at {0}")]
    NoStagedCards(PathBuf),

    #[error("Staging file must end in .{ext}: {path}")]
    InvalidStagingPath { path: PathBuf, ext: &'static str },

    #[error("Block type '{0}' cannot be updated")]
    UnsupportedBlockType(String),

    /// Duplicate block ids found in the staging store
    #[error("Staging store held {0} duplicate record(s)")]
    DuplicateStagedRecords(usize),

    #[error(transparent)]
    Common(#[from] srsync_common::Error),
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::DocumentStore(_)
            | SyncError::TextGeneration(_)
            | SyncError::FlashcardStore(_)
            | SyncError::Common(_) => ErrorKind::Transport,
            SyncError::InvalidClassification(_)
            | SyncError::EmptyGeneration
            | SyncError::MalformedCloze(_)
            | SyncError::EmptyPassage
            | SyncError::UnsupportedBlockType(_) => ErrorKind::Validation,
            SyncError::NoStagedCards(_) | SyncError::InvalidStagingPath { .. } => ErrorKind::State,
            SyncError::DuplicateStagedRecords(_) => ErrorKind::Consistency,
        }
    }
}

/// Result type for workflow operations
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(SyncError::EmptyGeneration.kind(), ErrorKind::Validation);
        assert_eq!(
            SyncError::InvalidClassification("Cooking".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            SyncError::NoStagedCards(PathBuf::from("cards.json")).kind(),
            ErrorKind::State
        );
        assert_eq!(
            SyncError::from(NotionError::RateLimitExceeded).kind(),
            ErrorKind::Transport
        );
        assert_eq!(SyncError::DuplicateStagedRecords(2).kind(), ErrorKind::Consistency);
    }
}
