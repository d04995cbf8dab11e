//! Staging store
//!
//! Durable handoff between `scan` and `commit`: one JSON file holding a list
//! of [`Flashcard`] records, at most one per source block id. Every write
//! replaces the whole file atomically.
//!
//! **Lifecycle:**
//! - Created on the first `merge_and_write` with at least one card.
//! - Grows by merge-then-dedup on every scan; the first record seen for a
//!   block id wins.
//! - Shrunk by `retain` after a partially failed commit, deleted by `clear`
//!   after a fully successful one.

use crate::error::{SyncError, SyncResult};
use crate::models::Flashcard;
use srsync_common::fs::write_atomic;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Required extension of staging files
pub const STAGING_EXTENSION: &str = "json";

/// Accept only paths ending in `.json`
pub fn validate_staging_path(path: &Path) -> SyncResult<PathBuf> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext == STAGING_EXTENSION => Ok(path.to_path_buf()),
        _ => Err(SyncError::InvalidStagingPath {
            path: path.to_path_buf(),
            ext: STAGING_EXTENSION,
        }),
    }
}

/// Keep the first record for each block id, preserving order
///
/// Returns the kept records and how many were dropped.
pub fn dedup_by_block(records: Vec<Flashcard>) -> (Vec<Flashcard>, usize) {
    let before = records.len();
    let mut seen = HashSet::new();
    let kept: Vec<Flashcard> = records
        .into_iter()
        .filter(|card| seen.insert(card.block_id().to_string()))
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

/// File-backed staging store
#[derive(Debug, Clone)]
pub struct StagingStore {
    path: PathBuf,
}

impl StagingStore {
    /// Open a store at `path`; the file need not exist yet
    pub fn new(path: impl AsRef<Path>) -> SyncResult<Self> {
        Ok(Self {
            path: validate_staging_path(path.as_ref())?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Records currently on disk, empty if the file does not exist
    ///
    /// Duplicate block ids on disk should be impossible; if found they are
    /// logged as an error and resolved to the first occurrence.
    pub fn load(&self) -> SyncResult<Vec<Flashcard>> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path).map_err(srsync_common::Error::from)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<Flashcard> =
            serde_json::from_str(&content).map_err(srsync_common::Error::from)?;
        let (records, dropped) = dedup_by_block(records);
        if dropped > 0 {
            error!(
                path = %self.path.display(),
                error = %SyncError::DuplicateStagedRecords(dropped),
                "Staging store was inconsistent; keeping first record per block"
            );
        }
        Ok(records)
    }

    /// Block ids that already have a staged card
    pub fn staged_block_ids(&self) -> SyncResult<HashSet<String>> {
        Ok(self
            .load()?
            .iter()
            .map(|card| card.block_id().to_string())
            .collect())
    }

    /// Append `new_cards` to the stored set, dedup by block id, persist
    ///
    /// Returns the number of records stored afterwards. Writing nothing to a
    /// store that does not exist yet leaves it absent.
    pub fn merge_and_write(&self, new_cards: Vec<Flashcard>) -> SyncResult<usize> {
        let mut records = self.load()?;
        if new_cards.is_empty() && !self.exists() {
            return Ok(0);
        }

        records.extend(new_cards);
        let (records, dropped) = dedup_by_block(records);
        if dropped > 0 {
            warn!(
                dropped,
                "Discarded cards for blocks that were already staged"
            );
        }

        self.persist(&records)?;
        info!(
            path = %self.path.display(),
            records = records.len(),
            "Staging store written"
        );
        Ok(records.len())
    }

    /// Every staged record, for the commit phase
    ///
    /// Fails with `NoStagedCards` if the store is absent or empty. The file is
    /// NOT deleted here; call [`clear`](Self::clear) once every record has
    /// been committed, or [`retain`](Self::retain) after partial failure.
    pub fn read_and_clear(&self) -> SyncResult<Vec<Flashcard>> {
        let records = self.load()?;
        if records.is_empty() {
            return Err(SyncError::NoStagedCards(self.path.clone()));
        }
        Ok(records)
    }

    /// Replace the store with `remaining`, deleting it when nothing remains
    pub fn retain(&self, remaining: &[Flashcard]) -> SyncResult<()> {
        if remaining.is_empty() {
            return self.clear();
        }
        self.persist(remaining)
    }

    /// Delete the store file; absent is fine
    pub fn clear(&self) -> SyncResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Staging store removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(srsync_common::Error::from(e).into()),
        }
    }

    fn persist(&self, records: &[Flashcard]) -> SyncResult<()> {
        let json = serde_json::to_vec_pretty(records).map_err(srsync_common::Error::from)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Block, BlockType, RichText, Topic};

    fn card(block_id: &str, text: &str) -> Flashcard {
        Flashcard::new(
            text,
            Topic::WorldHistory,
            Block::new(block_id, BlockType::Paragraph, vec![RichText::plain("p")]),
        )
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_in_order() {
        let (kept, dropped) = dedup_by_block(vec![
            card("a", "first a"),
            card("b", "b"),
            card("a", "second a"),
            card("c", "c"),
        ]);

        assert_eq!(dropped, 1);
        let texts: Vec<_> = kept.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["first a", "b", "c"]);
    }

    #[test]
    fn test_validate_staging_path() {
        assert!(validate_staging_path(Path::new("cards.json")).is_ok());
        assert!(validate_staging_path(Path::new("/tmp/out/cards.json")).is_ok());
        for bad in ["cards.txt", "cards", "cards.json.bak", "cards.JSON"] {
            assert!(
                matches!(
                    validate_staging_path(Path::new(bad)),
                    Err(SyncError::InvalidStagingPath { .. })
                ),
                "accepted {}",
                bad
            );
        }
    }
}
