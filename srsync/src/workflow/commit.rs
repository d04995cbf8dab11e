//! Commit phase: staged read → flashcard-store commit → marking → staging
//! cleanup
//!
//! A record leaves the staging store only once its card is in the deck AND
//! its block is marked processed. Failed records stay staged for the next
//! run. A card the deck already holds counts as committed, so a rerun after a
//! marking failure goes straight on to marking.

use super::marker::mark_block;
use super::staging::StagingStore;
use crate::error::SyncResult;
use crate::models::Flashcard;
use crate::services::{AddOutcome, DocumentStore, FlashcardStore};
use tracing::{error, info};

/// A record that stays staged
#[derive(Debug, Clone)]
pub struct FailedCommit {
    pub block_id: String,
    pub reason: String,
}

/// Outcome of one commit run
#[derive(Debug, Clone, Default)]
pub struct CommitReport {
    /// Records added (or found already present) and marked
    pub committed: usize,
    /// Of `committed`, cards the deck already held
    pub duplicates: usize,
    pub failed: Vec<FailedCommit>,
}

impl CommitReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Commit one record: add the card, then mark its block
async fn commit_one(
    store: &dyn DocumentStore,
    deck: &dyn FlashcardStore,
    card: &Flashcard,
) -> SyncResult<AddOutcome> {
    let outcome = deck.add_card(card).await?;
    mark_block(store, &card.block).await?;
    Ok(outcome)
}

/// Run the whole commit phase
///
/// Fails with `NoStagedCards` when there is nothing to commit. On return the
/// staging store holds exactly the failed records, or is gone.
pub async fn run_commit(
    store: &dyn DocumentStore,
    deck: &dyn FlashcardStore,
    staging: &StagingStore,
) -> SyncResult<CommitReport> {
    let records = staging.read_and_clear()?;
    info!(records = records.len(), deck = %deck.deck_name(), "Committing staged cards");

    deck.ensure_deck().await?;

    let mut report = CommitReport::default();
    let mut remaining = Vec::new();

    for card in records {
        match commit_one(store, deck, &card).await {
            Ok(outcome) => {
                report.committed += 1;
                if outcome == AddOutcome::Duplicate {
                    report.duplicates += 1;
                }
                info!(block_id = %card.block_id(), ?outcome, "Card committed");
            }
            Err(e) => {
                error!(block_id = %card.block_id(), error = %e, "Commit failed, card stays staged");
                report.failed.push(FailedCommit {
                    block_id: card.block_id().to_string(),
                    reason: e.to_string(),
                });
                remaining.push(card);
            }
        }
    }

    staging.retain(&remaining)?;

    info!(
        committed = report.committed,
        failed = report.failed.len(),
        "Commit complete"
    );
    Ok(report)
}
