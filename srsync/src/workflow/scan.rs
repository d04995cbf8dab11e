//! Scan phase: discovery → extraction → classification → generation →
//! repair → staging write
//!
//! A failure while listing documents or blocks aborts the run. A failure
//! while turning one block into a card skips that block, is logged and
//! reported, and the batch carries on.

use super::classifier::classify;
use super::discovery::{discover_tagged_blocks, DiscoveryOptions};
use super::generator::generate_card;
use super::passage::extract_passage;
use super::repair::repair_card;
use super::staging::StagingStore;
use crate::error::{ErrorKind, SyncError, SyncResult};
use crate::models::{Block, Flashcard};
use crate::services::{DocumentStore, TextGenerator};
use tracing::{info, warn};

/// A block that did not produce a card
#[derive(Debug, Clone)]
pub struct SkippedBlock {
    pub block_id: String,
    pub kind: ErrorKind,
    pub reason: String,
}

/// Outcome of one scan run
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Tagged blocks found by discovery
    pub discovered: usize,
    /// Discovered blocks that already had a staged card
    pub already_staged: usize,
    /// Cards generated in this run
    pub generated: usize,
    pub skipped: Vec<SkippedBlock>,
    /// Records in the staging store after the write
    pub staged_total: usize,
}

/// Turn one tagged block into a repaired, validated card
pub async fn process_block(
    generator: &dyn TextGenerator,
    block: &Block,
    tag_marker: &str,
) -> SyncResult<Flashcard> {
    let passage = extract_passage(block, tag_marker).prompt_text();
    if passage.is_empty() {
        return Err(SyncError::EmptyPassage);
    }

    let topic = classify(generator, &passage).await?;
    let raw = generate_card(generator, &passage, topic).await?;
    let text = repair_card(&raw)?;

    Ok(Flashcard::new(text, topic, block.clone()))
}

/// Run the whole scan phase and write the staging store
pub async fn run_scan(
    store: &dyn DocumentStore,
    generator: &dyn TextGenerator,
    staging: &StagingStore,
    options: &DiscoveryOptions<'_>,
) -> SyncResult<ScanReport> {
    let blocks = discover_tagged_blocks(store, options).await?;
    let staged = staging.staged_block_ids()?;

    let mut report = ScanReport {
        discovered: blocks.len(),
        ..ScanReport::default()
    };
    let mut cards = Vec::new();

    for block in &blocks {
        if staged.contains(&block.id) {
            report.already_staged += 1;
            tracing::debug!(block_id = %block.id, "Block already staged, skipping");
            continue;
        }

        match process_block(generator, block, options.tag_marker).await {
            Ok(card) => {
                info!(block_id = %block.id, topic = %card.topic, "Card generated");
                cards.push(card);
            }
            Err(e) => {
                warn!(block_id = %block.id, error = %e, "Skipping passage");
                report.skipped.push(SkippedBlock {
                    block_id: block.id.clone(),
                    kind: e.kind(),
                    reason: e.to_string(),
                });
            }
        }
    }

    report.generated = cards.len();
    report.staged_total = staging.merge_and_write(cards)?;

    info!(
        discovered = report.discovered,
        generated = report.generated,
        skipped = report.skipped.len(),
        staged = report.staged_total,
        "Scan complete"
    );
    Ok(report)
}
