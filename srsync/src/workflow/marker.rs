//! Processed-state marking
//!
//! A handled block gets the strikethrough flag on every text segment, not
//! only the tag segment, and is written back to the document store. Discovery
//! ignores struck-through tags, so this write is what prevents a block from
//! being processed again. If it fails, the next scan rediscovers the block.

use crate::error::{SyncError, SyncResult};
use crate::models::Block;
use crate::services::DocumentStore;

/// Copy of `block` with every segment struck through
pub fn mark_processed(block: &Block) -> SyncResult<Block> {
    if block.kind().is_none() {
        return Err(SyncError::UnsupportedBlockType(block.block_type.clone()));
    }

    let mut marked = block.clone();
    if let Some(content) = marked.content.as_mut() {
        for segment in &mut content.rich_text {
            segment.annotations.strikethrough = true;
        }
    }
    Ok(marked)
}

/// Strike through every segment of `block` and write it back
///
/// The update payload goes under the field named after the block's type.
pub async fn mark_block(store: &dyn DocumentStore, block: &Block) -> SyncResult<Block> {
    let marked = mark_processed(block)?;
    let kind = marked
        .kind()
        .ok_or_else(|| SyncError::UnsupportedBlockType(marked.block_type.clone()))?;
    let content = marked.content.clone().unwrap_or_default();

    store.update_block(&marked.id, kind, &content).await?;
    tracing::debug!(block_id = %marked.id, block_type = %kind, "Block marked processed");
    Ok(marked)
}
