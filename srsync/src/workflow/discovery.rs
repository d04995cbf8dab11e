//! Tagged-block discovery
//!
//! **Algorithm:**
//! 1. List documents newest-edited first, page by page.
//! 2. Stop the whole listing at the first document edited before the
//!    threshold. The listing is sorted descending, so everything after it is
//!    older too; no further pages are requested.
//! 3. Walk each remaining document's block tree depth-first with an explicit
//!    worklist. Each level's children are fully paged in before any of them
//!    is processed.
//! 4. Skip non-processable block types entirely (not scanned, not descended).
//!    Record a processable block once if any segment holds an unprocessed tag,
//!    and descend into its children whether or not it matched.
//!
//! Results keep document order, depth-first.

use super::passage::has_unprocessed_tag;
use crate::error::SyncResult;
use crate::models::{Block, Document};
use crate::services::{DocumentQuery, DocumentStore, SortDirection};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Discovery parameters
#[derive(Debug, Clone)]
pub struct DiscoveryOptions<'a> {
    /// Documents edited before this are not searched
    pub threshold: DateTime<Utc>,
    pub tag_marker: &'a str,
    /// Free-text document filter
    pub search_query: Option<&'a str>,
}

/// Every block with an unprocessed tag in documents edited since the threshold
pub async fn discover_tagged_blocks(
    store: &dyn DocumentStore,
    options: &DiscoveryOptions<'_>,
) -> SyncResult<Vec<Block>> {
    let documents = recent_documents(store, options).await?;
    info!(
        documents = documents.len(),
        threshold = %options.threshold,
        "Searching recently edited documents"
    );

    let mut matches = Vec::new();
    for document in &documents {
        let found = tagged_blocks_in(store, &document.id, options.tag_marker).await?;
        if !found.is_empty() {
            info!(
                document = %document.title,
                blocks = found.len(),
                "Found tagged blocks"
            );
        }
        matches.extend(found);
    }

    Ok(matches)
}

/// Documents edited at or after the threshold, newest first
///
/// Short-circuits at the first older document.
pub async fn recent_documents(
    store: &dyn DocumentStore,
    options: &DiscoveryOptions<'_>,
) -> SyncResult<Vec<Document>> {
    let mut documents = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = store
            .list_documents(DocumentQuery {
                direction: SortDirection::Descending,
                text: options.search_query,
                cursor: cursor.as_deref(),
            })
            .await?;

        for document in page.results {
            if !document.edited_since(options.threshold) {
                debug!(
                    document_id = %document.id,
                    last_edited = %document.last_edited_time,
                    "Reached documents older than threshold"
                );
                return Ok(documents);
            }
            documents.push(document);
        }

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => return Ok(documents),
        }
    }
}

/// All tagged blocks beneath `root_id`, depth-first
pub async fn tagged_blocks_in(
    store: &dyn DocumentStore,
    root_id: &str,
    tag_marker: &str,
) -> SyncResult<Vec<Block>> {
    let mut matches = Vec::new();
    let mut worklist = vec![all_children(store, root_id).await?.into_iter()];

    while let Some(level) = worklist.last_mut() {
        let Some(block) = level.next() else {
            worklist.pop();
            continue;
        };

        if block.kind().is_none() {
            continue;
        }

        let child_parent = block.has_children.then(|| block.id.clone());

        if has_unprocessed_tag(&block, tag_marker) {
            debug!(block_id = %block.id, "Tagged block found");
            matches.push(block);
        }

        if let Some(parent_id) = child_parent {
            let children = all_children(store, &parent_id).await?;
            worklist.push(children.into_iter());
        }
    }

    Ok(matches)
}

/// Drain every page of `parent_id`'s children
pub async fn all_children(store: &dyn DocumentStore, parent_id: &str) -> SyncResult<Vec<Block>> {
    let mut children = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = store.list_children(parent_id, cursor.as_deref()).await?;
        children.extend(page.results);
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => return Ok(children),
        }
    }
}
