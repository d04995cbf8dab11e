//! Generated flashcards

use super::{Block, Topic};
use serde::{Deserialize, Serialize};

/// A repaired cloze card with its topic and full source block
///
/// The block payload is kept whole so the commit phase can mark it processed
/// without re-fetching it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub text: String,
    pub topic: Topic,
    pub block: Block,
}

impl Flashcard {
    pub fn new(text: impl Into<String>, topic: Topic, block: Block) -> Self {
        Self {
            text: text.into(),
            topic,
            block,
        }
    }

    /// Identity used for deduplication
    pub fn block_id(&self) -> &str {
        &self.block.id
    }
}
