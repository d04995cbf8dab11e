//! External service clients
//!
//! Each service sits behind a trait so the workflow can run against
//! in-memory fakes in tests:
//! - [`DocumentStore`]: document listing, block listing, block update (Notion)
//! - [`TextGenerator`]: system + user prompt to generated text (OpenAI-compatible)
//! - [`FlashcardStore`]: card commit into a configured deck (AnkiConnect)
//!
//! Clients hold no mutable session state; credentials and endpoints are
//! passed in at construction.

pub mod anki_client;
pub mod notion_client;
pub mod openai_client;

pub use anki_client::{AddOutcome, AnkiConnectClient, AnkiError};
pub use notion_client::{NotionClient, NotionError};
pub use openai_client::{OpenAiClient, OpenAiError};

use crate::models::{Block, BlockContent, BlockType, Document, Flashcard, Page};
use async_trait::async_trait;

/// Sort direction for the document listing (by last-edited time)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

/// Parameters of one document listing request
#[derive(Debug, Clone, Copy)]
pub struct DocumentQuery<'a> {
    pub direction: SortDirection,
    /// Free-text search filter
    pub text: Option<&'a str>,
    pub cursor: Option<&'a str>,
}

/// Paginated document tree
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// One page of documents sorted by last-edited time
    async fn list_documents(&self, query: DocumentQuery<'_>) -> Result<Page<Document>, NotionError>;

    /// One page of the immediate children of `parent_id`
    async fn list_children(
        &self,
        parent_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<Block>, NotionError>;

    /// Overwrite a block's content; the payload is keyed by `kind`'s field name
    async fn update_block(
        &self,
        block_id: &str,
        kind: BlockType,
        content: &BlockContent,
    ) -> Result<(), NotionError>;
}

/// Synchronous request/response text generation
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, OpenAiError>;
}

/// Destination collection for committed cards
#[async_trait]
pub trait FlashcardStore: Send + Sync {
    /// Name of the configured destination deck
    fn deck_name(&self) -> &str;

    /// Create the destination deck if it does not exist
    async fn ensure_deck(&self) -> Result<(), AnkiError>;

    /// Add one card; duplicates within the deck are reported, not failed
    async fn add_card(&self, card: &Flashcard) -> Result<AddOutcome, AnkiError>;
}
