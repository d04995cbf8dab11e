//! Domain models
//!
//! - [`Document`]: a page in the document store
//! - [`Block`]: a content node in a page's block tree
//! - [`Flashcard`]: a generated, repaired cloze card tied to its source block
//! - [`Topic`]: the fixed classification taxonomy

pub mod block;
pub mod document;
pub mod flashcard;
pub mod topic;

pub use block::{Annotations, Block, BlockContent, BlockType, RichText};
pub use document::Document;
pub use flashcard::Flashcard;
pub use topic::Topic;

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub results: Vec<T>,
    /// Cursor for the next page, `None` on the last page
    pub next_cursor: Option<String>,
}
