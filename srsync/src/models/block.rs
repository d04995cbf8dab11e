//! Content blocks
//!
//! A block carries its text as an ordered list of rich-text segments. The
//! `strikethrough` annotation on a segment doubles as the "already processed"
//! flag. Fields this crate does not interpret are preserved verbatim in
//! `extra` maps so a block can be written back without losing content.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Block types whose text is scanned and whose children are traversed
///
/// Every other type is an opaque leaf: neither scanned nor descended into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Paragraph,
    BulletedListItem,
    NumberedListItem,
    Heading1,
    Heading2,
    Heading3,
    Toggle,
}

impl BlockType {
    pub const ALL: [BlockType; 7] = [
        BlockType::Paragraph,
        BlockType::BulletedListItem,
        BlockType::NumberedListItem,
        BlockType::Heading1,
        BlockType::Heading2,
        BlockType::Heading3,
        BlockType::Toggle,
    ];

    /// Wire name, also the field name holding the block's content payload
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::BulletedListItem => "bulleted_list_item",
            BlockType::NumberedListItem => "numbered_list_item",
            BlockType::Heading1 => "heading_1",
            BlockType::Heading2 => "heading_2",
            BlockType::Heading3 => "heading_3",
            BlockType::Toggle => "toggle",
        }
    }

    /// Parse a wire name; `None` for non-processable types
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Segment annotations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One rich-text segment of a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RichText {
    /// Plain segment with default annotations
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
            annotations: Annotations::default(),
            extra: Map::new(),
        }
    }

    /// Same segment with the strikethrough flag set
    pub fn struck(mut self) -> Self {
        self.annotations.strikethrough = true;
        self
    }
}

/// Type-specific content payload of a block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockContent {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A node in a document's block tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    /// Raw type name as reported by the document store
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub has_children: bool,
    /// Content payload; present for processable types
    #[serde(default)]
    pub content: Option<BlockContent>,
}

impl Block {
    /// Processable block type, `None` for opaque leaves
    pub fn kind(&self) -> Option<BlockType> {
        BlockType::parse(&self.block_type)
    }

    /// Text segments, empty when the block has no content payload
    pub fn segments(&self) -> &[RichText] {
        self.content
            .as_ref()
            .map(|c| c.rich_text.as_slice())
            .unwrap_or(&[])
    }

    /// Build a processable block from plain segments
    pub fn new(id: impl Into<String>, kind: BlockType, segments: Vec<RichText>) -> Self {
        Self {
            id: id.into(),
            block_type: kind.as_str().to_string(),
            has_children: false,
            content: Some(BlockContent {
                rich_text: segments,
                extra: Map::new(),
            }),
        }
    }

    /// Builder-style `has_children` setter
    pub fn with_children(mut self, has_children: bool) -> Self {
        self.has_children = has_children;
        self
    }
}
