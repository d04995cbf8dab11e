//! Fake document store, text generator and flashcard store

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use srsync::models::{Block, BlockContent, BlockType, Document, Flashcard, Page, RichText};
use srsync::services::{
    AddOutcome, AnkiError, DocumentQuery, DocumentStore, FlashcardStore, NotionError,
    OpenAiError, TextGenerator,
};
use srsync::workflow::classifier::classification_prompt;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Document edited `days_ago` days before 2024-03-26T12:00:00Z
pub fn doc(id: &str, days_ago: i64) -> Document {
    Document {
        id: id.to_string(),
        title: format!("Document {}", id),
        last_edited_time: reference_now() - chrono::Duration::days(days_ago),
    }
}

/// Fixed "now" used by the tests
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 26, 12, 0, 0).unwrap()
}

/// Paragraph block with the given segment texts
pub fn block(id: &str, segments: &[&str]) -> Block {
    Block::new(
        id,
        BlockType::Paragraph,
        segments.iter().map(|s| RichText::plain(*s)).collect(),
    )
}

/// Paragraph block `<text>` followed by an unprocessed `srs-item` mention
pub fn tagged_block(id: &str, text: &str) -> Block {
    block(id, &[text, "srs-item"])
}

/// Paged document tree with call recording
#[derive(Default)]
pub struct FakeDocumentStore {
    /// Document listing, one entry per page
    pub document_pages: Vec<Vec<Document>>,
    /// Children per parent id, one entry per page
    pub children: HashMap<String, Vec<Vec<Block>>>,
    /// Block ids whose update fails
    pub failing_updates: HashSet<String>,
    /// Fail the document listing itself
    pub fail_listing: bool,

    pub document_pages_requested: Mutex<Vec<usize>>,
    pub children_requested: Mutex<Vec<(String, usize)>>,
    pub updates: Mutex<Vec<(String, BlockType, BlockContent)>>,
}

impl FakeDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(mut self, pages: Vec<Vec<Document>>) -> Self {
        self.document_pages = pages;
        self
    }

    /// Single-page children
    pub fn with_children(self, parent: &str, blocks: Vec<Block>) -> Self {
        self.with_paged_children(parent, vec![blocks])
    }

    pub fn with_paged_children(mut self, parent: &str, pages: Vec<Vec<Block>>) -> Self {
        self.children.insert(parent.to_string(), pages);
        self
    }

    pub fn failing_update(mut self, block_id: &str) -> Self {
        self.failing_updates.insert(block_id.to_string());
        self
    }

    pub fn listed_parents(&self) -> Vec<String> {
        self.children_requested
            .lock()
            .unwrap()
            .iter()
            .map(|(p, _)| p.clone())
            .collect()
    }

    pub fn updated_ids(&self) -> Vec<String> {
        self.updates
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _, _)| id.clone())
            .collect()
    }

    fn page_index(cursor: Option<&str>) -> usize {
        cursor.and_then(|c| c.parse().ok()).unwrap_or(0)
    }

    fn page_of<T: Clone>(pages: &[Vec<T>], index: usize) -> Page<T> {
        let results = pages.get(index).cloned().unwrap_or_default();
        let next_cursor = (index + 1 < pages.len()).then(|| (index + 1).to_string());
        Page {
            results,
            next_cursor,
        }
    }
}

#[async_trait]
impl DocumentStore for FakeDocumentStore {
    async fn list_documents(&self, query: DocumentQuery<'_>) -> Result<Page<Document>, NotionError> {
        if self.fail_listing {
            return Err(NotionError::NetworkError("connection refused".to_string()));
        }
        let index = Self::page_index(query.cursor);
        self.document_pages_requested.lock().unwrap().push(index);
        Ok(Self::page_of(&self.document_pages, index))
    }

    async fn list_children(
        &self,
        parent_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<Block>, NotionError> {
        let index = Self::page_index(cursor);
        self.children_requested
            .lock()
            .unwrap()
            .push((parent_id.to_string(), index));
        let pages = self.children.get(parent_id).cloned().unwrap_or_default();
        Ok(Self::page_of(&pages, index))
    }

    async fn update_block(
        &self,
        block_id: &str,
        kind: BlockType,
        content: &BlockContent,
    ) -> Result<(), NotionError> {
        if self.failing_updates.contains(block_id) {
            return Err(NotionError::ApiError(409, "conflict".to_string()));
        }
        self.updates
            .lock()
            .unwrap()
            .push((block_id.to_string(), kind, content.clone()));
        Ok(())
    }
}

/// Scripted model answer
#[derive(Debug, Clone)]
pub enum Answer {
    Text(String),
    Fail,
}

impl From<&str> for Answer {
    fn from(text: &str) -> Self {
        Answer::Text(text.to_string())
    }
}

/// Text generator answering by passage content
///
/// Classification requests are answered from `topics`, generation requests
/// from `cards`; keys are passages, matched as substrings of the user message.
#[derive(Default)]
pub struct ScriptedGenerator {
    pub topics: Vec<(String, Answer)>,
    pub cards: Vec<(String, Answer)>,
    pub requests: Mutex<Vec<(String, String)>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn passage(mut self, passage: &str, topic: impl Into<Answer>, card: impl Into<Answer>) -> Self {
        self.topics.push((passage.to_string(), topic.into()));
        self.cards.push((passage.to_string(), card.into()));
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn lookup(table: &[(String, Answer)], user: &str) -> Result<String, OpenAiError> {
        match table.iter().find(|(passage, _)| user.contains(passage.as_str())) {
            Some((_, Answer::Text(text))) => Ok(text.clone()),
            Some((_, Answer::Fail)) => Err(OpenAiError::ApiError(500, "model overloaded".to_string())),
            None => Err(OpenAiError::ApiError(400, format!("unscripted request: {}", user))),
        }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, system: &str, user: &str) -> Result<String, OpenAiError> {
        self.requests
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));

        if system == classification_prompt() {
            Self::lookup(&self.topics, user)
        } else {
            Self::lookup(&self.cards, user)
        }
    }
}

/// Deck with duplicate suppression by card text
#[derive(Default)]
pub struct FakeDeck {
    pub name: String,
    /// Block ids whose add fails
    pub failing_blocks: HashSet<String>,
    pub fail_ensure: bool,
    pub notes: Mutex<Vec<Flashcard>>,
}

impl FakeDeck {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn failing_block(mut self, block_id: &str) -> Self {
        self.failing_blocks.insert(block_id.to_string());
        self
    }

    pub fn texts(&self) -> Vec<String> {
        self.notes.lock().unwrap().iter().map(|c| c.text.clone()).collect()
    }
}

#[async_trait]
impl FlashcardStore for FakeDeck {
    fn deck_name(&self) -> &str {
        &self.name
    }

    async fn ensure_deck(&self) -> Result<(), AnkiError> {
        if self.fail_ensure {
            return Err(AnkiError::NetworkError("Anki is not running".to_string()));
        }
        Ok(())
    }

    async fn add_card(&self, card: &Flashcard) -> Result<AddOutcome, AnkiError> {
        if self.failing_blocks.contains(card.block_id()) {
            return Err(AnkiError::NetworkError("connection reset".to_string()));
        }
        let mut notes = self.notes.lock().unwrap();
        if notes.iter().any(|n| n.text == card.text) {
            return Ok(AddOutcome::Duplicate);
        }
        notes.push(card.clone());
        Ok(AddOutcome::Added(notes.len() as i64))
    }
}
