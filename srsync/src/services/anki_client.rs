//! AnkiConnect client
//!
//! Cards are added as `Cloze` notes to one configured deck with
//! deck-scoped duplicate suppression. A duplicate rejection is reported as
//! [`AddOutcome::Duplicate`] so a rerun after a partial commit can move on to
//! marking the source block.

use super::FlashcardStore;
use crate::models::Flashcard;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

const ANKI_CONNECT_VERSION: u32 = 6;
const CLOZE_MODEL: &str = "Cloze";
const NOTE_TAG: &str = "srsync";

/// AnkiConnect client errors
#[derive(Debug, Error)]
pub enum AnkiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("AnkiConnect rejected '{action}': {message}")]
    Rejected { action: String, message: String },

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Result of adding one card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// New note created with this id
    Added(i64),
    /// Deck already holds an identical note
    Duplicate,
}

#[derive(Debug, Deserialize)]
struct ActionResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

/// AnkiConnect client bound to one deck
pub struct AnkiConnectClient {
    http_client: reqwest::Client,
    url: String,
    deck_name: String,
}

impl AnkiConnectClient {
    pub fn new(url: impl Into<String>, deck_name: impl Into<String>) -> Result<Self, AnkiError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AnkiError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            url: url.into(),
            deck_name: deck_name.into(),
        })
    }

    /// Invoke one action; `Err(Rejected)` carries AnkiConnect's error string
    async fn invoke(&self, action: &str, params: Value) -> Result<Value, AnkiError> {
        let body = json!({
            "action": action,
            "version": ANKI_CONNECT_VERSION,
            "params": params,
        });

        let response = self
            .http_client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnkiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AnkiError::ApiError(status.as_u16(), error_text));
        }

        let parsed: ActionResponse = response
            .json()
            .await
            .map_err(|e| AnkiError::ParseError(e.to_string()))?;

        match parsed.error {
            Some(message) => Err(AnkiError::Rejected {
                action: action.to_string(),
                message,
            }),
            None => Ok(parsed.result),
        }
    }

    /// Note payload for `addNote`
    pub fn note_for(&self, card: &Flashcard) -> Value {
        json!({
            "deckName": self.deck_name,
            "modelName": CLOZE_MODEL,
            "fields": {
                "Text": card.text,
                "Back Extra": card.topic.label(),
            },
            "tags": [NOTE_TAG, card.topic.slug()],
            "options": {
                "allowDuplicate": false,
                "duplicateScope": "deck",
            },
        })
    }
}

fn is_duplicate_rejection(message: &str) -> bool {
    message.to_lowercase().contains("duplicate")
}

#[async_trait]
impl FlashcardStore for AnkiConnectClient {
    fn deck_name(&self) -> &str {
        &self.deck_name
    }

    async fn ensure_deck(&self) -> Result<(), AnkiError> {
        self.invoke("createDeck", json!({ "deck": self.deck_name }))
            .await?;
        Ok(())
    }

    async fn add_card(&self, card: &Flashcard) -> Result<AddOutcome, AnkiError> {
        let params = json!({ "note": self.note_for(card) });

        match self.invoke("addNote", params).await {
            Ok(result) => result
                .as_i64()
                .map(AddOutcome::Added)
                .ok_or_else(|| AnkiError::ParseError(format!("addNote returned {}", result))),
            Err(AnkiError::Rejected { message, .. }) if is_duplicate_rejection(&message) => {
                tracing::debug!(block_id = %card.block_id(), "Card already in deck");
                Ok(AddOutcome::Duplicate)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Block, BlockType, RichText, Topic};

    #[test]
    fn test_note_payload() {
        let client = AnkiConnectClient::new("http://127.0.0.1:8765", "Reading").unwrap();
        let card = Flashcard::new(
            "A gas plant takes {{c1::10 minutes}} to start",
            Topic::EconomicsAndBusiness,
            Block::new("b1", BlockType::Paragraph, vec![RichText::plain("x")]),
        );

        let note = client.note_for(&card);
        assert_eq!(note["deckName"], "Reading");
        assert_eq!(note["modelName"], "Cloze");
        assert_eq!(note["fields"]["Text"], "A gas plant takes {{c1::10 minutes}} to start");
        assert_eq!(note["tags"][1], "economics_and_business");
        assert_eq!(note["options"]["duplicateScope"], "deck");
    }

    #[test]
    fn test_duplicate_rejection_detection() {
        assert!(is_duplicate_rejection("cannot create note because it is a duplicate"));
        assert!(!is_duplicate_rejection("model was not found: Cloze"));
    }
}
