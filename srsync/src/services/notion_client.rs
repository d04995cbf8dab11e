//! Notion API client
//!
//! Document listing (`POST /search`), block listing
//! (`GET /blocks/{id}/children`) and block update (`PATCH /blocks/{id}`).
//! Requests are throttled to the service's average limit of 3 per second.

use super::{DocumentQuery, DocumentStore};
use crate::models::{Block, BlockContent, BlockType, Document, Page};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;

const NOTION_VERSION: &str = "2022-06-28";
const USER_AGENT: &str = concat!("srsync/", env!("CARGO_PKG_VERSION"));
const PAGE_SIZE: u32 = 100;
const REQUESTS_PER_SECOND: u32 = 3;

/// Notion client errors
#[derive(Debug, Error)]
pub enum NotionError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Unauthorized: check the Notion integration key and page sharing")]
    Unauthorized,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

type DirectRateLimiter = governor::RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Notion API client
pub struct NotionClient {
    http_client: reqwest::Client,
    rate_limiter: DirectRateLimiter,
    base_url: String,
    api_key: String,
}

impl NotionClient {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Result<Self, NotionError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| NotionError::NetworkError(e.to_string()))?;

        let per_second = NonZeroU32::new(REQUESTS_PER_SECOND).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            http_client,
            rate_limiter: governor::RateLimiter::direct(governor::Quota::per_second(per_second)),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
    }

    /// Send a request after waiting for the rate limiter; map failure statuses
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, NotionError> {
        self.rate_limiter.until_ready().await;

        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| NotionError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == 401 {
            return Err(NotionError::Unauthorized);
        }

        if status == 429 {
            return Err(NotionError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(NotionError::ApiError(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| NotionError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for NotionClient {
    async fn list_documents(&self, query: DocumentQuery<'_>) -> Result<Page<Document>, NotionError> {
        let mut body = json!({
            "filter": {"property": "object", "value": "page"},
            "sort": {"timestamp": "last_edited_time", "direction": query.direction.as_str()},
            "page_size": PAGE_SIZE,
        });
        if let Some(text) = query.text {
            body["query"] = Value::String(text.to_string());
        }
        if let Some(cursor) = query.cursor {
            body["start_cursor"] = Value::String(cursor.to_string());
        }

        tracing::debug!(cursor = ?query.cursor, "Listing documents");

        let url = format!("{}/search", self.base_url);
        let value = self.send(self.http_client.post(&url).json(&body)).await?;
        parse_page(value, parse_document)
    }

    async fn list_children(
        &self,
        parent_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<Block>, NotionError> {
        let url = format!("{}/blocks/{}/children", self.base_url, parent_id);
        let page_size = PAGE_SIZE.to_string();
        let mut params = vec![("page_size", page_size.as_str())];
        if let Some(cursor) = cursor {
            params.push(("start_cursor", cursor));
        }

        tracing::debug!(parent_id = %parent_id, cursor = ?cursor, "Listing child blocks");

        let value = self.send(self.http_client.get(&url).query(&params)).await?;
        parse_page(value, parse_block)
    }

    async fn update_block(
        &self,
        block_id: &str,
        kind: BlockType,
        content: &BlockContent,
    ) -> Result<(), NotionError> {
        let payload =
            serde_json::to_value(content).map_err(|e| NotionError::ParseError(e.to_string()))?;
        let mut body = Map::new();
        body.insert(kind.as_str().to_string(), payload);

        tracing::debug!(block_id = %block_id, block_type = %kind, "Updating block");

        let url = format!("{}/blocks/{}", self.base_url, block_id);
        self.send(self.http_client.patch(&url).json(&Value::Object(body)))
            .await?;
        Ok(())
    }
}

/// Split a list response into results and continuation cursor
pub fn parse_page<T>(
    value: Value,
    parse_item: fn(Value) -> Result<T, NotionError>,
) -> Result<Page<T>, NotionError> {
    let Value::Object(mut object) = value else {
        return Err(NotionError::ParseError("list response is not an object".to_string()));
    };

    let results = match object.remove("results") {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(parse_item)
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Err(NotionError::ParseError("list response has no results".to_string())),
    };

    let has_more = object
        .get("has_more")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let next_cursor = object
        .get("next_cursor")
        .and_then(Value::as_str)
        .filter(|_| has_more)
        .map(str::to_string);

    Ok(Page {
        results,
        next_cursor,
    })
}

/// Parse a page object into a [`Document`]
///
/// The title is the concatenated plain text of whichever property has type
/// `title`; untitled pages get an empty title.
pub fn parse_document(value: Value) -> Result<Document, NotionError> {
    let id = required_str(&value, "id")?.to_string();
    let edited = required_str(&value, "last_edited_time")?;
    let last_edited_time = DateTime::parse_from_rfc3339(edited)
        .map_err(|e| NotionError::ParseError(format!("last_edited_time '{}': {}", edited, e)))?
        .with_timezone(&Utc);

    let title = value
        .get("properties")
        .and_then(Value::as_object)
        .and_then(|props| {
            props
                .values()
                .find(|p| p.get("type").and_then(Value::as_str) == Some("title"))
        })
        .and_then(|p| p.get("title"))
        .and_then(Value::as_array)
        .map(|segments| {
            segments
                .iter()
                .filter_map(|s| s.get("plain_text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default();

    Ok(Document {
        id,
        title,
        last_edited_time,
    })
}

/// Parse a block object into a [`Block`]
///
/// The content payload lives under a key named after the block type. It is
/// kept only for processable types; other types become opaque leaves.
pub fn parse_block(mut value: Value) -> Result<Block, NotionError> {
    let id = required_str(&value, "id")?.to_string();
    let block_type = required_str(&value, "type")?.to_string();
    let has_children = value
        .get("has_children")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let content = match BlockType::parse(&block_type) {
        Some(_) => {
            // Missing or null payload reads as an empty block
            let content = match value.get_mut(&block_type).map(Value::take) {
                Some(raw) if !raw.is_null() => serde_json::from_value(raw).map_err(|e| {
                    NotionError::ParseError(format!("block {} ({}): {}", id, block_type, e))
                })?,
                _ => BlockContent::default(),
            };
            Some(content)
        }
        None => None,
    };

    Ok(Block {
        id,
        block_type,
        has_children,
        content,
    })
}

fn required_str<'a>(value: &'a Value, field: &str) -> Result<&'a str, NotionError> {
    value
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| NotionError::ParseError(format!("missing field '{}'", field)))
}
