//! Documents (pages) returned by the document listing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document in the store; only its block tree is ever modified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub last_edited_time: DateTime<Utc>,
}

impl Document {
    /// Whether this document was edited at or after `threshold`
    pub fn edited_since(&self, threshold: DateTime<Utc>) -> bool {
        self.last_edited_time >= threshold
    }
}
