//! Topic classification
//!
//! One request per passage. The answer must be exactly one of the ten topic
//! labels; anything else fails the passage with `InvalidClassification`.
//! There is no retry and no fallback topic.

use crate::error::{SyncError, SyncResult};
use crate::models::Topic;
use crate::services::TextGenerator;

/// System prompt listing the taxonomy
pub fn classification_prompt() -> String {
    format!(
        "You are a librarian who files paragraphs into exactly one topic. \
         The user will send a paragraph. Reply with the single topic from the \
         list below that best fits it, written exactly as it appears in the \
         list, with no other words, punctuation or explanation.\n\n\
         The 10 topics are: {}",
        Topic::label_list()
    )
}

/// Map a model answer to a topic
///
/// Surrounding whitespace (a trailing newline from the transport) is ignored;
/// the label itself must match byte for byte.
pub fn parse_topic(answer: &str) -> SyncResult<Topic> {
    Topic::from_label(answer.trim())
        .ok_or_else(|| SyncError::InvalidClassification(answer.to_string()))
}

/// Classify a passage into one topic
pub async fn classify(generator: &dyn TextGenerator, passage: &str) -> SyncResult<Topic> {
    let answer = generator.complete(&classification_prompt(), passage).await?;
    let topic = parse_topic(&answer)?;
    tracing::debug!(topic = %topic, "Passage classified");
    Ok(topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_every_topic() {
        let prompt = classification_prompt();
        for topic in Topic::ALL {
            assert!(prompt.contains(topic.label()), "missing {}", topic);
        }
    }

    #[test]
    fn test_parse_topic_exact_label() {
        assert_eq!(
            parse_topic("Mathematics and Physics\n").unwrap(),
            Topic::MathematicsAndPhysics
        );
    }

    #[test]
    fn test_parse_topic_rejects_near_misses() {
        for answer in ["Topic: World History", "world history", "World History.", "Cooking", ""] {
            assert!(
                matches!(parse_topic(answer), Err(SyncError::InvalidClassification(_))),
                "accepted {:?}",
                answer
            );
        }
    }
}
