//! Cloze card generation
//!
//! Returns the model's raw text; repair and validation happen in
//! [`super::repair`].

use crate::error::SyncResult;
use crate::models::Topic;
use crate::services::TextGenerator;

const CARD_SYSTEM_PROMPT: &str = r#"You are a flashcard creation expert. Your task is to analyze the paragraph that comes after the "**Input Paragraph:**" prefix provided by the user, as well as a user-provided Topic that is from one of the 10 topics below, and generate a single Anki cloze deletion flashcard that challenges deeper understanding. You must prioritize these guidelines:

- **Information Density:** Choose a segment of the user-provided paragraph that contains a key fact, definition, or important concept relevant to the topic.
- **Conciseness:** The cloze deletion should be as short as possible while still providing enough context for recall.
- **Deeper Understanding:** The card should test more than simple memorization. If possible, structure the cloze to require analysis, comparison, or application of the concept.

The 10 topics are: {topics}

For example, given the following input:

**Input Paragraph:** In the field of energy economics, the time-to-start for different power plants is an important factor in determining the optimal mix of energy sources. Power plants that can be started quickly, such as natural gas-fired plants which take 10 minutes to start, are better suited to handle fluctuations in demand than plants that take longer to start.
**Topic:** Economics and Business

the output should be only the card text:

A natural gas plant takes about {{c1::10 minutes}} to start"#;

/// System prompt for card generation
pub fn card_prompt() -> String {
    CARD_SYSTEM_PROMPT.replace("{topics}", &Topic::label_list())
}

/// User message carrying the passage and its topic
pub fn card_request(passage: &str, topic: Topic) -> String {
    format!("**Input Paragraph:** {}\n**Topic:** {}", passage, topic)
}

/// Ask the model for one cloze card; the raw answer is returned unvalidated
pub async fn generate_card(
    generator: &dyn TextGenerator,
    passage: &str,
    topic: Topic,
) -> SyncResult<String> {
    let raw = generator
        .complete(&card_prompt(), &card_request(passage, topic))
        .await?;
    Ok(raw)
}
