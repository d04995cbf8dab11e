//! Tag matching and passage extraction

use super::normalizer::normalize;
use crate::models::{Block, RichText};

/// A tagged block's text with the tag segments removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedPassage {
    pub block_id: String,
    pub text: String,
}

/// Whether `segment` carries the tag marker
pub fn contains_marker(segment: &RichText, marker: &str) -> bool {
    normalize(&segment.plain_text).contains(&normalize(marker))
}

/// Whether `segment` carries the tag marker and is not yet struck through
pub fn is_unprocessed_tag(segment: &RichText, marker: &str) -> bool {
    !segment.annotations.strikethrough && contains_marker(segment, marker)
}

/// Whether any segment of `block` holds an unprocessed tag
pub fn has_unprocessed_tag(block: &Block, marker: &str) -> bool {
    block.segments().iter().any(|s| is_unprocessed_tag(s, marker))
}

/// Concatenate every segment that does not contain the marker, in order
///
/// Segment text is copied exactly; see [`TaggedPassage::prompt_text`] for the
/// form sent to the model.
pub fn extract_passage(block: &Block, marker: &str) -> TaggedPassage {
    let text: String = block
        .segments()
        .iter()
        .filter(|s| !contains_marker(s, marker))
        .map(|s| s.plain_text.as_str())
        .collect();

    TaggedPassage {
        block_id: block.id.clone(),
        text,
    }
}

impl TaggedPassage {
    /// Normalised, trimmed text for prompts; empty if nothing is left
    pub fn prompt_text(&self) -> String {
        normalize(&self.text).trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlockType;

    fn block(segments: Vec<RichText>) -> Block {
        Block::new("b1", BlockType::Paragraph, segments)
    }

    #[test]
    fn test_extract_drops_marker_segments_and_keeps_order() {
        let b = block(vec![
            RichText::plain("Power plants that start quickly "),
            RichText::plain("@srs-item"),
            RichText::plain("handle demand swings better."),
        ]);

        let passage = extract_passage(&b, "srs-item");
        assert_eq!(passage.block_id, "b1");
        assert_eq!(
            passage.text,
            "Power plants that start quickly handle demand swings better."
        );
    }

    #[test]
    fn test_struck_marker_is_not_a_match() {
        let b = block(vec![
            RichText::plain("text"),
            RichText::plain("srs-item").struck(),
        ]);
        assert!(!has_unprocessed_tag(&b, "srs-item"));
    }

    #[test]
    fn test_any_unstruck_marker_matches() {
        let b = block(vec![
            RichText::plain("srs-item").struck(),
            RichText::plain("body"),
            RichText::plain("srs-item"),
        ]);
        assert!(has_unprocessed_tag(&b, "srs-item"));
    }

    #[test]
    fn test_marker_matching_ignores_dash_variants() {
        let b = block(vec![RichText::plain("srs\u{2011}item")]);
        assert!(has_unprocessed_tag(&b, "srs-item"));
    }

    #[test]
    fn test_extract_is_deterministic() {
        let b = block(vec![
            RichText::plain("It\u{2019}s "),
            RichText::plain("srs-item"),
            RichText::plain("a definition"),
        ]);
        assert_eq!(extract_passage(&b, "srs-item"), extract_passage(&b, "srs-item"));
        assert_eq!(extract_passage(&b, "srs-item").text, "It\u{2019}s a definition");
        assert_eq!(extract_passage(&b, "srs-item").prompt_text(), "It's a definition");
    }

    #[test]
    fn test_marker_only_block_yields_empty_prompt() {
        let b = block(vec![RichText::plain(" "), RichText::plain("@srs-item ")]);
        assert_eq!(extract_passage(&b, "srs-item").prompt_text(), "");
    }
}
