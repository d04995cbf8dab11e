//! Repair of raw generated card text
//!
//! The model sometimes wraps its answer in quotes and sometimes writes cloze
//! spans with single braces. Repair removes wrapping quote pairs and rewrites
//! every `{...}` span that is not already doubled to `{{...}}`, keeping the
//! inner text as is. The transform is idempotent.

use crate::error::{SyncError, SyncResult};
use once_cell::sync::Lazy;
use regex::Regex;

static RE_CLOZE_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{\{c\d+::.+?\}\}").expect("static regex"));

/// Opening/closing pairs treated as wrapping quotes
const QUOTE_PAIRS: [(char, char); 4] = [
    ('"', '"'),
    ('\'', '\''),
    ('\u{201C}', '\u{201D}'),
    ('\u{2018}', '\u{2019}'),
];

/// Repair raw generated text; fails with `EmptyGeneration` if nothing is left
pub fn repair(raw: &str) -> SyncResult<String> {
    let unquoted = strip_wrapping_quotes(raw);
    if unquoted.is_empty() {
        return Err(SyncError::EmptyGeneration);
    }
    Ok(double_braces(unquoted))
}

/// Repair, then require at least one `{{cN::...}}` span
pub fn repair_card(raw: &str) -> SyncResult<String> {
    let text = repair(raw)?;
    if !has_cloze_span(&text) {
        return Err(SyncError::MalformedCloze(text));
    }
    Ok(text)
}

/// Whether `text` contains a well-formed cloze deletion
pub fn has_cloze_span(text: &str) -> bool {
    RE_CLOZE_SPAN.is_match(text)
}

/// Trim whitespace and peel matching quote pairs until none wrap the text
///
/// Nested pairs are all removed, not just one per side, so that repairing
/// already repaired text changes nothing.
pub fn strip_wrapping_quotes(raw: &str) -> &str {
    let mut text = raw.trim();
    loop {
        let mut chars = text.chars();
        let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
            return text;
        };
        let wrapped = QUOTE_PAIRS
            .iter()
            .any(|&(open, close)| first == open && last == close);
        if !wrapped {
            return text;
        }
        text = text[first.len_utf8()..text.len() - last.len_utf8()].trim();
    }
}

/// Rewrite single-brace spans to double-brace spans
///
/// An already doubled span is copied through its closing `}}`. A single `{`
/// is rewritten only when a `}` closes it before another `{` opens;
/// unbalanced braces are left alone.
pub fn double_braces(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + 8);
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'{' {
            i += 1;
            continue;
        }

        if bytes.get(i + 1) == Some(&b'{') {
            i = match text[i + 2..].find("}}") {
                Some(rel) => i + 2 + rel + 2,
                None => i + 2,
            };
            continue;
        }

        let rest = &text[i + 1..];
        match rest.find(|c: char| c == '{' || c == '}') {
            Some(rel) if rest.as_bytes()[rel] == b'}' => {
                out.push_str(&text[copied..i]);
                out.push_str("{{");
                out.push_str(&rest[..rel]);
                out.push_str("}}");
                i += 1 + rel + 1;
                copied = i;
            }
            _ => i += 1,
        }
    }

    out.push_str(&text[copied..]);
    out
}
