//! Punctuation normalisation
//!
//! Maps typographic variants of quotes, dashes, ellipses and spaces to
//! their ASCII forms so text compares stably regardless of how an editor
//! auto-formatted it.

/// Canonical ASCII replacement for a typographic character, if any
fn canonical(c: char) -> Option<&'static str> {
    let replacement = match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' | '\u{FF07}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' | '\u{00AB}'
        | '\u{00BB}' | '\u{FF02}' => "\"",
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}'
        | '\u{2212}' => "-",
        '\u{2026}' => "...",
        '\u{00A0}' | '\u{2007}' | '\u{202F}' | '\u{2009}' | '\u{200A}' => " ",
        '\u{FF5B}' => "{",
        '\u{FF5D}' => "}",
        _ => return None,
    };
    Some(replacement)
}

/// Replace typographic punctuation with ASCII equivalents
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match canonical(c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    out
}
