//! Text normalization for ingested documents.
//!
//! Hebrew course material arrives with bidirectional control marks sprinkled
//! by editors and converters. Normalization strips them and collapses
//! whitespace so chunk offsets and quote verification work on stable text.

/// Unicode directional formatting characters removed during normalization.
const DIRECTIONAL_MARKS: [char; 13] = [
    '\u{200E}', // LRM
    '\u{200F}', // RLM
    '\u{061C}', // ALM
    '\u{202A}', '\u{202B}', '\u{202C}', '\u{202D}', '\u{202E}', // embedding/override
    '\u{2066}', '\u{2067}', '\u{2068}', '\u{2069}', // isolates
    '\u{FEFF}', // BOM / zero-width no-break space
];

/// Normalize document text: drop directional marks, collapse whitespace runs
/// into single spaces, trim both ends. Pure and total.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars() {
        if DIRECTIONAL_MARKS.contains(&ch) {
            continue;
        }
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(ch);
    }

    out
}

/// Collapse whitespace runs into single spaces and trim, without touching
/// any other characters. Used for tolerant quote matching.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
