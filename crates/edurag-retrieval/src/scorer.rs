//! Lexical keyword-overlap scoring.
//!
//! Scores are the fraction of distinct query tokens found as substrings of
//! the lowercased chunk text. Substring matching (rather than token
//! matching) keeps Hebrew prefixed forms ("בחוזה", "שהחוזה") matchable by
//! the bare token.

/// Characters kept inside a token besides letters and digits. Covers the
/// Hebrew geresh and the typographic apostrophe used in abbreviations.
const TOKEN_JOINERS: [char; 3] = ['\'', '\u{05F3}', '\u{2019}'];

/// Split a query into distinct lowercase tokens.
///
/// Tokens shorter than two characters are dropped; order of first
/// appearance is preserved.
pub fn tokenize(query: &str) -> Vec<String> {
    let lowered = query.to_lowercase();
    let mut tokens: Vec<String> = Vec::new();

    for token in lowered.split(|c: char| !c.is_alphanumeric() && !TOKEN_JOINERS.contains(&c)) {
        // Edge apostrophes stay: "סע׳" must keep its geresh.
        if token.chars().count() < 2 || !token.chars().any(char::is_alphanumeric) {
            continue;
        }
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }

    tokens
}

/// Score a chunk against pre-tokenized query tokens.
///
/// Returns `matched / total` distinct tokens, 0.0 when there are no tokens.
pub fn score_tokens(tokens: &[String], chunk_text: &str) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }

    let haystack = chunk_text.to_lowercase();
    let matched = tokens.iter().filter(|t| haystack.contains(t.as_str())).count();
    matched as f64 / tokens.len() as f64
}

/// Convenience scoring of raw query text against chunk text.
pub fn score_text(query: &str, chunk_text: &str) -> f64 {
    score_tokens(&tokenize(query), chunk_text)
}
