//! Top-k snippet retrieval over a chunk corpus.

use edurag_core::error::{EduragError, Result};
use edurag_core::models::Chunk;

use crate::models::{RetrievalOutcome, Snippet};
use crate::scorer::{score_tokens, tokenize};

/// Retrieve the top `k` chunks matching `query`.
///
/// A whitespace-only query is a caller error. A query whose every token is
/// too short to score yields an empty result instead: there is nothing to
/// match, but the caller did ask a question.
///
/// The sort is stable and descending, so equal-scored chunks keep corpus
/// order and repeated calls return identical results.
pub fn retrieve(query: &str, chunks: &[Chunk], k: usize) -> Result<RetrievalOutcome> {
    if query.trim().is_empty() {
        return Err(EduragError::EmptyQuery);
    }

    let tokens = tokenize(query);
    if tokens.is_empty() {
        return Ok(RetrievalOutcome {
            query_tokens: tokens,
            chunks_considered: chunks.len(),
            snippets: Vec::new(),
        });
    }

    let mut scored: Vec<Snippet> = chunks
        .iter()
        .filter_map(|chunk| {
            let score = score_tokens(&tokens, &chunk.text);
            (score > 0.0).then(|| Snippet::from_chunk(chunk, score))
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);

    Ok(RetrievalOutcome {
        query_tokens: tokens,
        chunks_considered: chunks.len(),
        snippets: scored,
    })
}
