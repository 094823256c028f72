//! Citation verification.
//!
//! Model replies cite sources with `{doc_id, page, quote}`. Each quote is
//! checked against the bundle's normalized document texts: first as an exact
//! substring, then with whitespace runs collapsed on both sides. Unverifiable
//! citations are tagged, never dropped, so the caller can see exactly what
//! the model claimed.

use std::collections::HashMap;

use crate::models::{Citation, DocId, TrainerResult};
use crate::normalize::collapse_whitespace;

/// Verify a single citation against the document texts, filling `verified`.
pub fn verify_citation(citation: &mut Citation, doc_texts: &HashMap<DocId, String>) {
    let Some(text) = doc_texts.get(&citation.doc_id) else {
        citation.verified = Some(false);
        return;
    };

    let quote = citation.quote.trim();
    if quote.is_empty() {
        citation.verified = Some(false);
        return;
    }

    if text.contains(quote) {
        citation.verified = Some(true);
        return;
    }

    // Tolerant pass: quotes often differ from the source only in whitespace.
    let loose_quote = collapse_whitespace(quote);
    let loose_text = collapse_whitespace(text);
    citation.verified = Some(loose_text.contains(&loose_quote));
}

/// Verify every citation carried by a grading result in place.
///
/// Returns `(verified, total)` counts for logging.
pub fn verify_result(result: &mut TrainerResult, doc_texts: &HashMap<DocId, String>) -> (usize, usize) {
    let mut verified = 0;
    let mut total = 0;

    for citation in result.citations_mut() {
        verify_citation(citation, doc_texts);
        total += 1;
        if citation.verified == Some(true) {
            verified += 1;
        }
    }

    if verified < total {
        tracing::warn!(verified, total, "some citations could not be matched to source text");
    }

    (verified, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn texts() -> HashMap<DocId, String> {
        let mut map = HashMap::new();
        map.insert(
            DocId("K1".to_string()),
            "החוזה נכרת כאשר שני הצדדים הסכימו על התנאים המהותיים.".to_string(),
        );
        map
    }

    fn citation(doc_id: &str, quote: &str) -> Citation {
        Citation {
            doc_id: DocId(doc_id.to_string()),
            page: None,
            quote: quote.to_string(),
            verified: None,
        }
    }

    #[test]
    fn test_exact_quote_verifies() {
        let mut c = citation("K1", "התנאים המהותיים");
        verify_citation(&mut c, &texts());
        assert_eq!(c.verified, Some(true));
    }

    #[test]
    fn test_whitespace_differences_tolerated() {
        let mut c = citation("K1", "שני  הצדדים\nהסכימו");
        verify_citation(&mut c, &texts());
        assert_eq!(c.verified, Some(true));
    }

    #[test]
    fn test_fabricated_quote_tagged_false() {
        let mut c = citation("K1", "טקסט שלא קיים במסמך");
        verify_citation(&mut c, &texts());
        assert_eq!(c.verified, Some(false));
    }

    #[test]
    fn test_unknown_doc_tagged_false() {
        let mut c = citation("K9", "התנאים המהותיים");
        verify_citation(&mut c, &texts());
        assert_eq!(c.verified, Some(false));
    }

    #[test]
    fn test_empty_quote_tagged_false() {
        let mut c = citation("K1", "  ");
        verify_citation(&mut c, &texts());
        assert_eq!(c.verified, Some(false));
    }

    #[test]
    fn test_verify_result_counts_and_keeps_citations() {
        let mut result = crate::models::TrainerResult::from_model_reply(json!({
            "score": {"total": 80},
            "diagnostics": [{
                "category": "doctrine",
                "evidence": [
                    {"doc_id": "K1", "quote": "התנאים המהותיים"},
                    {"doc_id": "K1", "quote": "לא מופיע"}
                ]
            }]
        }))
        .unwrap();

        let (verified, total) = verify_result(&mut result, &texts());
        assert_eq!((verified, total), (1, 2));
        // Unverifiable evidence stays, tagged.
        assert_eq!(result.diagnostics[0].evidence.len(), 2);
        assert_eq!(result.diagnostics[0].evidence[1].verified, Some(false));
    }
}
