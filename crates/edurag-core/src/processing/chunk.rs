use crate::error::{EduragError, Result};
use crate::models::{Chunk, ChunkAnchor, ChunkId, CitationStyle, Document};
use crate::normalize::normalize;

/// Configuration for chunk generation
#[derive(Debug, Clone)]
pub struct Chunker {
    /// Maximum characters per chunk
    pub chunk_size: usize,
    /// Character overlap between consecutive chunks
    pub overlap: usize,
    /// Which anchor chunks carry for citations
    pub citation_style: CitationStyle,
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            chunk_size: 1200,
            overlap: 200,
            citation_style: CitationStyle::Page,
        }
    }
}

impl Chunker {
    /// Create a new Chunker with custom size and overlap
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(EduragError::ConfigInvalid {
                key: "chunk_size".to_string(),
                reason: "chunk_size must be positive".to_string(),
            });
        }

        if overlap >= chunk_size {
            return Err(EduragError::ConfigInvalid {
                key: "chunk_overlap".to_string(),
                reason: format!(
                    "overlap ({}) must be less than chunk_size ({})",
                    overlap, chunk_size
                ),
            });
        }

        Ok(Self { chunk_size, overlap, citation_style: CitationStyle::Page })
    }

    pub fn with_citation_style(mut self, style: CitationStyle) -> Self {
        self.citation_style = style;
        self
    }

    /// Chunk a document's normalized text.
    ///
    /// `next_id` carries the running chunk id across documents so ids stay
    /// unique within a bundle.
    pub fn chunk_document(&self, doc: &Document, next_id: &mut u64) -> Vec<Chunk> {
        let normalized = normalize(&doc.text);
        let chars: Vec<char> = normalized.chars().collect();

        let page_markers = match self.citation_style {
            CitationStyle::Page => scan_page_markers(&chars),
            CitationStyle::Topic => Vec::new(),
        };

        let mut chunks = Vec::new();

        for (start, end) in self.spans(chars.len()) {
            let text: String = chars[start..end].iter().collect();

            let (page, topic) = match self.citation_style {
                CitationStyle::Page => (page_at_offset(&page_markers, start), None),
                CitationStyle::Topic => (None, Some(doc.name.clone())),
            };

            chunks.push(Chunk {
                id: ChunkId(*next_id),
                doc_id: doc.id.clone(),
                doc_type: doc.doc_type,
                text,
                anchor: ChunkAnchor { offset: start, page, topic },
            });
            *next_id += 1;
        }

        chunks
    }

    /// Chunk already-normalized text into `(offset, text)` pairs.
    pub fn chunk_text(&self, normalized: &str) -> Vec<(usize, String)> {
        let chars: Vec<char> = normalized.chars().collect();
        self.spans(chars.len())
            .into_iter()
            .map(|(start, end)| (start, chars[start..end].iter().collect()))
            .collect()
    }

    /// Compute `[start, end)` char spans covering `len` characters.
    ///
    /// The cursor advances by `chunk_size - overlap` each step, which is at
    /// least 1 because the constructor rejects overlap >= chunk_size. Without
    /// that guard the scan would stall once the overlap exceeds the remaining
    /// text.
    fn spans(&self, len: usize) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let step = self.chunk_size - self.overlap;
        let mut start = 0;

        while start < len {
            let end = (start + self.chunk_size).min(len);
            spans.push((start, end));
            if end == len {
                break;
            }
            start += step;
        }

        spans
    }
}

/// Find `PAGE: N` markers, returning `(char_offset, page_number)` pairs in
/// document order.
fn scan_page_markers(chars: &[char]) -> Vec<(usize, u32)> {
    const MARKER: [char; 5] = ['P', 'A', 'G', 'E', ':'];

    let mut markers = Vec::new();
    let mut i = 0;

    while i + MARKER.len() <= chars.len() {
        if chars[i..i + MARKER.len()] != MARKER {
            i += 1;
            continue;
        }

        let mut j = i + MARKER.len();
        while j < chars.len() && chars[j] == ' ' {
            j += 1;
        }

        let mut value: u32 = 0;
        let mut digits = 0;
        while j < chars.len() {
            let Some(d) = chars[j].to_digit(10) else { break };
            value = value.saturating_mul(10).saturating_add(d);
            digits += 1;
            j += 1;
        }

        if digits > 0 {
            markers.push((i, value));
            i = j;
        } else {
            i += MARKER.len();
        }
    }

    markers
}

/// Page of the nearest marker at or before `offset`.
fn page_at_offset(markers: &[(usize, u32)], offset: usize) -> Option<u32> {
    markers
        .iter()
        .take_while(|(marker_offset, _)| *marker_offset <= offset)
        .last()
        .map(|(_, page)| *page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocId, DocType};
    use proptest::prelude::*;

    fn knowledge_doc(text: &str) -> Document {
        Document {
            id: DocId("K1".to_string()),
            doc_type: DocType::Knowledge,
            name: "מחברת.txt".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_chunker_new_valid() {
        let chunker = Chunker::new(40, 10).unwrap();
        assert_eq!(chunker.chunk_size, 40);
        assert_eq!(chunker.overlap, 10);
    }

    #[test]
    fn test_chunker_rejects_zero_size() {
        assert!(Chunker::new(0, 0).is_err());
    }

    #[test]
    fn test_chunker_rejects_overlap_ge_size() {
        assert!(Chunker::new(40, 40).is_err());
        assert!(Chunker::new(40, 50).is_err());
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let chunker = Chunker::new(40, 10).unwrap();
        let mut next_id = 0;
        let chunks = chunker.chunk_document(&knowledge_doc(""), &mut next_id);
        assert!(chunks.is_empty());
        assert_eq!(next_id, 0);
    }

    #[test]
    fn test_short_text_yields_one_chunk() {
        let chunker = Chunker::new(40, 10).unwrap();
        let mut next_id = 0;
        let chunks = chunker.chunk_document(&knowledge_doc("טקסט קצר"), &mut next_id);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "טקסט קצר");
        assert_eq!(chunks[0].anchor.offset, 0);
    }

    #[test]
    fn test_consecutive_chunks_overlap_exactly() {
        // chunk_size=40, overlap=10 over a paged Hebrew text.
        let text = "PAGE: 1\nהחוזה נכרת כאשר שני הצדדים הסכימו על התנאים המהותיים.\nPAGE: 2\nהפרת חוזה מקנה לנפגע סעדים שונים לפי הדין.";
        let chunker = Chunker::new(40, 10).unwrap();
        let mut next_id = 0;
        let chunks = chunker.chunk_document(&knowledge_doc(text), &mut next_id);

        assert!(chunks.len() >= 2);
        assert_eq!(chunks[0].anchor.offset, 0);
        assert_eq!(chunks[1].anchor.offset, 30);

        for pair in chunks.windows(2) {
            let prev: Vec<char> = pair[0].text.chars().collect();
            let next: Vec<char> = pair[1].text.chars().collect();
            // All chunks except possibly the last are full-size, so each
            // consecutive pair shares exactly `overlap` characters.
            assert_eq!(prev.len(), 40);
            assert_eq!(&prev[30..], &next[..10]);
        }
    }

    #[test]
    fn test_chunks_are_verbatim_substrings() {
        let text = "PAGE: 1\nחופש החוזים הוא עקרון יסוד בדיני החוזים הישראליים.";
        let chunker = Chunker::new(25, 5).unwrap();
        let mut next_id = 0;
        let doc = knowledge_doc(text);
        let normalized = normalize(&doc.text);
        let chunks = chunker.chunk_document(&doc, &mut next_id);

        for chunk in &chunks {
            assert!(normalized.contains(&chunk.text));
        }
    }

    #[test]
    fn test_page_anchor_tracks_markers() {
        let text = "PAGE: 1\nתוכן בעמוד הראשון שנמשך עוד ועוד.\nPAGE: 2\nתוכן בעמוד השני.";
        let chunker = Chunker::new(30, 5).unwrap();
        let mut next_id = 0;
        let chunks = chunker.chunk_document(&knowledge_doc(text), &mut next_id);

        assert_eq!(chunks.first().unwrap().anchor.page, Some(1));
        assert_eq!(chunks.last().unwrap().anchor.page, Some(2));
    }

    #[test]
    fn test_topic_style_anchors_on_doc_name() {
        let chunker = Chunker::new(30, 5).unwrap().with_citation_style(CitationStyle::Topic);
        let mut next_id = 0;
        let chunks = chunker.chunk_document(&knowledge_doc("PAGE: 1\nתוכן כלשהו"), &mut next_id);

        assert_eq!(chunks[0].anchor.page, None);
        assert_eq!(chunks[0].anchor.topic.as_deref(), Some("מחברת.txt"));
    }

    #[test]
    fn test_chunk_ids_run_across_documents() {
        let chunker = Chunker::new(10, 2).unwrap();
        let mut next_id = 0;
        let first = chunker.chunk_document(&knowledge_doc("אחת שתיים שלוש ארבע"), &mut next_id);
        let second = chunker.chunk_document(&knowledge_doc("חמש שש שבע שמונה תשע"), &mut next_id);

        let last_of_first = first.last().unwrap().id.0;
        assert_eq!(second.first().unwrap().id.0, last_of_first + 1);
    }

    #[test]
    fn test_scan_page_markers() {
        let chars: Vec<char> = "PAGE: 1 text PAGE:12 more PAGE: x".chars().collect();
        let markers = scan_page_markers(&chars);
        assert_eq!(markers, vec![(0, 1), (13, 12)]);
    }

    proptest! {
        #[test]
        fn prop_chunks_reconstruct_text(
            text in "[a-z ]{0,200}",
            chunk_size in 1usize..50,
            overlap_frac in 0usize..50,
        ) {
            let overlap = overlap_frac % chunk_size;
            let chunker = Chunker::new(chunk_size, overlap).unwrap();
            let pieces = chunker.chunk_text(&text);

            // Concatenating chunks with overlaps removed reconstructs the text.
            let mut rebuilt = String::new();
            for (i, (_, piece)) in pieces.iter().enumerate() {
                let chars: Vec<char> = piece.chars().collect();
                let skip = if i == 0 { 0 } else { overlap };
                rebuilt.extend(&chars[skip..]);
            }
            prop_assert_eq!(&rebuilt, &text);

            // Chunk count is bounded by ceil(len / (size - overlap)).
            let len = text.chars().count();
            let step = chunk_size - overlap;
            prop_assert!(pieces.len() <= len.div_ceil(step));
        }

        #[test]
        fn prop_chunking_is_deterministic(text in "\\PC{0,120}") {
            let chunker = Chunker::new(17, 4).unwrap();
            let normalized = normalize(&text);
            prop_assert_eq!(chunker.chunk_text(&normalized), chunker.chunk_text(&normalized));
        }
    }
}
