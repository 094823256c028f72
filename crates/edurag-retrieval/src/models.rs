use edurag_core::models::{Chunk, ChunkId, DocId, DocType};
use serde::{Deserialize, Serialize};

/// A retrieved chunk with its relevance score and citation anchor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snippet {
    /// Chunk ID
    pub chunk_id: ChunkId,

    /// Source document
    pub doc_id: DocId,

    /// Source document role
    pub doc_type: DocType,

    /// Chunk text, verbatim from the normalized source
    pub text: String,

    /// Keyword-overlap score in (0, 1]
    pub score: f64,

    /// Page anchor, when the corpus uses page citations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Topic anchor, when the corpus uses topic citations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl Snippet {
    /// Build a snippet from a scored chunk
    pub fn from_chunk(chunk: &Chunk, score: f64) -> Self {
        Self {
            chunk_id: chunk.id,
            doc_id: chunk.doc_id.clone(),
            doc_type: chunk.doc_type,
            text: chunk.text.clone(),
            score,
            page: chunk.anchor.page,
            topic: chunk.anchor.topic.clone(),
        }
    }
}

/// Retrieval result with the query breakdown, for inspection output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalOutcome {
    /// Distinct query tokens after tokenization
    pub query_tokens: Vec<String>,

    /// Number of chunks scored
    pub chunks_considered: usize,

    /// Top-k snippets, best first
    pub snippets: Vec<Snippet>,
}
