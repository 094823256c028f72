use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned at ingestion time: "K1", "K2", ... for knowledge
/// documents and "S1", "S2", ... for style documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocId(pub String);

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Document role within a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    /// Authoritative course material supplied as grounding context.
    Knowledge,
    /// Exemplar solved exams / model answers used for comparison and voice.
    Style,
}

impl DocType {
    /// Registry id prefix for this document type.
    pub fn prefix(&self) -> &'static str {
        match self {
            DocType::Knowledge => "K",
            DocType::Style => "S",
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocType::Knowledge => f.write_str("knowledge"),
            DocType::Style => f.write_str("style"),
        }
    }
}

/// Raw document as supplied by the caller, before registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSource {
    /// Display name (usually the file name)
    pub name: String,

    /// Raw text content
    pub text: String,
}

/// A registered course document. Immutable once ingested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Registry identifier
    pub id: DocId,

    /// Document role
    pub doc_type: DocType,

    /// Display name
    pub name: String,

    /// Raw text content
    pub text: String,
}

/// Entry in the course document registry, as exposed to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocEntry {
    pub doc_id: DocId,

    #[serde(rename = "type")]
    pub doc_type: DocType,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
}

/// Unique identifier for a text chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkId(pub u64);

/// A bounded substring of a document's normalized text.
///
/// Invariant: `text` is a verbatim substring of the normalized source
/// document text starting at `anchor.offset` (in characters).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier
    pub id: ChunkId,

    /// Source document
    pub doc_id: DocId,

    /// Source document role
    pub doc_type: DocType,

    /// Chunk text
    pub text: String,

    /// Citation anchor back into the source
    pub anchor: ChunkAnchor,
}

/// Where a chunk sits inside its source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkAnchor {
    /// Character offset into the normalized document text
    pub offset: usize,

    /// Page number from the nearest preceding `PAGE: N` marker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Topic label (the document display name, under topic-based citations)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

/// How snippets and citations reference their source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    /// Anchor on `PAGE: N` markers embedded in the text
    Page,
    /// Anchor on the document display name
    Topic,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_type_prefix() {
        assert_eq!(DocType::Knowledge.prefix(), "K");
        assert_eq!(DocType::Style.prefix(), "S");
    }

    #[test]
    fn test_doc_type_serde_lowercase() {
        assert_eq!(serde_json::to_string(&DocType::Knowledge).unwrap(), "\"knowledge\"");
        let parsed: DocType = serde_json::from_str("\"style\"").unwrap();
        assert_eq!(parsed, DocType::Style);
    }

    #[test]
    fn test_doc_id_serializes_as_string() {
        let id = DocId("K1".to_string());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"K1\"");
    }
}
