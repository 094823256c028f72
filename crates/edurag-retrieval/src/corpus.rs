//! Corpus building: document registration, normalization, and chunking.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use edurag_core::error::{EduragError, Result};
use edurag_core::models::{Chunk, DocEntry, DocId, DocType, Document, DocumentSource};
use edurag_core::normalize::normalize;
use edurag_core::processing::Chunker;

/// Builds a chunk corpus from raw course documents
pub struct CorpusBuilder {
    chunker: Chunker,
}

/// Result of corpus building
#[derive(Debug, Clone)]
pub struct BuiltCorpus {
    /// Registered documents with normalized text
    pub documents: Vec<Document>,

    /// Registry entries in registration order
    pub doc_entries: Vec<DocEntry>,

    /// Normalized full texts by registry id
    pub doc_texts: HashMap<DocId, String>,

    /// Derived chunks, ids running across documents
    pub chunks: Vec<Chunk>,

    /// Deterministic hash over documents, chunks, and chunker settings
    pub corpus_hash: String,
}

impl CorpusBuilder {
    /// Create a new corpus builder
    pub fn new(chunker: Chunker) -> Self {
        Self { chunker }
    }

    /// Register and chunk course documents.
    ///
    /// Knowledge documents get ids `K1..`, style documents `S1..`, in the
    /// order supplied. At least one of each is required: knowledge grounds
    /// citations, style feeds the solutions bank.
    pub fn build(
        &self,
        knowledge: &[DocumentSource],
        style: &[DocumentSource],
    ) -> Result<BuiltCorpus> {
        if knowledge.is_empty() {
            return Err(EduragError::MissingDocuments { doc_type: "knowledge".to_string() });
        }
        if style.is_empty() {
            return Err(EduragError::MissingDocuments { doc_type: "style".to_string() });
        }

        let mut documents = Vec::with_capacity(knowledge.len() + style.len());
        for (doc_type, sources) in [(DocType::Knowledge, knowledge), (DocType::Style, style)] {
            for (idx, source) in sources.iter().enumerate() {
                documents.push(Document {
                    id: DocId(format!("{}{}", doc_type.prefix(), idx + 1)),
                    doc_type,
                    name: source.name.clone(),
                    text: normalize(&source.text),
                });
            }
        }

        let mut chunks = Vec::new();
        let mut next_id = 0u64;
        for doc in &documents {
            chunks.extend(self.chunker.chunk_document(doc, &mut next_id));
        }

        let doc_entries = documents
            .iter()
            .map(|doc| DocEntry {
                doc_id: doc.id.clone(),
                doc_type: doc.doc_type,
                name: doc.name.clone(),
                pages: max_page_for_doc(&chunks, &doc.id),
            })
            .collect();

        let doc_texts: HashMap<DocId, String> =
            documents.iter().map(|doc| (doc.id.clone(), doc.text.clone())).collect();

        let corpus_hash = self.corpus_hash(&documents, &chunks);

        tracing::info!(
            documents = documents.len(),
            chunks = chunks.len(),
            hash = %corpus_hash,
            "built corpus"
        );

        Ok(BuiltCorpus { documents, doc_entries, doc_texts, chunks, corpus_hash })
    }

    /// Deterministic hash over the corpus contents and chunker settings
    fn corpus_hash(&self, documents: &[Document], chunks: &[Chunk]) -> String {
        let mut hasher = DefaultHasher::new();

        for doc in documents {
            doc.id.0.hash(&mut hasher);
            doc.text.hash(&mut hasher);
        }

        for chunk in chunks {
            chunk.id.0.hash(&mut hasher);
            chunk.text.hash(&mut hasher);
            chunk.anchor.offset.hash(&mut hasher);
        }

        self.chunker.chunk_size.hash(&mut hasher);
        self.chunker.overlap.hash(&mut hasher);

        format!("{:016x}", hasher.finish())
    }
}

fn max_page_for_doc(chunks: &[Chunk], doc_id: &DocId) -> Option<u32> {
    chunks
        .iter()
        .filter(|c| &c.doc_id == doc_id)
        .filter_map(|c| c.anchor.page)
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str, text: &str) -> DocumentSource {
        DocumentSource { name: name.to_string(), text: text.to_string() }
    }

    #[test]
    fn test_build_assigns_registry_ids() {
        let builder = CorpusBuilder::new(Chunker::new(50, 10).unwrap());
        let corpus = builder
            .build(
                &[source("מחברת.txt", "PAGE: 1\nחומר ידע ראשון"), source("סיכום.txt", "עוד חומר")],
                &[source("מבחן.txt", "בחינה פתורה")],
            )
            .unwrap();

        let ids: Vec<&str> = corpus.doc_entries.iter().map(|e| e.doc_id.0.as_str()).collect();
        assert_eq!(ids, vec!["K1", "K2", "S1"]);
        assert_eq!(corpus.doc_entries[0].pages, Some(1));
        assert_eq!(corpus.doc_entries[1].pages, None);
    }

    #[test]
    fn test_build_requires_both_document_types() {
        let builder = CorpusBuilder::new(Chunker::default());

        let err = builder.build(&[], &[source("s", "x")]).unwrap_err();
        assert!(matches!(err, EduragError::MissingDocuments { ref doc_type } if doc_type == "knowledge"));

        let err = builder.build(&[source("k", "x")], &[]).unwrap_err();
        assert!(matches!(err, EduragError::MissingDocuments { ref doc_type } if doc_type == "style"));
    }

    #[test]
    fn test_chunk_ids_unique_across_documents() {
        let builder = CorpusBuilder::new(Chunker::new(10, 2).unwrap());
        let corpus = builder
            .build(
                &[source("k1", "אחת שתיים שלוש ארבע חמש"), source("k2", "שש שבע שמונה תשע עשר")],
                &[source("s1", "פתרון לדוגמה כלשהו")],
            )
            .unwrap();

        let mut ids: Vec<u64> = corpus.chunks.iter().map(|c| c.id.0).collect();
        let before = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn test_corpus_hash_is_deterministic_and_content_sensitive() {
        let builder = CorpusBuilder::new(Chunker::new(50, 10).unwrap());
        let knowledge = [source("k", "חומר ידע")];
        let style = [source("s", "פתרון")];

        let first = builder.build(&knowledge, &style).unwrap();
        let second = builder.build(&knowledge, &style).unwrap();
        assert_eq!(first.corpus_hash, second.corpus_hash);

        let changed = builder.build(&[source("k", "חומר אחר")], &style).unwrap();
        assert_ne!(first.corpus_hash, changed.corpus_hash);
    }

    #[test]
    fn test_doc_texts_are_normalized() {
        let builder = CorpusBuilder::new(Chunker::default());
        let corpus = builder
            .build(&[source("k", "  רווחים \u{200F} מיותרים  ")], &[source("s", "פתרון")])
            .unwrap();

        assert_eq!(corpus.doc_texts[&DocId("K1".to_string())], "רווחים מיותרים");
    }
}
