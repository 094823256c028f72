//! EduRAG Retrieval - Lexical retrieval and trainer orchestration
//!
//! This crate implements corpus building, keyword-overlap scoring, top-k
//! snippet retrieval, and the trainer pipeline that orchestrates profile
//! building and grading against the chat model.

pub mod corpus;
pub mod models;
pub mod pipeline;
pub mod retriever;
pub mod scorer;

pub use corpus::{BuiltCorpus, CorpusBuilder};
pub use models::{RetrievalOutcome, Snippet};
pub use pipeline::TrainerPipeline;
pub use retriever::retrieve;
pub use scorer::{score_text, tokenize};
