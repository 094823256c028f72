use async_trait::async_trait;
use edurag_core::error::Result;
use edurag_core::models::{Chunk, ChunkId, CourseBundle, TrainerResult};

/// Port for chunk corpus storage operations
#[async_trait]
pub trait CorpusStore: Send + Sync {
    /// Replace the whole corpus with a freshly built chunk set
    async fn replace_chunks(&self, chunks: Vec<Chunk>) -> Result<()>;

    /// All chunks in id order
    async fn all_chunks(&self) -> Result<Vec<Chunk>>;

    /// Get a single chunk by ID
    async fn get_chunk(&self, id: ChunkId) -> Result<Option<Chunk>>;

    /// Number of chunks currently stored
    async fn chunk_count(&self) -> Result<usize>;
}

/// Port for course bundle storage
#[async_trait]
pub trait BundleStore: Send + Sync {
    /// Store or replace a course bundle
    async fn put_bundle(&self, bundle: CourseBundle) -> Result<()>;

    /// Retrieve a bundle by course id
    async fn get_bundle(&self, course_id: &str) -> Result<Option<CourseBundle>>;

    /// List stored course ids
    async fn list_courses(&self) -> Result<Vec<String>>;

    /// Attach the most recent grading result to a bundle
    async fn set_last_result(&self, course_id: &str, result: TrainerResult) -> Result<()>;

    /// Delete a bundle
    async fn delete_bundle(&self, course_id: &str) -> Result<()>;
}
