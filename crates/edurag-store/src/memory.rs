//! In-memory storage implementations for development and testing.
//!
//! These implementations use `RwLock::unwrap()` intentionally. Lock poisoning
//! only occurs when another thread panicked while holding the lock, which is
//! an unrecoverable state. For durable storage, persist bundles to disk with
//! the `persist` module.

use async_trait::async_trait;
use edurag_core::error::{EduragError, Result};
use edurag_core::models::{Chunk, ChunkId, CourseBundle, TrainerResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ports::{BundleStore, CorpusStore};

/// In-memory implementation of CorpusStore
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpusStore {
    chunks: Arc<RwLock<Vec<Chunk>>>,
}

impl MemoryCorpusStore {
    /// Create a new in-memory corpus store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CorpusStore for MemoryCorpusStore {
    async fn replace_chunks(&self, chunks: Vec<Chunk>) -> Result<()> {
        // Whole-corpus swap under the write lock; readers never see a
        // half-rebuilt corpus.
        let mut store = self.chunks.write().unwrap();
        *store = chunks;
        Ok(())
    }

    async fn all_chunks(&self) -> Result<Vec<Chunk>> {
        let chunks = self.chunks.read().unwrap();
        Ok(chunks.clone())
    }

    async fn get_chunk(&self, id: ChunkId) -> Result<Option<Chunk>> {
        let chunks = self.chunks.read().unwrap();
        Ok(chunks.iter().find(|c| c.id == id).cloned())
    }

    async fn chunk_count(&self) -> Result<usize> {
        let chunks = self.chunks.read().unwrap();
        Ok(chunks.len())
    }
}

/// In-memory implementation of BundleStore
#[derive(Debug, Clone, Default)]
pub struct MemoryBundleStore {
    bundles: Arc<RwLock<HashMap<String, CourseBundle>>>,
}

impl MemoryBundleStore {
    /// Create a new in-memory bundle store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BundleStore for MemoryBundleStore {
    async fn put_bundle(&self, bundle: CourseBundle) -> Result<()> {
        let mut bundles = self.bundles.write().unwrap();
        bundles.insert(bundle.meta.course_id.clone(), bundle);
        Ok(())
    }

    async fn get_bundle(&self, course_id: &str) -> Result<Option<CourseBundle>> {
        let bundles = self.bundles.read().unwrap();
        Ok(bundles.get(course_id).cloned())
    }

    async fn list_courses(&self) -> Result<Vec<String>> {
        let bundles = self.bundles.read().unwrap();
        let mut courses: Vec<String> = bundles.keys().cloned().collect();
        courses.sort();
        Ok(courses)
    }

    async fn set_last_result(&self, course_id: &str, result: TrainerResult) -> Result<()> {
        let mut bundles = self.bundles.write().unwrap();
        let bundle = bundles.get_mut(course_id).ok_or(EduragError::BundleNotBuilt)?;
        bundle.last_result = Some(result);
        Ok(())
    }

    async fn delete_bundle(&self, course_id: &str) -> Result<()> {
        let mut bundles = self.bundles.write().unwrap();
        bundles.remove(course_id);
        Ok(())
    }
}
