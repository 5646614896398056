//! In-memory content source for tests and embedding.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::{Result, WeaveError};
use crate::source::ContentSource;

/// Map-backed [`ContentSource`] that also counts every read it serves.
///
/// The read counter and read log make deduplication observable: a document
/// referenced many times in one resolution session must still show up here
/// exactly once.
#[derive(Debug, Default)]
pub struct MemorySource {
    documents: DashMap<String, String>,
    reads: AtomicUsize,
    read_log: Mutex<Vec<String>>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `content` at `path`, replacing any previous document.
    pub fn insert(&self, path: impl Into<String>, content: impl Into<String>) {
        self.documents.insert(path.into(), content.into());
    }

    /// Removes the document at `path`, if any.
    pub fn remove(&self, path: &str) {
        self.documents.remove(path);
    }

    /// Total number of reads served, hits and misses alike.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of reads that asked for `path`.
    #[must_use]
    pub fn reads_of(&self, path: &str) -> usize {
        self.read_log
            .lock()
            .unwrap()
            .iter()
            .filter(|read| read.as_str() == path)
            .count()
    }

    /// Every path read so far, in arrival order.
    #[must_use]
    pub fn read_log(&self) -> Vec<String> {
        self.read_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn read(&self, path: &str) -> Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.read_log.lock().unwrap().push(path.to_string());
        self.documents
            .get(path)
            .map(|content| content.clone())
            .ok_or_else(|| WeaveError::NotFound {
                path: path.to_string(),
            })
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.documents.contains_key(path))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut paths: Vec<String> = self
            .documents
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|path| path.starts_with(prefix))
            .collect();
        paths.sort();
        Ok(paths)
    }
}
