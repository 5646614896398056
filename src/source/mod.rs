//! Content sources: where documents are read from.
//!
//! A [`ContentSource`] hands back document text for the slash-separated
//! paths that references name. The resolver never touches the filesystem
//! directly; it goes through whichever source the registry was built with,
//! so the same document tree resolves identically against an in-memory
//! fixture ([`MemorySource`]) or a directory on disk ([`LocalSource`]).
//!
//! Paths are source-relative. A leading `/` is permitted and means the same
//! thing as its absence; `..` segments are rejected by sources that map paths
//! onto a real filesystem.

use async_trait::async_trait;

use crate::error::Result;

mod local;
mod memory;

pub use local::LocalSource;
pub use memory::MemorySource;

/// Backend that supplies document text by path.
///
/// Implementations must be cheap to share: the resolver clones the source
/// handle into every document-load future it spawns.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Reads the full text of the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`WeaveError::NotFound`](crate::WeaveError::NotFound) when no
    /// document exists at `path`, and
    /// [`WeaveError::Source`](crate::WeaveError::Source) for any other
    /// backend failure.
    async fn read(&self, path: &str) -> Result<String>;

    /// Reports whether a document exists at `path` without reading it.
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Lists the paths of every document under `prefix`, sorted.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;
}
