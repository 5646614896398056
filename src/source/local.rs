//! Filesystem-backed content source.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use walkdir::WalkDir;

use crate::error::{Result, WeaveError};
use crate::source::ContentSource;

/// [`ContentSource`] serving documents from a directory tree on disk.
///
/// Document paths are slash-separated and relative to the root the source
/// was created with; a leading `/` is stripped. Paths containing `..`
/// segments are rejected so a reference can never name a file outside the
/// root, and paths handed back by [`list`](ContentSource::list) always use
/// forward slashes with a leading `/`, whatever the platform separator is.
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    /// Creates a source rooted at `root`. The directory is not required to
    /// exist yet; reads against a missing root report the document as not
    /// found.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory this source serves from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a document path onto the filesystem, confining it to the root.
    fn expand(&self, path: &str) -> Result<PathBuf> {
        let mut full = self.root.clone();
        for part in path.split('/') {
            if part == ".." {
                return Err(WeaveError::Source {
                    path: path.to_string(),
                    message: "path escapes the source root".to_string(),
                });
            }
            if part.is_empty() || part == "." {
                continue;
            }
            full.push(part);
        }
        Ok(full)
    }
}

#[async_trait]
impl ContentSource for LocalSource {
    async fn read(&self, path: &str) -> Result<String> {
        let full = self.expand(path)?;
        tracing::trace!(file = %full.display(), "reading local document");
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|err| WeaveError::from_io(path, &err))
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let full = self.expand(path)?;
        tokio::fs::try_exists(&full)
            .await
            .map_err(|err| WeaveError::from_io(path, &err))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let base = self.expand(prefix)?;
        if !base.is_dir() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&base)
            .follow_links(true)
            .into_iter()
            .filter_map(std::result::Result::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(&self.root).map_err(|err| {
                WeaveError::Source {
                    path: prefix.to_string(),
                    message: err.to_string(),
                }
            })?;
            let mut document = String::from("/");
            document.push_str(&relative.to_string_lossy().replace('\\', "/"));
            paths.push(document);
        }
        paths.sort();
        Ok(paths)
    }
}
