//! Session-scoped deduplication of document loads.
//!
//! Every resolution session owns one [`SessionCache`]. Each document path
//! maps to a [`DocEntry`] with two lazily filled slots: the shared raw-text
//! read and the shared load (read, parse, resolve). Splitting the two lets
//! many references to one document share a single source read even while the
//! parsed tree is still being resolved, and it is what makes reference
//! fan-out cheap: a document referenced fifty times is read and parsed once.
//!
//! The cache lives exactly as long as its session. Dropping it between
//! sessions is what gives edits a chance to be observed: the next
//! [`resolve_all`](crate::resolve_all) call re-reads every document.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

use crate::error::Result;
use crate::reference::SharedLoad;
use crate::value::Value;

/// Shared future for a document's raw text.
pub(crate) type SharedRead = Shared<BoxFuture<'static, Result<String>>>;

/// Per-session map from document path to its memoized load slots.
#[derive(Debug, Default)]
pub(crate) struct SessionCache {
    entries: DashMap<String, Arc<DocEntry>>,
}

impl SessionCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `path`, creating an empty one on first access.
    pub(crate) fn entry(&self, path: &str) -> Arc<DocEntry> {
        if let Some(entry) = self.entries.get(path) {
            return Arc::clone(&entry);
        }
        Arc::clone(&self.entries.entry(path.to_string()).or_default())
    }

    /// Number of distinct documents touched so far.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Drops every entry. Load futures capture the session that owns this
    /// cache, so clearing at the end of a session breaks that reference
    /// cycle and lets the futures be freed.
    pub(crate) fn clear(&self) {
        self.entries.clear();
    }
}

/// Memoized slots for one document.
#[derive(Debug, Default)]
pub(crate) struct DocEntry {
    read: OnceLock<SharedRead>,
    load: OnceLock<SharedLoad>,
}

impl DocEntry {
    /// The shared raw-text read for this document, built by `init` on the
    /// first call and reused afterwards. Nothing runs until the returned
    /// future is polled.
    pub(crate) fn read_or_init(
        &self,
        init: impl FnOnce() -> BoxFuture<'static, Result<String>>,
    ) -> SharedRead {
        self.read.get_or_init(|| init().shared()).clone()
    }

    /// The shared load (read, parse, resolve) for this document, built by
    /// `init` on the first call and reused afterwards.
    pub(crate) fn load_or_init(
        &self,
        init: impl FnOnce() -> BoxFuture<'static, Result<Value>>,
    ) -> SharedLoad {
        self.load.get_or_init(|| init().shared()).clone()
    }
}
