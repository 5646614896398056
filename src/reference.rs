//! Deferred reference placeholders.
//!
//! A deferred tag such as `!ref /content/other.yaml?meta.title` parses into a
//! [`DocReference`]: the tag name plus the raw reference text, split into a
//! document path (before the first `?`) and an optional projection subpath
//! (after it). Constructing one performs no I/O and no validation beyond the
//! syntactic split; whether the document exists or the subpath leads anywhere
//! is only known at resolution time.
//!
//! During resolution a placeholder becomes a [`PendingValue`]: the same
//! reference plus a shared, lazily-started future that yields the referenced
//! (and projected) value. The future is [`Shared`], so every placeholder
//! naming the same document awaits one underlying load.

use std::fmt;

use futures::future::{BoxFuture, Shared};

use crate::error::Result;
use crate::value::Value;

/// A load future that can be awaited from many placeholders at once.
pub(crate) type SharedLoad = Shared<BoxFuture<'static, Result<Value>>>;

/// An unresolved pointer to another document, optionally into a sub-path of
/// its value.
///
/// # Examples
///
/// ```rust
/// use yamlweave::DocReference;
///
/// let reference = DocReference::new("ref", "/content/home.yaml?meta.title");
/// assert_eq!(reference.document_path(), "/content/home.yaml");
/// assert_eq!(reference.projection(), "meta.title");
///
/// let whole = DocReference::new("ref", "/content/home.yaml");
/// assert_eq!(whole.projection(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocReference {
    tag: String,
    raw: String,
}

impl DocReference {
    /// Creates a reference from a tag name (leading `!` tolerated) and the
    /// raw reference text.
    pub fn new(tag: impl Into<String>, raw: impl Into<String>) -> Self {
        let tag: String = tag.into();
        Self {
            tag: tag.trim_start_matches('!').to_string(),
            raw: raw.into(),
        }
    }

    /// The tag this reference was written with, without the leading `!`.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The reference text exactly as written.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The document path: everything before the first `?`.
    #[must_use]
    pub fn document_path(&self) -> &str {
        match self.raw.split_once('?') {
            Some((path, _)) => path,
            None => &self.raw,
        }
    }

    /// The projection subpath: everything after the first `?`, or the empty
    /// string when no `?` is present. An empty projection selects the whole
    /// document value.
    #[must_use]
    pub fn projection(&self) -> &str {
        match self.raw.split_once('?') {
            Some((_, subpath)) => subpath,
            None => "",
        }
    }
}

impl fmt::Display for DocReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!{} {}", self.tag, self.raw)
    }
}

/// A deferred reference whose document load is in flight.
///
/// Produced by resolution phase 1; consumed (awaited) by phase 2. Equality
/// and hashing consider only the reference, never the future's state.
#[derive(Clone)]
pub struct PendingValue {
    reference: DocReference,
    future: SharedLoad,
}

impl PendingValue {
    pub(crate) fn new(reference: DocReference, future: SharedLoad) -> Self {
        Self { reference, future }
    }

    /// The reference this pending value will resolve.
    #[must_use]
    pub fn reference(&self) -> &DocReference {
        &self.reference
    }

    /// Awaits the underlying load and projects the result.
    pub(crate) async fn wait(self) -> Result<Value> {
        self.future.await
    }
}

impl fmt::Debug for PendingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingValue").field("reference", &self.reference).finish_non_exhaustive()
    }
}

impl PartialEq for PendingValue {
    fn eq(&self, other: &Self) -> bool {
        self.reference == other.reference
    }
}
