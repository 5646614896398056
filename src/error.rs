//! Error handling for yamlweave
//!
//! This module provides the error type shared by every layer of the engine,
//! from YAML parsing through asynchronous reference resolution. The design
//! follows two principles:
//! 1. **Strongly-typed errors** so callers can match on the exact failure
//! 2. **Cloneable errors** so a single failed document load can be replayed
//!    to every reference that awaited it
//!
//! # Why `Clone`?
//!
//! Document loads are deduplicated through [`futures::future::Shared`], which
//! hands the same output to every awaiter. That forces the error type (like
//! the success type) to be `Clone`, which is why every variant carries owned
//! strings rather than source errors. The underlying cause is folded into the
//! message at conversion time.
//!
//! # Error Categories
//!
//! - **Parsing**: [`WeaveError::Parse`] for malformed YAML text
//! - **Resolution**: [`WeaveError::NotFound`], [`WeaveError::MissingPath`],
//!   [`WeaveError::NoSource`], [`WeaveError::CircularReference`]
//! - **Rendering**: [`WeaveError::ShapeMismatch`]
//! - **Registration**: [`WeaveError::DuplicateTag`]
//! - **I/O**: [`WeaveError::Source`] for content source failures that are
//!   not a simple missing document
//!
//! # Examples
//!
//! ```rust,no_run
//! use yamlweave::{TagRegistry, WeaveError};
//!
//! let registry = TagRegistry::builder().build().unwrap();
//! match yamlweave::parse("a: [unclosed", &registry) {
//!     Ok(_) => println!("parsed"),
//!     Err(WeaveError::Parse { message }) => eprintln!("bad document: {message}"),
//!     Err(other) => eprintln!("unexpected: {other}"),
//! }
//! ```

use thiserror::Error;

/// Convenient result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WeaveError>;

/// The error type for all yamlweave operations.
///
/// Every variant carries owned data and the enum derives [`Clone`], because
/// resolution failures travel through shared futures to multiple awaiters.
///
/// # Examples
///
/// ```rust
/// use yamlweave::WeaveError;
///
/// let err = WeaveError::NotFound { path: "/missing.yaml".to_string() };
/// assert_eq!(err.to_string(), "document not found: /missing.yaml");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeaveError {
    /// YAML text could not be parsed into a value tree.
    ///
    /// # Fields
    /// - `message`: the parser's diagnostic, including line/column when the
    ///   underlying parser provides one
    #[error("failed to parse YAML: {message}")]
    Parse {
        /// The parser's diagnostic message
        message: String,
    },

    /// A referenced document does not exist in the content source.
    #[error("document not found: {path}")]
    NotFound {
        /// The document path that could not be read
        path: String,
    },

    /// A projection path did not lead to a value.
    ///
    /// Produced when a reference's subpath (or an explicit
    /// [`project`](crate::project) call) names a key or index that the
    /// target value does not contain, or descends into a scalar.
    ///
    /// # Fields
    /// - `path`: the full projection path as written
    /// - `segment`: the segment at which descent failed
    #[error("no value at path '{path}' (failed at segment '{segment}')")]
    MissingPath {
        /// The full projection path
        path: String,
        /// The segment that could not be followed
        segment: String,
    },

    /// A registered tag's payload does not have the declared YAML shape.
    ///
    /// Raised at render time, where shape is enforced. Parsing tolerates the
    /// mismatch by echoing the node untouched instead.
    #[error("tag '!{tag}' expects a {expected} payload, found {actual}")]
    ShapeMismatch {
        /// The tag whose payload was checked
        tag: String,
        /// The kind the tag was registered with
        expected: String,
        /// The kind the payload actually has
        actual: String,
    },

    /// Two tag types with the same name were registered.
    #[error("tag '!{tag}' is already registered")]
    DuplicateTag {
        /// The conflicting tag name
        tag: String,
    },

    /// A deferred reference was resolved against a registry that has no
    /// content source attached.
    #[error("cannot resolve '{reference}': registry has no content source")]
    NoSource {
        /// The raw reference text
        reference: String,
    },

    /// Deferred references form a cycle between documents.
    ///
    /// Without detection this would deadlock: each in-flight load would wait
    /// on the other forever. The chain lists the documents along the cycle,
    /// starting and ending with the same path.
    ///
    /// # Fields
    /// - `chain`: document paths along the cycle, rendered `a -> b -> a`
    #[error("circular reference: {chain}")]
    CircularReference {
        /// The document paths along the cycle
        chain: String,
    },

    /// A content source failed for a reason other than a missing document.
    #[error("content source error for '{path}': {message}")]
    Source {
        /// The path being accessed when the failure occurred
        path: String,
        /// Description of the underlying failure
        message: String,
    },
}

impl WeaveError {
    /// Builds a [`WeaveError::Source`] from an I/O error, mapping
    /// [`std::io::ErrorKind::NotFound`] to [`WeaveError::NotFound`] so
    /// missing documents are distinguishable from real I/O failures.
    pub fn from_io(path: &str, err: &std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_string(),
            }
        } else {
            Self::Source {
                path: path.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// Returns `true` for [`WeaveError::NotFound`].
    ///
    /// Config discovery walks up parent directories on exactly this error,
    /// so it gets a dedicated predicate.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_yaml::Error> for WeaveError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
        }
    }
}
