//! yamlweave - deferred-resolution YAML for content backends
//!
//! A conversion engine for YAML documents whose nodes defer to other
//! documents through custom tags. A field written as
//! `!ref /other.yaml?some.path` stays a placeholder through parsing, is
//! resolved on demand against a pluggable content source, and renders back
//! to the exact tag text it came from. Trees round-trip without losing
//! custom tags, key order, or front matter.
//!
//! # Pipeline
//!
//! Documents move through four stages, each usable on its own:
//!
//! 1. **Read**: [`read_document`] pulls a file from a [`ContentSource`] and
//!    splits it into YAML fields and a free-form body by extension
//!    (Markdown carries front matter, `.yaml` is all fields, anything else
//!    is all body).
//! 2. **Parse**: [`parse`] turns YAML text into a [`Value`] tree. Reference
//!    tags become [`Value::Reference`] placeholders; tags registered with a
//!    [`TagRegistry`] run their construct hooks; unknown tags are carried
//!    structurally so they survive a round trip.
//! 3. **Resolve**: [`resolve_all`] walks the tree, loads every referenced
//!    document through the registry's source, projects the requested
//!    subpath, and splices the result in place. Loads are deduplicated and
//!    run concurrently within one session; cycles between documents fail
//!    with the offending chain instead of deadlocking.
//! 4. **Render**: [`render`] emits YAML text, re-wrapping unresolved
//!    references and custom tags byte-for-byte.
//!
//! The [`convert`] module bridges the tree to JSON editors via `_type` /
//! `_data` mappings, and [`document`] adds front-matter assembly and
//! per-directory config discovery on top.
//!
//! # Core Modules
//!
//! - [`value`] - the `Value` tree: scalars, sequences, insertion-ordered
//!   mappings, tagged nodes, and deferred references
//! - [`registry`] - `TagType` hooks and the `TagRegistry` that owns them
//! - [`source`] - the async `ContentSource` seam with filesystem and
//!   in-memory implementations
//! - [`resolve`] - the two-phase, session-cached resolver
//! - [`parse`] / [`render`] - text to tree and back
//! - [`walk`] / [`project`] - the async tree walker and path projection the
//!   resolver is built from
//! - [`front_matter`] / [`document`] - sentinel splitting and
//!   extension-aware document assembly
//! - [`convert`] - JSON-safe promotion and demotion of tagged values
//! - [`cli`] - the `yamlweave` binary's command definitions
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use yamlweave::{ContentSource, MemorySource, TagRegistry, Value};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> yamlweave::Result<()> {
//! let source = Arc::new(MemorySource::new());
//! source.insert("/partials/footer.yaml", "copyright: 2024\nlinks:\n  - /about\n");
//! source.insert(
//!     "/pages/home.yaml",
//!     "title: Home\nfooter: !ref /partials/footer.yaml\nyear: !ref /partials/footer.yaml?copyright\n",
//! );
//!
//! let registry = TagRegistry::builder().source(source.clone()).build()?;
//!
//! let text = source.read("/pages/home.yaml").await?;
//! let tree = yamlweave::parse(&text, &registry)?;
//! let resolved = yamlweave::resolve_all(tree, &registry).await?;
//!
//! assert_eq!(resolved.get("year").and_then(Value::as_i64), Some(2024));
//! assert!(resolved.get("footer").and_then(|v| v.get("links")).is_some());
//! // The footer document was read once, not once per reference.
//! assert_eq!(source.reads_of("/partials/footer.yaml"), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Every fallible operation returns [`Result`] with the [`WeaveError`] enum.
//! Errors are `Clone` because a failed document load is replayed to every
//! reference that awaited it.

pub mod cli;
pub mod convert;
pub mod document;
pub mod error;
pub mod front_matter;
pub mod parse;
pub mod project;
pub mod reference;
pub mod registry;
pub mod render;
pub mod resolve;
pub mod source;
pub mod value;
pub mod walk;

mod cache;

pub use convert::{demote, from_json, promote, to_json};
pub use document::{Document, discover_config, read_document, split_document};
pub use error::{Result, WeaveError};
pub use front_matter::DocumentParts;
pub use parse::parse;
pub use project::project;
pub use reference::{DocReference, PendingValue};
pub use registry::{TagRegistry, TagRegistryBuilder, TagType};
pub use render::render;
pub use resolve::resolve_all;
pub use source::{ContentSource, LocalSource, MemorySource};
pub use value::{Mapping, TagKind, TaggedValue, Value};
pub use walk::walk;
