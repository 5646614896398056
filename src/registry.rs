//! Custom tag types and the registry the engine parses and renders against.
//!
//! A [`TagType`] describes one custom YAML tag: its name (without the
//! leading `!`), the shape its payload takes on the wire, and optional
//! hooks run at the parse and render boundaries. The [`TagRegistry`]
//! collects tag types, the set of tag names that denote deferred document
//! references, and the [`ContentSource`] those references resolve against.
//!
//! # Parse and render behavior
//!
//! | tag                              | parse                       | render                      |
//! |----------------------------------|-----------------------------|-----------------------------|
//! | reference tag (`!ref` + aliases) | becomes `Value::Reference`  | re-emits `!tag raw`         |
//! | registered, payload kind matches | construct hook runs         | render hook runs, kind checked |
//! | registered, payload kind differs | passthrough echo            | `ShapeMismatch` error       |
//! | unknown                          | passthrough echo            | re-emitted untouched        |
//!
//! The passthrough echo preserves the tag name and payload structurally, so
//! a document full of tags the registry has never heard of still survives a
//! parse/render round trip.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use yamlweave::{MemorySource, TagKind, TagRegistry, TagType, Value};
//!
//! let source = Arc::new(MemorySource::new());
//! let registry = TagRegistry::builder()
//!     .source(source)
//!     .reference_tag("pod.yaml")
//!     .tag_type(TagType::new("money", TagKind::Scalar).with_construct(Ok))
//!     .build()
//!     .unwrap();
//!
//! assert!(registry.is_reference_tag("ref"));
//! assert!(registry.is_reference_tag("pod.yaml"));
//! assert!(registry.get("money").is_some());
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{Result, WeaveError};
use crate::source::ContentSource;
use crate::value::{TagKind, Value};

/// Hook applied to a registered tag's payload at parse time.
pub type ConstructFn = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// Hook applied to a registered tag's payload at render time.
pub type RenderFn = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;

/// One registered custom tag: name, payload kind, optional hooks.
#[derive(Clone)]
pub struct TagType {
    name: String,
    kind: TagKind,
    construct: Option<ConstructFn>,
    render: Option<RenderFn>,
}

impl TagType {
    /// Declares a tag type. A leading `!` on the name is tolerated and
    /// stripped.
    pub fn new(name: impl Into<String>, kind: TagKind) -> Self {
        let name: String = name.into();
        Self {
            name: name.trim_start_matches('!').to_string(),
            kind,
            construct: None,
            render: None,
        }
    }

    /// Sets the construct hook, run on the payload when a matching tagged
    /// node is parsed.
    #[must_use]
    pub fn with_construct<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.construct = Some(Arc::new(f));
        self
    }

    /// Sets the render hook, run on the stored payload when the node is
    /// rendered back to YAML.
    #[must_use]
    pub fn with_render<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(f));
        self
    }

    /// The tag name without the leading `!`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The payload shape this tag expects on the wire.
    #[must_use]
    pub const fn kind(&self) -> TagKind {
        self.kind
    }

    /// Runs the construct hook, or passes the payload through unchanged.
    pub(crate) fn construct(&self, payload: Value) -> Result<Value> {
        match &self.construct {
            Some(hook) => hook(payload),
            None => Ok(payload),
        }
    }

    /// Runs the render hook, or clones the stored payload.
    pub(crate) fn render(&self, payload: &Value) -> Result<Value> {
        match &self.render {
            Some(hook) => hook(payload),
            None => Ok(payload.clone()),
        }
    }
}

impl fmt::Debug for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagType")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("construct", &self.construct.is_some())
            .field("render", &self.render.is_some())
            .finish()
    }
}

/// The set of tag types, deferred-reference tag names, and the content
/// source documents resolve against.
///
/// Build one with [`TagRegistry::builder`]. The same registry is passed to
/// [`parse`](crate::parse), [`resolve_all`](crate::resolve_all), and
/// [`render`](crate::render), so a document keeps one consistent view of the
/// tag vocabulary through its whole life.
#[derive(Clone)]
pub struct TagRegistry {
    types: IndexMap<String, TagType>,
    reference_tags: Vec<String>,
    source: Option<Arc<dyn ContentSource>>,
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRegistry")
            .field("types", &self.types)
            .field("reference_tags", &self.reference_tags)
            .field("source", &self.source.is_some())
            .finish()
    }
}

impl TagRegistry {
    /// Starts a builder with the default deferred tag (`!ref`), no custom
    /// types, and no content source.
    #[must_use]
    pub fn builder() -> TagRegistryBuilder {
        TagRegistryBuilder::default()
    }

    /// Looks a registered tag type up by name (no leading `!`).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TagType> {
        self.types.get(name)
    }

    /// Returns `true` if `name` denotes a deferred document reference.
    #[must_use]
    pub fn is_reference_tag(&self, name: &str) -> bool {
        self.reference_tags.iter().any(|t| t == name)
    }

    /// The deferred-reference tag names, the default `ref` first.
    #[must_use]
    pub fn reference_tags(&self) -> &[String] {
        &self.reference_tags
    }

    /// The content source deferred references resolve against, if any.
    #[must_use]
    pub fn source(&self) -> Option<&Arc<dyn ContentSource>> {
        self.source.as_ref()
    }
}

impl Default for TagRegistry {
    /// A registry with only the default `!ref` tag and no source. Parsing
    /// and rendering work; resolving a reference fails with
    /// [`WeaveError::NoSource`].
    fn default() -> Self {
        Self {
            types: IndexMap::new(),
            reference_tags: vec!["ref".to_string()],
            source: None,
        }
    }
}

/// Builder for [`TagRegistry`]. Duplicate names are rejected at
/// [`build`](TagRegistryBuilder::build) time.
#[derive(Default)]
pub struct TagRegistryBuilder {
    types: Vec<TagType>,
    aliases: Vec<String>,
    source: Option<Arc<dyn ContentSource>>,
}

impl TagRegistryBuilder {
    /// Registers a custom tag type.
    #[must_use]
    pub fn tag_type(mut self, tag_type: TagType) -> Self {
        self.types.push(tag_type);
        self
    }

    /// Adds a deferred-reference tag alias alongside the default `!ref`.
    /// A leading `!` is tolerated and stripped.
    #[must_use]
    pub fn reference_tag(mut self, name: impl Into<String>) -> Self {
        let name: String = name.into();
        self.aliases.push(name.trim_start_matches('!').to_string());
        self
    }

    /// Attaches the content source deferred references resolve against.
    #[must_use]
    pub fn source(mut self, source: Arc<dyn ContentSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Builds the registry.
    ///
    /// # Errors
    ///
    /// Returns [`WeaveError::DuplicateTag`] if two tag types share a name,
    /// or a name is both a tag type and a reference tag.
    pub fn build(self) -> Result<TagRegistry> {
        let mut reference_tags = vec!["ref".to_string()];
        for alias in self.aliases {
            if !reference_tags.contains(&alias) {
                reference_tags.push(alias);
            }
        }

        let mut types = IndexMap::with_capacity(self.types.len());
        for tag_type in self.types {
            if reference_tags.iter().any(|t| *t == tag_type.name) {
                return Err(WeaveError::DuplicateTag { tag: tag_type.name });
            }
            let name = tag_type.name.clone();
            if types.insert(name.clone(), tag_type).is_some() {
                return Err(WeaveError::DuplicateTag { tag: name });
            }
        }

        Ok(TagRegistry {
            types,
            reference_tags,
            source: self.source,
        })
    }
}
