//! The engine's value tree.
//!
//! [`Value`] is the in-memory representation of a parsed document. It mirrors
//! the YAML data model (null, bool, number, string, sequence, mapping) and
//! adds three variants of its own:
//!
//! - [`Value::Tagged`] preserves custom-tagged nodes, both the payloads of
//!   registered tag types and the structural echo of unknown tags.
//! - [`Value::Reference`] is the inert placeholder a deferred tag parses to.
//!   It carries the raw reference text and performs no I/O.
//! - [`Value::Pending`] is a reference whose resolution is in flight. It
//!   holds a shared future that yields the referenced value.
//!
//! The placeholder lifecycle is explicit data, not a runtime type test:
//!
//! ```text
//! parse            resolve_all phase 1        resolve_all phase 2
//! !ref a.yaml  ->  Value::Reference  ------>  Value::Pending  ------>  value
//! ```
//!
//! A fully resolved tree contains no `Reference` or `Pending` nodes.
//!
//! # Examples
//!
//! ```rust
//! use yamlweave::{Mapping, Value};
//!
//! let mut fields = Mapping::new();
//! fields.insert("title", Value::from("Home"));
//! fields.insert("weight", Value::from(3));
//! let doc = Value::Mapping(fields);
//!
//! assert_eq!(doc.get("title").and_then(Value::as_str), Some("Home"));
//! assert_eq!(doc.get("weight").and_then(Value::as_i64), Some(3));
//! ```

mod mapping;
mod tagged;

pub use mapping::Mapping;
pub use tagged::{TagKind, TaggedValue};

use crate::reference::{DocReference, PendingValue};

/// A parsed YAML value, possibly containing deferred references.
///
/// Numbers reuse [`serde_yaml::Number`], so integer/float distinctions and
/// YAML's special floats behave exactly as they do on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// YAML null.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Numeric scalar.
    Number(serde_yaml::Number),
    /// String scalar.
    String(String),
    /// Ordered list of values.
    Sequence(Vec<Value>),
    /// Insertion-ordered, string-keyed map.
    Mapping(Mapping),
    /// A custom-tagged node.
    Tagged(Box<TaggedValue>),
    /// A deferred reference that has not started resolving.
    Reference(DocReference),
    /// A deferred reference whose load is in flight.
    Pending(PendingValue),
}

impl Value {
    /// The YAML shape this value takes when rendered.
    ///
    /// Tagged nodes report their payload's shape; references and pending
    /// nodes render as tagged scalars, so they are scalars here.
    #[must_use]
    pub fn kind(&self) -> TagKind {
        match self {
            Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_) => TagKind::Scalar,
            Self::Sequence(_) => TagKind::Sequence,
            Self::Mapping(_) => TagKind::Mapping,
            Self::Tagged(tagged) => tagged.value.kind(),
            Self::Reference(_) | Self::Pending(_) => TagKind::Scalar,
        }
    }

    /// Returns `true` if this is [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if this is an unresolved [`Value::Reference`].
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }

    /// Returns `true` if this is an in-flight [`Value::Pending`].
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// The boolean if this is a bool scalar.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as `i64` if it is an integer scalar in range.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// The value as `u64` if it is a non-negative integer scalar in range.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    /// The value as `f64` if it is a numeric scalar.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// The string slice if this is a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The elements if this is a sequence.
    #[must_use]
    pub const fn as_sequence(&self) -> Option<&Vec<Value>> {
        match self {
            Self::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// Mutable elements if this is a sequence.
    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// The entries if this is a mapping.
    #[must_use]
    pub const fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Mutable entries if this is a mapping.
    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// The tagged node if this carries a custom tag.
    #[must_use]
    pub fn as_tagged(&self) -> Option<&TaggedValue> {
        match self {
            Self::Tagged(tagged) => Some(tagged),
            _ => None,
        }
    }

    /// The placeholder if this is an unresolved reference.
    #[must_use]
    pub const fn as_reference(&self) -> Option<&DocReference> {
        match self {
            Self::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    /// Looks `key` up if this is a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(key))
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<serde_yaml::Number> for Value {
    fn from(n: serde_yaml::Number) -> Self {
        Self::Number(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(seq: Vec<Value>) -> Self {
        Self::Sequence(seq)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Self::Mapping(map)
    }
}

impl From<TaggedValue> for Value {
    fn from(tagged: TaggedValue) -> Self {
        Self::Tagged(Box::new(tagged))
    }
}

impl From<DocReference> for Value {
    fn from(reference: DocReference) -> Self {
        Self::Reference(reference)
    }
}

macro_rules! from_number {
    ($($ty:ty)*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Self::Number(serde_yaml::Number::from(n))
                }
            }
        )*
    };
}

from_number!(i8 i16 i32 i64 isize u8 u16 u32 u64 usize f32 f64);
