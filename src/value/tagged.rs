//! Tagged values and payload kinds.

use std::fmt;

use crate::value::Value;

/// The YAML shape a tag's payload takes on the wire.
///
/// Registered tag types declare the kind they expect; rendering enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// Null, boolean, number, or string payloads.
    Scalar,
    /// Sequence payloads.
    Sequence,
    /// Mapping payloads.
    Mapping,
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.write_str("scalar"),
            Self::Sequence => f.write_str("sequence"),
            Self::Mapping => f.write_str("mapping"),
        }
    }
}

/// A value carrying a custom tag.
///
/// The tag name is stored without the leading `!`; it is re-attached when the
/// value is rendered. Unknown tags pass through parse and render untouched,
/// so documents using tags the registry has never heard of still round-trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedValue {
    /// Tag name without the leading `!`.
    pub tag: String,
    /// The payload under the tag.
    pub value: Value,
}

impl TaggedValue {
    /// Creates a tagged value, stripping any leading `!` from the tag name.
    pub fn new(tag: impl Into<String>, value: Value) -> Self {
        let tag: String = tag.into();
        Self {
            tag: tag.trim_start_matches('!').to_string(),
            value,
        }
    }
}
