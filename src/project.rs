//! Path projection into a value tree.
//!
//! A reference may carry a projection after its `?` separator, selecting a
//! fragment of the loaded document instead of the whole tree. Paths accept
//! both `.` and `/` as segment separators, so `a/b/1` and `a.b.1` address the
//! same node. Mapping segments select by key; sequence segments are decimal
//! indices counted from zero.

use crate::error::{Result, WeaveError};
use crate::value::Value;

/// Selects the fragment of `value` addressed by `path`, cloning it out.
///
/// Empty segments are skipped, so leading, trailing, and doubled separators
/// are harmless (`/a//b/` means `a/b`). An entirely empty path selects the
/// whole value.
///
/// # Errors
///
/// Returns [`WeaveError::MissingPath`] naming the first segment that cannot
/// be followed: an absent mapping key, an out-of-range or non-numeric
/// sequence index, or any segment applied to a scalar or tagged node.
///
/// # Examples
///
/// ```rust
/// use yamlweave::{project, TagRegistry, Value};
///
/// let tree = yamlweave::parse("a:\n  b:\n  - 10\n  - 20", &TagRegistry::default()).unwrap();
/// assert_eq!(project(&tree, "a/b/1").unwrap(), Value::from(20));
/// assert_eq!(project(&tree, "a.b.0").unwrap(), Value::from(10));
/// ```
pub fn project(value: &Value, path: &str) -> Result<Value> {
    let mut current = value;
    for segment in path.split(['.', '/']).filter(|segment| !segment.is_empty()) {
        current = step(current, segment).ok_or_else(|| WeaveError::MissingPath {
            path: path.to_string(),
            segment: segment.to_string(),
        })?;
    }
    Ok(current.clone())
}

fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Mapping(map) => map.get(segment),
        Value::Sequence(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => None,
    }
}
