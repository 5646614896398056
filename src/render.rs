//! Rendering a value tree back to YAML text.
//!
//! Rendering is the inverse of [`parse`](crate::parse): echoed tags are
//! re-emitted exactly as they came in, registered tags run their render hook,
//! and unresolved references (deferred or in flight) are written back as
//! `!tag raw`, so an unresolved tree survives a save/load cycle without
//! losing information.

use serde_yaml::Value as Yaml;
use serde_yaml::value::{Tag, TaggedValue as YamlTagged};

use crate::error::{Result, WeaveError};
use crate::registry::TagRegistry;
use crate::value::Value;

/// Renders `value` as a YAML document string.
///
/// Mapping order is preserved. For registered tags the render hook's output
/// must have the kind the tag was declared with; this is the one place
/// payload shape is enforced, parsing never rejects a mismatched payload.
///
/// # Errors
///
/// Returns [`WeaveError::ShapeMismatch`] when a registered tag's rendered
/// payload has the wrong kind, [`WeaveError::Parse`] if the tree cannot be
/// serialized, and any error a render hook returns.
pub fn render(value: &Value, registry: &TagRegistry) -> Result<String> {
    let yaml = to_yaml(value, registry)?;
    Ok(serde_yaml::to_string(&yaml)?)
}

fn to_yaml(value: &Value, registry: &TagRegistry) -> Result<Yaml> {
    match value {
        Value::Null => Ok(Yaml::Null),
        Value::Bool(b) => Ok(Yaml::Bool(*b)),
        Value::Number(n) => Ok(Yaml::Number(n.clone())),
        Value::String(s) => Ok(Yaml::String(s.clone())),
        Value::Sequence(items) => {
            let items = items
                .iter()
                .map(|item| to_yaml(item, registry))
                .collect::<Result<Vec<_>>>()?;
            Ok(Yaml::Sequence(items))
        }
        Value::Mapping(map) => {
            let mut out = serde_yaml::Mapping::with_capacity(map.len());
            for (key, value) in map {
                out.insert(Yaml::String(key.clone()), to_yaml(value, registry)?);
            }
            Ok(Yaml::Mapping(out))
        }
        Value::Tagged(tagged) => {
            let emitted = match registry.get(&tagged.tag) {
                Some(tag_type) => {
                    let emitted = tag_type.render(&tagged.value)?;
                    if emitted.kind() != tag_type.kind() {
                        return Err(WeaveError::ShapeMismatch {
                            tag: tagged.tag.clone(),
                            expected: tag_type.kind().to_string(),
                            actual: emitted.kind().to_string(),
                        });
                    }
                    emitted
                }
                None => tagged.value.clone(),
            };
            Ok(tag_wrap(&tagged.tag, to_yaml(&emitted, registry)?))
        }
        Value::Reference(reference) => {
            Ok(tag_wrap(reference.tag(), Yaml::String(reference.raw().to_string())))
        }
        Value::Pending(pending) => {
            let reference = pending.reference();
            Ok(tag_wrap(reference.tag(), Yaml::String(reference.raw().to_string())))
        }
    }
}

/// Wraps `value` in a YAML tag. An empty tag name cannot be written, so the
/// payload is emitted plain.
fn tag_wrap(tag: &str, value: Yaml) -> Yaml {
    if tag.is_empty() {
        return value;
    }
    Yaml::Tagged(Box::new(YamlTagged {
        tag: Tag::new(tag),
        value,
    }))
}
