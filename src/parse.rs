//! Parsing YAML text into a deferred value tree.
//!
//! Parsing is synchronous and performs no I/O. Custom tags decide what a
//! node becomes; everything else maps structurally, with mapping order
//! preserved.

use serde_yaml::Value as Yaml;

use crate::error::{Result, WeaveError};
use crate::reference::DocReference;
use crate::registry::TagRegistry;
use crate::value::{Mapping, TaggedValue, Value};

/// Parses YAML `text` into a [`Value`] tree.
///
/// Tags are interpreted against `registry`:
/// - a reference tag (`!ref` or a registered alias) with a string payload
///   becomes [`Value::Reference`], left deferred until
///   [`resolve_all`](crate::resolve_all)
/// - a registered tag whose payload has the declared kind runs its construct
///   hook and becomes [`Value::Tagged`]
/// - any other tag, unknown or registered with a payload of the wrong kind,
///   is echoed: kept as [`Value::Tagged`] with its payload untouched, so it
///   survives a later [`render`](crate::render)
///
/// Mapping keys are coerced to strings: booleans, numbers, and `null` take
/// their YAML spelling. Blank input parses to [`Value::Null`].
///
/// # Errors
///
/// Returns [`WeaveError::Parse`] for malformed YAML, for mapping keys that
/// are not scalars, and for construct hooks that fail.
pub fn parse(text: &str, registry: &TagRegistry) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    let yaml: Yaml = serde_yaml::from_str(text)?;
    from_yaml(yaml, registry)
}

fn from_yaml(yaml: Yaml, registry: &TagRegistry) -> Result<Value> {
    match yaml {
        Yaml::Null => Ok(Value::Null),
        Yaml::Bool(b) => Ok(Value::Bool(b)),
        Yaml::Number(n) => Ok(Value::Number(n)),
        Yaml::String(s) => Ok(Value::String(s)),
        Yaml::Sequence(items) => {
            let items = items
                .into_iter()
                .map(|item| from_yaml(item, registry))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Sequence(items))
        }
        Yaml::Mapping(map) => {
            let mut fields = Mapping::with_capacity(map.len());
            for (key, value) in map {
                fields.insert(key_text(key)?, from_yaml(value, registry)?);
            }
            Ok(Value::Mapping(fields))
        }
        Yaml::Tagged(tagged) => {
            let name = tagged.tag.to_string().trim_start_matches('!').to_string();
            if registry.is_reference_tag(&name) {
                return match tagged.value {
                    Yaml::String(raw) => Ok(Value::Reference(DocReference::new(name, raw))),
                    // A reference tag on a non-scalar payload is not a
                    // reference; echo it like any other tag.
                    other => Ok(TaggedValue::new(name, from_yaml(other, registry)?).into()),
                };
            }

            let payload = from_yaml(tagged.value, registry)?;
            match registry.get(&name) {
                Some(tag_type) if payload.kind() == tag_type.kind() => {
                    let stored = tag_type.construct(payload)?;
                    Ok(TaggedValue::new(name, stored).into())
                }
                _ => Ok(TaggedValue::new(name, payload).into()),
            }
        }
    }
}

fn key_text(key: Yaml) -> Result<String> {
    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Null => Ok("null".to_string()),
        other => Err(WeaveError::Parse {
            message: format!("unsupported mapping key: {other:?}"),
        }),
    }
}
