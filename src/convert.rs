//! Conversion between value trees and plain editor data.
//!
//! Content editors speak JSON, which has no tags. A tagged node crosses that
//! boundary as a two-field mapping, `{_type: <tag>, _data: <payload>}`, and
//! comes back the same way:
//!
//! - **demote** rewrites tagged nodes and references into `_type`/`_data`
//!   mappings, leaving a tree any JSON consumer can digest
//! - **promote** is the inverse: a mapping whose `_type` is a string becomes
//!   a reference (reference tag with string `_data`), a registered tag (its
//!   construct hook runs), or an echoed tag shaped by its `_data`
//!
//! Promotion treats `_data` as opaque, exactly like tag payloads everywhere
//! else in the engine, and discards any sibling keys next to `_type`.
//! [`from_json`] and [`to_json`] bundle these with the [`serde_json`]
//! boundary itself.

use crate::error::Result;
use crate::reference::DocReference;
use crate::registry::TagRegistry;
use crate::value::{Mapping, TaggedValue, Value};

/// Key naming the tag of a demoted node.
pub const TYPE_KEY: &str = "_type";
/// Key carrying the payload of a demoted node.
pub const DATA_KEY: &str = "_data";

/// Rewrites every `{_type, _data}` mapping in `value` back into a tagged
/// node or deferred reference.
///
/// A mapping participates only when its `_type` value is a string; anything
/// else is an ordinary mapping and is recursed into. Missing `_data` counts
/// as an empty payload.
///
/// # Errors
///
/// Propagates construct-hook failures for registered tags.
pub fn promote(value: Value, registry: &TagRegistry) -> Result<Value> {
    match value {
        Value::Mapping(mut map) => {
            let type_name = map.get(TYPE_KEY).and_then(Value::as_str).map(str::to_string);
            if let Some(name) = type_name {
                let data = map.remove(DATA_KEY);
                return promote_typed(name, data, registry);
            }
            let fields = map
                .into_iter()
                .map(|(key, value)| Ok((key, promote(value, registry)?)))
                .collect::<Result<Mapping>>()?;
            Ok(Value::Mapping(fields))
        }
        Value::Sequence(items) => {
            let items = items
                .into_iter()
                .map(|item| promote(item, registry))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Sequence(items))
        }
        leaf => Ok(leaf),
    }
}

fn promote_typed(name: String, data: Option<Value>, registry: &TagRegistry) -> Result<Value> {
    if registry.is_reference_tag(&name) {
        return match data {
            Some(Value::String(raw)) => Ok(Value::Reference(DocReference::new(name, raw))),
            // A reference needs a string; anything else stays an echo.
            other => Ok(TaggedValue::new(name, echo_payload(other)).into()),
        };
    }
    if let Some(tag_type) = registry.get(&name) {
        let stored = tag_type.construct(data.unwrap_or(Value::Null))?;
        return Ok(TaggedValue::new(name, stored).into());
    }
    Ok(TaggedValue::new(name, echo_payload(data)).into())
}

/// Payload for an echoed tag: absent or null `_data` becomes the empty
/// string, so the node keeps a scalar shape.
fn echo_payload(data: Option<Value>) -> Value {
    match data {
        Some(Value::Null) | None => Value::from(""),
        Some(other) => other,
    }
}

/// Rewrites every tagged node and reference in `value` into a
/// `{_type, _data}` mapping, recursing into payloads so the result is plain
/// data throughout.
///
/// Registered tags run their render hook first; shape is not enforced here,
/// only at [`render`](crate::render) time.
///
/// # Errors
///
/// Propagates render-hook failures.
pub fn demote(value: Value, registry: &TagRegistry) -> Result<Value> {
    match value {
        Value::Tagged(tagged) => {
            let TaggedValue { tag, value } = *tagged;
            let payload = match registry.get(&tag) {
                Some(tag_type) => tag_type.render(&value)?,
                None => value,
            };
            Ok(typed_mapping(tag, demote(payload, registry)?))
        }
        Value::Reference(reference) => {
            Ok(typed_mapping(reference.tag().to_string(), Value::from(reference.raw())))
        }
        Value::Pending(pending) => {
            let reference = pending.reference();
            Ok(typed_mapping(reference.tag().to_string(), Value::from(reference.raw())))
        }
        Value::Sequence(items) => {
            let items = items
                .into_iter()
                .map(|item| demote(item, registry))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Sequence(items))
        }
        Value::Mapping(map) => {
            let fields = map
                .into_iter()
                .map(|(key, value)| Ok((key, demote(value, registry)?)))
                .collect::<Result<Mapping>>()?;
            Ok(Value::Mapping(fields))
        }
        leaf => Ok(leaf),
    }
}

fn typed_mapping(tag: String, data: Value) -> Value {
    let mut map = Mapping::with_capacity(2);
    map.insert(TYPE_KEY, Value::from(tag));
    map.insert(DATA_KEY, data);
    Value::Mapping(map)
}

/// Converts editor JSON into a value tree, promoting `{_type, _data}`
/// mappings along the way.
///
/// # Errors
///
/// Propagates construct-hook failures for registered tags.
pub fn from_json(json: serde_json::Value, registry: &TagRegistry) -> Result<Value> {
    promote(plain_value(json), registry)
}

/// Converts a value tree into editor JSON, demoting tagged nodes and
/// references to `{_type, _data}` objects.
///
/// Key order is preserved. Non-finite floats have no JSON spelling and
/// become `null`, matching what `JSON.stringify` does.
///
/// # Errors
///
/// Propagates render-hook failures for registered tags.
pub fn to_json(value: &Value, registry: &TagRegistry) -> Result<serde_json::Value> {
    use serde_json::Value as Json;

    match value {
        Value::Null => Ok(Json::Null),
        Value::Bool(b) => Ok(Json::Bool(*b)),
        Value::Number(n) => Ok(number_to_json(n)),
        Value::String(s) => Ok(Json::String(s.clone())),
        Value::Sequence(items) => {
            let items = items
                .iter()
                .map(|item| to_json(item, registry))
                .collect::<Result<Vec<_>>>()?;
            Ok(Json::Array(items))
        }
        Value::Mapping(map) => {
            let mut object = serde_json::Map::with_capacity(map.len());
            for (key, value) in map {
                object.insert(key.clone(), to_json(value, registry)?);
            }
            Ok(Json::Object(object))
        }
        Value::Tagged(tagged) => {
            let payload = match registry.get(&tagged.tag) {
                Some(tag_type) => tag_type.render(&tagged.value)?,
                None => tagged.value.clone(),
            };
            Ok(typed_json(&tagged.tag, to_json(&payload, registry)?))
        }
        Value::Reference(reference) => {
            Ok(typed_json(reference.tag(), Json::String(reference.raw().to_string())))
        }
        Value::Pending(pending) => {
            let reference = pending.reference();
            Ok(typed_json(reference.tag(), Json::String(reference.raw().to_string())))
        }
    }
}

fn typed_json(tag: &str, data: serde_json::Value) -> serde_json::Value {
    let mut object = serde_json::Map::with_capacity(2);
    object.insert(TYPE_KEY.to_string(), serde_json::Value::String(tag.to_string()));
    object.insert(DATA_KEY.to_string(), data);
    serde_json::Value::Object(object)
}

fn plain_value(json: serde_json::Value) -> Value {
    use serde_json::Value as Json;

    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => Value::Number(yaml_number(n)),
        Json::String(s) => Value::String(s),
        Json::Array(items) => Value::Sequence(items.into_iter().map(plain_value).collect()),
        Json::Object(object) => {
            Value::Mapping(object.into_iter().map(|(key, value)| (key, plain_value(value))).collect())
        }
    }
}

fn yaml_number(n: serde_json::Number) -> serde_yaml::Number {
    if let Some(i) = n.as_i64() {
        serde_yaml::Number::from(i)
    } else if let Some(u) = n.as_u64() {
        serde_yaml::Number::from(u)
    } else {
        serde_yaml::Number::from(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn number_to_json(n: &serde_yaml::Number) -> serde_json::Value {
    use serde_json::Value as Json;

    if let Some(i) = n.as_i64() {
        Json::from(i)
    } else if let Some(u) = n.as_u64() {
        Json::from(u)
    } else {
        n.as_f64()
            .and_then(serde_json::Number::from_f64)
            .map_or(Json::Null, Json::Number)
    }
}
