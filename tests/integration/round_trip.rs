//! Parse/render fidelity for custom tags, references, and key order, and
//! the JSON conversion boundary an editor would drive.

use yamlweave::{
    Mapping, TagKind, TagRegistry, TagType, Value, WeaveError, from_json, parse, render, to_json,
};

fn plain() -> TagRegistry {
    TagRegistry::default()
}

/// A `!money` tag that stores its scalar wrapped in a mapping and unwraps
/// it on the way out.
fn with_wrapping_money() -> TagRegistry {
    TagRegistry::builder()
        .tag_type(
            TagType::new("money", TagKind::Scalar)
                .with_construct(|payload| {
                    let mut structured = Mapping::new();
                    structured.insert("amount", payload);
                    Ok(Value::from(structured))
                })
                .with_render(|payload| Ok(payload.get("amount").cloned().unwrap_or(Value::Null))),
        )
        .build()
        .unwrap()
}

#[test]
fn test_unknown_tags_round_trip_byte_for_byte() {
    for text in [
        "kind: !pod.yaml website\n",
        "partial: !doc\n  fields:\n    title: Home\n",
        "a: 1\nnested:\n  deep: !custom thing\nz: last\n",
    ] {
        let tree = parse(text, &plain()).unwrap();
        assert_eq!(render(&tree, &plain()).unwrap(), text, "round trip of {text:?}");
    }
}

#[test]
fn test_tagged_sequences_round_trip_semantically() {
    let text = "items: !list\n- a\n- b\n";
    let tree = parse(text, &plain()).unwrap();
    let rendered = render(&tree, &plain()).unwrap();

    assert_eq!(parse(&rendered, &plain()).unwrap(), tree);
}

#[test]
fn test_reference_aliases_round_trip_with_their_own_tag() {
    let registry = TagRegistry::builder()
        .reference_tag("import")
        .build()
        .unwrap();

    let text = "conf: !import /shared/env.yaml?prod\n";
    let tree = parse(text, &registry).unwrap();

    assert!(tree.get("conf").is_some_and(Value::is_reference));
    assert_eq!(render(&tree, &registry).unwrap(), text);
}

#[test]
fn test_hooked_tags_round_trip_while_storing_structure() {
    let registry = with_wrapping_money();
    let text = "price: !money 12.5\n";

    let tree = parse(text, &registry).unwrap();
    let tagged = tree.get("price").and_then(Value::as_tagged).unwrap();
    assert_eq!(
        tagged.value.get("amount").and_then(Value::as_f64),
        Some(12.5)
    );

    assert_eq!(render(&tree, &registry).unwrap(), text);
}

#[test]
fn test_mismatched_payload_shapes_fail_only_at_render() {
    let registry = TagRegistry::builder()
        .tag_type(TagType::new("money", TagKind::Scalar))
        .build()
        .unwrap();

    // Parsing tolerates the mapping payload by echoing it.
    let tree = parse("m: !money\n  amount: 1\n", &registry).unwrap();
    assert!(tree.get("m").and_then(Value::as_tagged).is_some());

    let err = render(&tree, &registry).unwrap_err();
    match err {
        WeaveError::ShapeMismatch { tag, expected, actual } => {
            assert_eq!(tag, "money");
            assert_eq!(expected, "scalar");
            assert_eq!(actual, "mapping");
        }
        other => panic!("expected ShapeMismatch, got {other:?}"),
    }
}

#[test]
fn test_editor_save_cycle_preserves_tags_and_order() {
    let registry = TagRegistry::builder()
        .tag_type(TagType::new("money", TagKind::Scalar))
        .build()
        .unwrap();
    let text = "title: Home\nprice: !money 12.5\nlink: !ref /partials/foo.yaml?x\n";

    // Out to the editor as plain JSON...
    let tree = parse(text, &registry).unwrap();
    let mut json = to_json(&tree, &registry).unwrap();
    assert_eq!(
        json["price"],
        serde_json::json!({"_type": "money", "_data": 12.5})
    );
    assert_eq!(
        json["link"],
        serde_json::json!({"_type": "ref", "_data": "/partials/foo.yaml?x"})
    );

    // ...the editor changes one plain field...
    json["title"] = serde_json::json!("Updated");

    // ...and the save path restores tags, references, and key order.
    let restored = from_json(json, &registry).unwrap();
    assert_eq!(
        render(&restored, &registry).unwrap(),
        "title: Updated\nprice: !money 12.5\nlink: !ref /partials/foo.yaml?x\n"
    );
}

#[test]
fn test_deep_plain_structures_round_trip() {
    let text = "site:\n  nav:\n  - label: Home\n    href: /\n  - label: Blog\n    href: /blog\n  footer:\n    year: 2024\n";
    let tree = parse(text, &plain()).unwrap();

    assert_eq!(render(&tree, &plain()).unwrap(), text);
}
