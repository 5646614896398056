//! Cross-document reference resolution end to end: splicing, projection,
//! session caching, concurrency, and cycle detection.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Barrier;
use tokio::time::timeout;
use yamlweave::{ContentSource, Result, Value, WeaveError, parse, render, resolve_all};

use crate::common;

#[tokio::test]
async fn test_resolves_scalar_and_whole_document_references() {
    let source = common::memory_source(&[("/other.yaml", "foo: bar\nbaz: 42\n")]);
    let registry = common::registry_for(source.clone());

    let tree = parse(
        "grow: !ref /other.yaml?baz\nall: !ref /other.yaml\n",
        &registry,
    )
    .unwrap();
    let resolved = resolve_all(tree, &registry).await.unwrap();

    assert_eq!(resolved.get("grow").and_then(Value::as_i64), Some(42));
    let all = resolved.get("all").expect("whole document splice");
    assert_eq!(all.get("foo").and_then(Value::as_str), Some("bar"));
    // Two references to the same document share one read.
    assert_eq!(source.reads_of("/other.yaml"), 1);
}

#[tokio::test]
async fn test_chained_references_resolve_through_documents() {
    let source = common::memory_source(&[
        ("/a.yaml", "value: !ref /b.yaml?inner\n"),
        ("/b.yaml", "inner: !ref /c.yaml?deep\n"),
        ("/c.yaml", "deep: bottom\n"),
    ]);
    let registry = common::registry_for(source.clone());

    let tree = parse("out: !ref /a.yaml?value\n", &registry).unwrap();
    let resolved = resolve_all(tree, &registry).await.unwrap();

    assert_eq!(resolved.get("out").and_then(Value::as_str), Some("bottom"));
    assert_eq!(source.read_count(), 3);
}

#[tokio::test]
async fn test_references_inside_sequences_resolve_in_place() {
    let source = common::memory_source(&[
        ("/a.yaml", "x: 1\n"),
        ("/b.yaml", "y: 2\n"),
    ]);
    let registry = common::registry_for(source.clone());

    let tree = parse(
        "items:\n  - !ref /a.yaml?x\n  - plain\n  - !ref /b.yaml?y\n",
        &registry,
    )
    .unwrap();
    let resolved = resolve_all(tree, &registry).await.unwrap();

    let items = resolved.get("items").and_then(Value::as_sequence).unwrap();
    assert_eq!(items[0].as_i64(), Some(1));
    assert_eq!(items[1].as_str(), Some("plain"));
    assert_eq!(items[2].as_i64(), Some(2));
}

#[tokio::test]
async fn test_projection_descends_mappings_and_sequences() {
    let source = common::memory_source(&[("/tree.yaml", "a:\n  b:\n    - first\n    - second\n")]);
    let registry = common::registry_for(source.clone());

    let tree = parse("pick: !ref /tree.yaml?a/b.1\n", &registry).unwrap();
    let resolved = resolve_all(tree, &registry).await.unwrap();

    assert_eq!(resolved.get("pick").and_then(Value::as_str), Some("second"));
}

#[tokio::test]
async fn test_key_order_is_preserved_through_resolution() {
    let source = common::memory_source(&[("/other.yaml", "baz: 42\n")]);
    let registry = common::registry_for(source.clone());

    let tree = parse("first: 1\nmiddle: !ref /other.yaml?baz\nlast: 3\n", &registry).unwrap();
    let resolved = resolve_all(tree, &registry).await.unwrap();

    assert_eq!(
        render(&resolved, &registry).unwrap(),
        "first: 1\nmiddle: 42\nlast: 3\n"
    );
}

#[tokio::test]
async fn test_reference_tag_aliases_resolve_like_ref() {
    let source = common::memory_source(&[("/other.yaml", "baz: 42\n")]);
    let registry = yamlweave::TagRegistry::builder()
        .source(source.clone())
        .reference_tag("import")
        .build()
        .unwrap();

    let tree = parse("conf: !import /other.yaml?baz\n", &registry).unwrap();
    let resolved = resolve_all(tree, &registry).await.unwrap();

    assert_eq!(resolved.get("conf").and_then(Value::as_i64), Some(42));
}

#[tokio::test]
async fn test_diamond_shared_document_is_read_once() {
    let source = common::memory_source(&[
        ("/a.yaml", "x: !ref /shared.yaml?n\n"),
        ("/b.yaml", "y: !ref /shared.yaml?n\n"),
        ("/shared.yaml", "n: 7\n"),
    ]);
    let registry = common::registry_for(source.clone());

    let tree = parse("left: !ref /a.yaml?x\nright: !ref /b.yaml?y\n", &registry).unwrap();
    let resolved = resolve_all(tree, &registry).await.unwrap();

    assert_eq!(resolved.get("left").and_then(Value::as_i64), Some(7));
    assert_eq!(resolved.get("right").and_then(Value::as_i64), Some(7));
    assert_eq!(source.reads_of("/shared.yaml"), 1);
}

#[tokio::test]
async fn test_sessions_do_not_share_caches() {
    let source = common::memory_source(&[("/other.yaml", "baz: 1\n")]);
    let registry = common::registry_for(source.clone());

    let tree = parse("grow: !ref /other.yaml?baz\n", &registry).unwrap();
    resolve_all(tree.clone(), &registry).await.unwrap();

    // An edit between sessions is observed by the next resolve.
    source.insert("/other.yaml", "baz: 2\n");
    let resolved = resolve_all(tree, &registry).await.unwrap();

    assert_eq!(resolved.get("grow").and_then(Value::as_i64), Some(2));
    assert_eq!(source.reads_of("/other.yaml"), 2);
}

/// A source that parks every read on a barrier: reads only complete if
/// enough of them are in flight at the same time.
struct GateSource {
    barrier: Barrier,
    documents: HashMap<String, String>,
}

impl GateSource {
    fn new(parties: usize, documents: &[(&str, &str)]) -> Self {
        Self {
            barrier: Barrier::new(parties),
            documents: documents
                .iter()
                .map(|(path, content)| (path.to_string(), content.to_string()))
                .collect(),
        }
    }
}

#[async_trait::async_trait]
impl ContentSource for GateSource {
    async fn read(&self, path: &str) -> Result<String> {
        self.barrier.wait().await;
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| WeaveError::NotFound {
                path: path.to_string(),
            })
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.documents.contains_key(path))
    }

    async fn list(&self, _prefix: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_sibling_references_load_concurrently() {
    // Neither read can finish unless both are in flight at once.
    let source = Arc::new(GateSource::new(
        2,
        &[("/a.yaml", "x: 1\n"), ("/b.yaml", "y: 2\n")],
    ));
    let registry = yamlweave::TagRegistry::builder()
        .source(source)
        .build()
        .unwrap();

    let tree = parse("a: !ref /a.yaml?x\nb: !ref /b.yaml?y\n", &registry).unwrap();
    let resolved = timeout(Duration::from_secs(5), resolve_all(tree, &registry))
        .await
        .expect("sibling loads should overlap, not serialize")
        .unwrap();

    assert_eq!(resolved.get("a").and_then(Value::as_i64), Some(1));
    assert_eq!(resolved.get("b").and_then(Value::as_i64), Some(2));
}

#[tokio::test]
async fn test_circular_documents_fail_instead_of_hanging() {
    let source = common::memory_source(&[
        ("/a.yaml", "x: !ref /b.yaml?y\n"),
        ("/b.yaml", "y: !ref /a.yaml?x\n"),
    ]);
    let registry = common::registry_for(source.clone());

    let tree = parse("out: !ref /a.yaml?x\n", &registry).unwrap();
    let err = timeout(Duration::from_secs(5), resolve_all(tree, &registry))
        .await
        .expect("cycle should be detected, not deadlock")
        .unwrap_err();

    match err {
        WeaveError::CircularReference { chain } => {
            assert!(chain.contains("/a.yaml"), "chain: {chain}");
            assert!(chain.contains("/b.yaml"), "chain: {chain}");
        }
        other => panic!("expected CircularReference, got {other:?}"),
    }
}

#[tokio::test]
async fn test_document_referencing_itself_fails() {
    let source = common::memory_source(&[("/a.yaml", "x: 1\nme: !ref /a.yaml?x\n")]);
    let registry = common::registry_for(source.clone());

    let tree = parse("out: !ref /a.yaml?me\n", &registry).unwrap();
    let err = timeout(Duration::from_secs(5), resolve_all(tree, &registry))
        .await
        .expect("self-reference should be detected, not deadlock")
        .unwrap_err();

    assert!(matches!(err, WeaveError::CircularReference { .. }));
}

#[tokio::test]
async fn test_missing_projection_names_the_failing_segment() {
    let source = common::memory_source(&[("/other.yaml", "foo: bar\n")]);
    let registry = common::registry_for(source.clone());

    let tree = parse("grow: !ref /other.yaml?nope\n", &registry).unwrap();
    let err = resolve_all(tree, &registry).await.unwrap_err();

    match err {
        WeaveError::MissingPath { path, segment } => {
            assert_eq!(path, "nope");
            assert_eq!(segment, "nope");
        }
        other => panic!("expected MissingPath, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_document_reports_not_found() {
    let source = common::memory_source(&[]);
    let registry = common::registry_for(source.clone());

    let tree = parse("grow: !ref /gone.yaml?x\n", &registry).unwrap();
    let err = resolve_all(tree, &registry).await.unwrap_err();

    assert!(err.is_not_found());
}
