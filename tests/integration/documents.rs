//! Document assembly against a real filesystem: extension rules, front
//! matter, resolution inside fields, and directory config discovery.

use std::sync::Arc;

use tempfile::TempDir;
use yamlweave::{
    ContentSource, LocalSource, TagRegistry, Value, discover_config, read_document, resolve_all,
};

use crate::common;

fn local_fixture(files: &[(&str, &str)]) -> (TempDir, Arc<LocalSource>, TagRegistry) {
    let dir = TempDir::new().expect("temp dir");
    common::write_tree(dir.path(), files);
    let source = Arc::new(LocalSource::new(dir.path()));
    let registry = TagRegistry::builder()
        .source(source.clone())
        .build()
        .expect("registry");
    (dir, source, registry)
}

#[tokio::test]
async fn test_markdown_document_resolves_and_writes_back() {
    let (_dir, source, registry) = local_fixture(&[
        (
            "pages/about.md",
            "---\ntitle: About\nyear: !ref /partials/footer.yaml?year\n---\n# About us\n",
        ),
        ("partials/footer.yaml", "year: 2024\n"),
    ]);

    let mut document = read_document(source.as_ref(), "/pages/about.md", &registry)
        .await
        .unwrap();
    assert!(document.fields.get("year").is_some_and(Value::is_reference));

    document.fields = resolve_all(std::mem::take(&mut document.fields), &registry)
        .await
        .unwrap();

    assert_eq!(
        document.to_text(&registry).unwrap(),
        "---\ntitle: About\nyear: 2024\n---\n# About us\n"
    );
}

#[tokio::test]
async fn test_extension_rules_on_the_filesystem() {
    let (_dir, source, registry) = local_fixture(&[
        ("data.yaml", "a: 1\nb: two\n"),
        ("notes.txt", "plain text\nwith lines\n"),
    ]);

    let fields_only = read_document(source.as_ref(), "/data.yaml", &registry)
        .await
        .unwrap();
    assert_eq!(fields_only.fields.get("a").and_then(Value::as_i64), Some(1));
    assert_eq!(fields_only.body, None);

    let body_only = read_document(source.as_ref(), "/notes.txt", &registry)
        .await
        .unwrap();
    assert!(body_only.fields.is_null());
    assert_eq!(body_only.body.as_deref(), Some("plain text\nwith lines\n"));
    // Body-only files write back untouched.
    assert_eq!(
        body_only.to_text(&registry).unwrap(),
        "plain text\nwith lines\n"
    );
}

#[tokio::test]
async fn test_discover_config_prefers_the_nearest_directory() {
    let (_dir, source, registry) = local_fixture(&[
        ("_editor.yaml", "scope: site\n"),
        ("blog/_editor.yaml", "scope: blog\n"),
        ("blog/posts/first.md", "# First\n"),
        ("pages/about.md", "# About\n"),
    ]);

    let config = discover_config(source.as_ref(), "/blog/posts", &registry)
        .await
        .unwrap()
        .expect("blog config");
    assert_eq!(config.get("scope").and_then(Value::as_str), Some("blog"));

    let config = discover_config(source.as_ref(), "/pages", &registry)
        .await
        .unwrap()
        .expect("site config");
    assert_eq!(config.get("scope").and_then(Value::as_str), Some("site"));
}

#[tokio::test]
async fn test_discover_config_is_none_without_any_config() {
    let (_dir, source, registry) = local_fixture(&[("pages/about.md", "# About\n")]);

    let config = discover_config(source.as_ref(), "/pages", &registry)
        .await
        .unwrap();
    assert!(config.is_none());
}

#[tokio::test]
async fn test_config_references_resolve_against_the_same_root() {
    let (_dir, source, registry) = local_fixture(&[
        ("_editor.yaml", "fields: !ref /schema/fields.yaml\n"),
        ("schema/fields.yaml", "- title\n- body\n"),
    ]);

    let config = discover_config(source.as_ref(), "/pages", &registry)
        .await
        .unwrap()
        .expect("config with resolved fields");

    let fields = config.get("fields").and_then(Value::as_sequence).unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].as_str(), Some("title"));
}

#[tokio::test]
async fn test_listing_returns_root_relative_paths() {
    let (_dir, source, _registry) = local_fixture(&[
        ("pages/about.md", "# About\n"),
        ("pages/blog/first.md", "# First\n"),
        ("data.yaml", "a: 1\n"),
    ]);

    let all = source.list("/").await.unwrap();
    assert_eq!(all, ["/data.yaml", "/pages/about.md", "/pages/blog/first.md"]);

    let pages = source.list("/pages").await.unwrap();
    assert_eq!(pages, ["/pages/about.md", "/pages/blog/first.md"]);
}
