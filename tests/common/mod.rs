//! Common test utilities and fixtures for yamlweave integration tests.
//!
//! Consolidates the source/registry setup every test starts with, so test
//! bodies read as scenario, not plumbing.

// Allow dead code because these utilities are shared across test files and
// not every test file uses all of them
#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use yamlweave::{MemorySource, TagRegistry};

/// Builds an in-memory source preloaded with `documents`.
pub fn memory_source(documents: &[(&str, &str)]) -> Arc<MemorySource> {
    let source = MemorySource::new();
    for (path, content) in documents {
        source.insert(*path, *content);
    }
    Arc::new(source)
}

/// Builds a registry with the default `!ref` tag resolving against `source`.
pub fn registry_for(source: Arc<MemorySource>) -> TagRegistry {
    TagRegistry::builder()
        .source(source)
        .build()
        .expect("registry with only the default tag should build")
}

/// Writes `files` under `root`, creating parent directories as needed.
/// Paths may carry a leading `/`; they are taken relative to `root`.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full = root.join(path.trim_start_matches('/'));
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("fixture directory should be creatable");
        }
        fs::write(&full, content).expect("fixture file should be writable");
    }
}
