//! Integration test suite for yamlweave
//!
//! End-to-end coverage of the public API and the `yamlweave` binary.
//!
//! # Running
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **resolution**: cross-document reference resolution, session caching,
//!   concurrency, and cycle detection
//! - **round_trip**: parse/render fidelity for custom tags, references, and
//!   key order, plus the JSON conversion boundary
//! - **documents**: extension rules, front matter assembly, and directory
//!   config discovery against a real filesystem
//! - **cli**: the binary's resolve/render/split commands

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod documents;
mod resolution;
mod round_trip;
