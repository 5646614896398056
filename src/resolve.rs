//! Two-phase resolution of deferred references.
//!
//! Resolution happens inside a session that owns a document cache and a
//! wait-for graph. Every tree, the caller's and each loaded document's, is
//! processed in two walks:
//!
//! 1. **start**: each [`Value::Reference`] is swapped for a
//!    [`Value::Pending`] carrying a shared, lazily-started load future. No
//!    awaiting happens, so every reference in the tree is registered before
//!    any I/O begins.
//! 2. **wait**: each pending node is awaited and the projected value is
//!    spliced in its place. The walk joins siblings concurrently, which is
//!    where independent document reads actually overlap.
//!
//! Loaded documents go through the same two phases recursively, within the
//! same session, so a chain of references across documents keeps sharing one
//! cache. Cycles between document loads would otherwise deadlock quietly
//! inside the shared futures; the session's wait-for graph catches them at
//! edge-insertion time and fails with the offending chain instead.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::cache::{DocEntry, SessionCache};
use crate::error::{Result, WeaveError};
use crate::parse::parse;
use crate::project::project;
use crate::reference::{DocReference, PendingValue};
use crate::registry::TagRegistry;
use crate::source::ContentSource;
use crate::value::Value;
use crate::walk::walk;

/// Resolves every deferred reference in `value`, returning the fully spliced
/// tree.
///
/// All loading happens within one session: a document referenced from many
/// places is read, parsed, and resolved exactly once, and every reference to
/// it shares the outcome, failure included. The session cache dies with this
/// call, so a later call re-reads the source and observes any edits.
///
/// Independent references are loaded concurrently. Ordering of keys and
/// sequence elements in the returned tree is unchanged.
///
/// # Errors
///
/// Returns [`WeaveError::NoSource`] when `registry` carries no content
/// source, [`WeaveError::NotFound`] or [`WeaveError::Source`] for unreadable
/// documents, [`WeaveError::Parse`] for unparsable ones,
/// [`WeaveError::MissingPath`] when a projection selects nothing, and
/// [`WeaveError::CircularReference`] when document loads form a cycle.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use yamlweave::{MemorySource, TagRegistry, Value};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> yamlweave::Result<()> {
/// let source = Arc::new(MemorySource::new());
/// source.insert("/other.yaml", "baz: 42");
///
/// let registry = TagRegistry::builder().source(source).build()?;
/// let tree = yamlweave::parse("grow: !ref /other.yaml?baz", &registry)?;
/// let resolved = yamlweave::resolve_all(tree, &registry).await?;
///
/// assert_eq!(resolved.get("grow").and_then(Value::as_i64), Some(42));
/// # Ok(())
/// # }
/// ```
pub async fn resolve_all(value: Value, registry: &TagRegistry) -> Result<Value> {
    let session = Session::new(registry.clone());
    let result = session.resolve_tree(value, None).await;
    let documents = session.cache.len();
    // Load futures capture the session that owns the cache; dropping the
    // entries breaks that cycle once the session is over.
    session.cache.clear();
    tracing::debug!(documents, ok = result.is_ok(), "resolution session finished");
    result
}

/// One resolution session: registry, document cache, wait-for graph.
/// Cloning shares all three.
#[derive(Clone)]
struct Session {
    registry: Arc<TagRegistry>,
    cache: Arc<SessionCache>,
    waits: Arc<Mutex<WaitGraph>>,
}

impl Session {
    fn new(registry: TagRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            cache: Arc::new(SessionCache::new()),
            waits: Arc::new(Mutex::new(WaitGraph::default())),
        }
    }

    /// Resolves one document tree. `current` names the document the tree was
    /// parsed from, or `None` for the caller's top-level tree.
    fn resolve_tree(
        &self,
        value: Value,
        current: Option<String>,
    ) -> BoxFuture<'static, Result<Value>> {
        let session = self.clone();
        async move {
            let started = walk(value, move |node| {
                let outcome = match node {
                    Value::Reference(reference) => {
                        session.start(reference, current.as_deref()).map(Value::Pending)
                    }
                    other => Ok(other),
                };
                async move { outcome }
            })
            .await?;

            walk(started, |node| async move {
                match node {
                    Value::Pending(pending) => pending.wait().await,
                    other => Ok(other),
                }
            })
            .await
        }
        .boxed()
    }

    /// Phase-1 step for a single reference: joins the shared load for the
    /// referenced document, creating it if this is the first reference to
    /// that document, and attaches this reference's projection. Entirely
    /// synchronous; no I/O happens until the pending value is awaited.
    fn start(&self, reference: DocReference, current: Option<&str>) -> Result<PendingValue> {
        let Some(source) = self.registry.source().cloned() else {
            return Err(WeaveError::NoSource {
                reference: reference.raw().to_string(),
            });
        };

        let path = reference.document_path().to_string();
        if let Some(current) = current {
            self.waits.lock().unwrap().record(current, &path)?;
        }

        let entry = self.cache.entry(&path);
        let load = entry.load_or_init(|| self.load_future(&entry, source, &path));

        let projection = reference.projection().to_string();
        let pending = async move {
            let document = load.await?;
            project(&document, &projection)
        }
        .boxed()
        .shared();

        Ok(PendingValue::new(reference, pending))
    }

    /// Builds the load future for one document: reads its text through the
    /// shared read slot, parses it, then resolves its references within this
    /// same session.
    fn load_future(
        &self,
        entry: &DocEntry,
        source: Arc<dyn ContentSource>,
        path: &str,
    ) -> BoxFuture<'static, Result<Value>> {
        tracing::debug!(path = %path, "loading document");
        let read = entry.read_or_init(|| {
            let source = Arc::clone(&source);
            let path = path.to_string();
            async move { source.read(&path).await }.boxed()
        });

        let session = self.clone();
        let path = path.to_string();
        async move {
            let text = read.await?;
            let tree = parse(&text, &session.registry)?;
            session.resolve_tree(tree, Some(path)).await
        }
        .boxed()
    }
}

/// Wait-for graph between in-flight document loads.
///
/// An edge `from -> to` means the load of `from` awaits the load of `to`.
/// Shared-future deduplication makes that waiting invisible to any single
/// task, so cycles are caught here, at edge insertion, rather than left to
/// deadlock.
#[derive(Debug, Default)]
struct WaitGraph {
    edges: HashMap<String, Vec<String>>,
}

impl WaitGraph {
    /// Records that `from` awaits `to`, failing if the edge closes a cycle.
    fn record(&mut self, from: &str, to: &str) -> Result<()> {
        if from == to {
            return Err(WeaveError::CircularReference {
                chain: format!("{from} -> {to}"),
            });
        }
        if let Some(path) = self.path_between(to, from) {
            let mut chain = vec![from.to_string()];
            chain.extend(path);
            return Err(WeaveError::CircularReference {
                chain: chain.join(" -> "),
            });
        }

        let targets = self.edges.entry(from.to_string()).or_default();
        if !targets.iter().any(|target| target == to) {
            targets.push(to.to_string());
        }
        Ok(())
    }

    /// Depth-first search for a path from `start` to `goal`.
    fn path_between(&self, start: &str, goal: &str) -> Option<Vec<String>> {
        let mut stack = vec![vec![start.to_string()]];
        let mut visited = HashSet::new();
        while let Some(path) = stack.pop() {
            let Some(last) = path.last() else { continue };
            if last == goal {
                return Some(path);
            }
            if !visited.insert(last.clone()) {
                continue;
            }
            for next in self.edges.get(last.as_str()).into_iter().flatten() {
                let mut extended = path.clone();
                extended.push(next.clone());
                stack.push(extended);
            }
        }
        None
    }
}
