//! Asynchronous bottom-up traversal of a value tree.
//!
//! [`walk`] rebuilds a tree by applying an async visitor to every node after
//! that node's children have been rebuilt. Sequences and mappings recurse;
//! everything else (scalars, tagged nodes, references, pending loads) is a
//! leaf. Sibling subtrees are joined concurrently, so a visitor that returns
//! lazy futures still gets its I/O overlapped once the walk awaits them.
//!
//! The resolver drives both of its phases through this one walker: phase 1
//! swaps references for pending loads, phase 2 awaits the pending loads. See
//! [`resolve_all`](crate::resolve_all).
//!
//! # Examples
//!
//! ```rust
//! use yamlweave::{walk, TagRegistry, Value};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> yamlweave::Result<()> {
//! let tree = yamlweave::parse("a: 1\nb: [2, 3]", &TagRegistry::default())?;
//! let doubled = walk(tree, |node| async move {
//!     Ok(match node {
//!         Value::Number(n) => match n.as_i64() {
//!             Some(i) => Value::from(i * 2),
//!             None => Value::Number(n),
//!         },
//!         other => other,
//!     })
//! })
//! .await?;
//!
//! assert_eq!(doubled.get("a").and_then(Value::as_i64), Some(2));
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, try_join_all};

use crate::error::Result;
use crate::value::Value;

/// Boxed form of the visitor, shared across the recursive walk.
type Visitor = Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// Rebuilds `value` bottom-up, applying `visit` to every node exactly once.
///
/// Container nodes are visited only after all of their children have been
/// transformed. The visitor's output is spliced in as-is: returning a
/// container for a scalar replaces the subtree wholesale, and the walk does
/// not descend into the replacement. Tagged nodes are leaves; their payloads
/// are opaque to the walk.
///
/// Children of one sequence or mapping are transformed concurrently, with
/// structural order preserved in the rebuilt container.
///
/// # Errors
///
/// The first visitor failure aborts the walk; partially transformed siblings
/// are discarded and the error is returned to the caller.
pub async fn walk<F, Fut>(value: Value, visit: F) -> Result<Value>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    let visitor: Visitor = Arc::new(move |node| visit(node).boxed());
    walk_value(value, visitor).await
}

fn walk_value(value: Value, visit: Visitor) -> BoxFuture<'static, Result<Value>> {
    async move {
        let rebuilt = match value {
            Value::Sequence(items) => {
                let children = items.into_iter().map(|child| walk_value(child, visit.clone()));
                Value::Sequence(try_join_all(children).await?)
            }
            Value::Mapping(map) => {
                let (keys, values): (Vec<_>, Vec<_>) = map.into_iter().unzip();
                let children = values.into_iter().map(|child| walk_value(child, visit.clone()));
                let transformed = try_join_all(children).await?;
                Value::Mapping(keys.into_iter().zip(transformed).collect())
            }
            leaf => leaf,
        };
        visit(rebuilt).await
    }
    .boxed()
}
