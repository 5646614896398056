//! Document assembly: reading backend files into fields and body.
//!
//! A content backend stores documents in three textures, told apart by file
//! extension: Markdown files mix YAML front matter with a prose body, plain
//! YAML files are all fields, and everything else is an opaque body. This
//! module reads a path into a [`Document`] per those rules, writes one back
//! out, and discovers per-directory editor configuration by walking up the
//! tree.

use crate::error::Result;
use crate::front_matter::{self, DocumentParts};
use crate::parse::parse;
use crate::registry::TagRegistry;
use crate::render::render;
use crate::resolve::resolve_all;
use crate::source::ContentSource;
use crate::value::Value;

/// Extensions whose files carry front matter followed by a body.
pub const MIXED_FRONT_MATTER_EXTS: &[&str] = &["md"];

/// Extensions whose files are nothing but fields.
pub const ONLY_FRONT_MATTER_EXTS: &[&str] = &["yaml", "yml"];

/// Per-directory editor configuration file name.
const CONFIG_FILE: &str = "_editor.yaml";

/// A document read from a content source, split into structured fields and
/// an optional free-form body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Source path the document was read from.
    pub path: String,
    /// Parsed front matter, or [`Value::Null`] when the file has none.
    pub fields: Value,
    /// Raw body text, absent for fields-only files.
    pub body: Option<String>,
}

impl Document {
    /// Renders the document back to its on-disk text, the inverse of
    /// [`read_document`].
    ///
    /// Fields-only files render to plain YAML. Mixed files recombine the
    /// rendered fields with the body between front matter fences, with a
    /// trailing newline; null fields mean no front matter block at all.
    /// Anything else is the body verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`WeaveError::ShapeMismatch`](crate::WeaveError::ShapeMismatch)
    /// when a registered tag's payload has the wrong shape for rendering.
    pub fn to_text(&self, registry: &TagRegistry) -> Result<String> {
        let ext = extension(&self.path);

        if ext.is_some_and(|ext| ONLY_FRONT_MATTER_EXTS.contains(&ext)) {
            return render(&self.fields, registry);
        }

        if ext.is_some_and(|ext| MIXED_FRONT_MATTER_EXTS.contains(&ext)) {
            let front_matter = if self.fields.is_null() {
                None
            } else {
                Some(render(&self.fields, registry)?.trim_end().to_string())
            };
            let parts = DocumentParts {
                front_matter,
                body: self.body.clone(),
            };
            return Ok(front_matter::combine(&parts, true));
        }

        Ok(self.body.clone().unwrap_or_default())
    }
}

/// Reads `path` from `source` and splits it into a [`Document`].
///
/// Markdown files are split on front matter fences and their fields parsed;
/// `.yaml`/`.yml` files parse whole; other extensions keep their text as the
/// body, untouched. Deferred tags in the fields stay deferred, ready for a
/// later [`resolve_all`].
///
/// # Errors
///
/// Returns [`WeaveError::NotFound`](crate::WeaveError::NotFound) when the
/// path does not exist and [`WeaveError::Parse`](crate::WeaveError::Parse)
/// when the fields are not valid YAML.
///
/// # Examples
///
/// ```rust
/// use yamlweave::{MemorySource, TagRegistry, read_document};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> yamlweave::Result<()> {
/// let source = MemorySource::new();
/// source.insert("/pages/home.md", "---\ntitle: Home\n---\n# Welcome");
///
/// let registry = TagRegistry::default();
/// let document = read_document(&source, "/pages/home.md", &registry).await?;
///
/// assert_eq!(document.fields.get("title").and_then(|v| v.as_str()), Some("Home"));
/// assert_eq!(document.body.as_deref(), Some("# Welcome"));
/// # Ok(())
/// # }
/// ```
pub async fn read_document(
    source: &dyn ContentSource,
    path: &str,
    registry: &TagRegistry,
) -> Result<Document> {
    let raw = source.read(path).await?;
    let DocumentParts { front_matter, body } = split_document(path, raw);

    let fields = match &front_matter {
        Some(text) => parse(text, registry)?,
        None => Value::Null,
    };
    tracing::trace!(
        path = %path,
        has_fields = front_matter.is_some(),
        has_body = body.is_some(),
        "read document"
    );

    Ok(Document {
        path: path.to_string(),
        fields,
        body,
    })
}

/// Splits raw document text into its textual halves per `path`'s extension.
///
/// Markdown text splits on the front matter fences; `.yaml`/`.yml` text is
/// all front matter; anything else is all body, verbatim.
#[must_use]
pub fn split_document(path: &str, raw: String) -> DocumentParts {
    let ext = extension(path);

    if ext.is_some_and(|ext| MIXED_FRONT_MATTER_EXTS.contains(&ext)) {
        front_matter::split(&raw)
    } else if ext.is_some_and(|ext| ONLY_FRONT_MATTER_EXTS.contains(&ext)) {
        DocumentParts {
            front_matter: Some(raw),
            body: None,
        }
    } else {
        DocumentParts {
            front_matter: None,
            body: Some(raw),
        }
    }
}

/// Finds the editor configuration governing `directory`.
///
/// Looks for `_editor.yaml` in the directory itself, then in each parent up
/// to the root. A found config is parsed and its deferred references
/// resolved before being returned; `None` means no ancestor carries one.
///
/// # Errors
///
/// A missing config file is not an error, it continues the walk. Anything
/// else, an unreadable file, unparsable YAML, or a failure while resolving
/// the config's own references, propagates.
pub async fn discover_config(
    source: &dyn ContentSource,
    directory: &str,
    registry: &TagRegistry,
) -> Result<Option<Value>> {
    if directory.is_empty() {
        return Ok(None);
    }
    let mut directory = directory.to_string();

    loop {
        let config_path = if directory == "/" {
            format!("/{CONFIG_FILE}")
        } else {
            format!("{}/{CONFIG_FILE}", directory.trim_end_matches('/'))
        };

        match source.read(&config_path).await {
            Ok(text) => {
                tracing::debug!(path = %config_path, "found directory config");
                let config = parse(&text, registry)?;
                return resolve_all(config, registry).await.map(Some);
            }
            Err(err) if err.is_not_found() => {
                tracing::trace!(path = %config_path, "no config here, trying parent");
                let Some(parent) = parent_directory(&directory) else {
                    return Ok(None);
                };
                directory = parent.to_string();
            }
            Err(err) => return Err(err),
        }
    }
}

/// File extension without the dot, `None` for dotless and dotfile names.
fn extension(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        None | Some(0) => None,
        Some(index) => Some(&name[index + 1..]),
    }
}

/// Parent of a slash-separated directory path; the root has none.
fn parent_directory(directory: &str) -> Option<&str> {
    let trimmed = directory.trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.rfind('/') {
        Some(0) => Some("/"),
        Some(index) => Some(&trimmed[..index]),
        None => None,
    }
}
