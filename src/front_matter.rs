//! Splitting and recombining front matter.
//!
//! Mixed documents carry YAML front matter between `---` fences, followed by
//! a free-form body. The split is purely textual; parsing the front matter
//! into a value tree is the caller's business. Both halves are optional: a
//! file with no opening fence is all body, and a file whose opening fence is
//! never closed is all front matter.

const OPENING_SENTINEL: &str = "---\n";
const CLOSING_SENTINEL: &str = "\n---";

/// The two textual halves of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentParts {
    /// YAML text between the fences, without the fences themselves.
    pub front_matter: Option<String>,
    /// Everything after the closing fence.
    pub body: Option<String>,
}

/// Splits `content` into front matter and body.
///
/// The opening fence must be the very first line. A `---` appearing later in
/// an unfenced file is ordinary body text. Both halves come back trimmed;
/// blank input yields neither half.
#[must_use]
pub fn split(content: &str) -> DocumentParts {
    let content = content.trim();
    if content.is_empty() {
        return DocumentParts::default();
    }

    // No opening fence: the whole file is body.
    let Some(rest) = content.strip_prefix(OPENING_SENTINEL) else {
        return DocumentParts {
            front_matter: None,
            body: Some(content.to_string()),
        };
    };

    match rest.find(CLOSING_SENTINEL) {
        // No closing fence: the whole file is front matter.
        None => DocumentParts {
            front_matter: Some(rest.to_string()),
            body: None,
        },
        Some(index) => DocumentParts {
            front_matter: Some(rest[..index].trim().to_string()),
            body: Some(rest[index + CLOSING_SENTINEL.len()..].trim().to_string()),
        },
    }
}

/// Recombines parts into a single document, the inverse of [`split`].
///
/// Empty strings count as absent. With front matter present the fences are
/// re-added and `trailing_newline` appends a final `\n`; a body-only
/// document is returned verbatim.
#[must_use]
pub fn combine(parts: &DocumentParts, trailing_newline: bool) -> String {
    let front_matter = parts.front_matter.as_deref().filter(|text| !text.is_empty());
    let body = parts.body.as_deref().filter(|text| !text.is_empty());

    match (front_matter, body) {
        (None, None) => {
            tracing::warn!("combining a document with no front matter and no body");
            String::new()
        }
        (None, Some(body)) => body.to_string(),
        (Some(front_matter), body) => {
            let formatted = format!(
                "{OPENING_SENTINEL}{front_matter}{CLOSING_SENTINEL}\n{}",
                body.unwrap_or("")
            );
            let formatted = formatted.trim();
            if trailing_newline {
                format!("{formatted}\n")
            } else {
                formatted.to_string()
            }
        }
    }
}
