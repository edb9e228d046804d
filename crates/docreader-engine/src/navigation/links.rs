use relative_path::{RelativePath, RelativePathBuf};

/// Where a link in a rendered document points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget<'a> {
    /// `http://`, `https://` or `mailto:`; handed to the host.
    External(&'a str),
    /// `#heading` inside the current document, without the `#`.
    Anchor(&'a str),
    /// Another corpus document, relative to the current one, with an
    /// optional `#heading` suffix.
    Document {
        path: &'a str,
        anchor: Option<&'a str>,
    },
}

const EXTERNAL_SCHEMES: [&str; 3] = ["http://", "https://", "mailto:"];

pub fn classify_link(url: &str) -> LinkTarget<'_> {
    let url = url.trim();
    if EXTERNAL_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
        return LinkTarget::External(url);
    }
    if let Some(anchor) = url.strip_prefix('#') {
        return LinkTarget::Anchor(anchor);
    }
    match url.split_once('#') {
        Some((path, anchor)) => LinkTarget::Document {
            path,
            anchor: (!anchor.is_empty()).then_some(anchor),
        },
        None => LinkTarget::Document {
            path: url,
            anchor: None,
        },
    }
}

/// Resolves a document link relative to the folder of `current`.
pub fn resolve_document_path(current: &RelativePath, path: &str) -> RelativePathBuf {
    match current.parent() {
        Some(folder) => folder.join_normalized(path),
        None => RelativePath::new(path).normalize(),
    }
}

/// Reduces heading text or an anchor to lowercase word characters, so
/// `#getting-started` and `Getting Started` compare equal.
pub fn normalize_anchor(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect()
}
