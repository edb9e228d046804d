use relative_path::{RelativePath, RelativePathBuf};
use serde::Serialize;

/// Position of a document in its corpus.
///
/// Ordering follows corpus input order, which is also the order search
/// results are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DocumentId(pub usize);

/// A searchable document: where it lives and what to call it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusEntry {
    id: DocumentId,
    relative_path: RelativePathBuf,
    display_name: String,
}

impl CorpusEntry {
    /// Create an entry, deriving the display name from the file name
    pub fn new(id: DocumentId, relative_path: RelativePathBuf) -> Self {
        let display_name = Self::extract_display_name(&relative_path);
        Self::with_display_name(id, relative_path, display_name)
    }

    /// Create an entry with a caller-chosen display name
    pub fn with_display_name(
        id: DocumentId,
        relative_path: RelativePathBuf,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            relative_path,
            display_name: display_name.into(),
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// Get the display name (without .md extension)
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Relative path without the .md extension, for titles
    pub fn display_path(&self) -> &str {
        let path_str = self.relative_path.as_str();
        path_str.strip_suffix(".md").unwrap_or(path_str)
    }

    fn extract_display_name(path: &RelativePath) -> String {
        path.file_name()
            .map(|name| name.strip_suffix(".md").unwrap_or(name))
            .unwrap_or("Untitled")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_strips_extension() {
        let entry = CorpusEntry::new(DocumentId(0), RelativePathBuf::from("guides/Setup.md"));
        assert_eq!(entry.display_name(), "Setup");
        assert_eq!(entry.display_path(), "guides/Setup");
    }

    #[test]
    fn non_markdown_name_is_kept() {
        let entry = CorpusEntry::new(DocumentId(3), RelativePathBuf::from("README"));
        assert_eq!(entry.display_name(), "README");
        assert_eq!(entry.id(), DocumentId(3));
    }

    #[test]
    fn explicit_display_name_wins() {
        let entry = CorpusEntry::with_display_name(
            DocumentId(1),
            RelativePathBuf::from("a/b.md"),
            "Getting Started",
        );
        assert_eq!(entry.display_name(), "Getting Started");
    }
}
