use relative_path::{RelativePath, RelativePathBuf};

use super::{CorpusEntry, DocumentId};

/// The ordered set of documents eligible for search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    entries: Vec<CorpusEntry>,
}

impl Corpus {
    /// Builds a corpus from relative paths, keeping their order.
    pub fn from_paths<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = RelativePathBuf>,
    {
        let entries = paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| CorpusEntry::new(DocumentId(i), path))
            .collect();
        Self { entries }
    }

    /// Builds a corpus from `(path, display name)` pairs, keeping their order.
    pub fn from_named<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (RelativePathBuf, S)>,
        S: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .enumerate()
            .map(|(i, (path, name))| CorpusEntry::with_display_name(DocumentId(i), path, name))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn get(&self, id: DocumentId) -> Option<&CorpusEntry> {
        self.entries.get(id.0)
    }

    pub fn find_by_path(&self, path: &RelativePath) -> Option<&CorpusEntry> {
        self.entries.iter().find(|e| e.relative_path() == path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
