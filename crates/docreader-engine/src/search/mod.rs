//! # Corpus Search
//!
//! Finds a query in document names or document text, off the render thread.
//!
//! - **`source`**: `ContentSource`, where document text comes from
//! - **`cache`**: `ContentCache`, the read-through path to content map shared
//!   with the scan worker
//! - **`scan`**: the scan itself, a pure function of corpus, term and mode
//! - **`indexer`**: `SearchIndexer`, which debounces queries, runs scans on a
//!   worker thread and publishes only the newest result set

pub mod cache;
pub mod indexer;
pub mod scan;
pub mod source;

use serde::Serialize;

use crate::models::DocumentId;

pub use cache::ContentCache;
pub use indexer::{SearchIndexer, SearchQuery};
pub use scan::scan;
pub use source::{ContentSource, MemorySource};

/// What a query is tested against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum SearchMode {
    /// Document display names only.
    #[default]
    FileName,
    /// Document names and every line of document text.
    Content,
}

/// One search hit.
///
/// Matches are ordered by document in corpus order, then by line. A match
/// with `line == None` is a hit on the document's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub document: DocumentId,
    pub line: Option<usize>,
    pub snippet: String,
}

impl SearchMatch {
    /// A hit on a document's display name.
    pub fn title(document: DocumentId, name: impl Into<String>) -> Self {
        Self {
            document,
            line: None,
            snippet: name.into(),
        }
    }

    /// A hit on line `line` of a document's text.
    pub fn at_line(document: DocumentId, line: usize, snippet: impl Into<String>) -> Self {
        Self {
            document,
            line: Some(line),
            snippet: snippet.into(),
        }
    }

    pub fn is_title(&self) -> bool {
        self.line.is_none()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Search worker unavailable: {0}")]
    WorkerUnavailable(#[source] std::io::Error),
}
