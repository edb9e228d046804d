use std::collections::HashMap;

use relative_path::{RelativePath, RelativePathBuf};

use crate::io::IoError;

/// Supplies the text of corpus documents to search workers.
pub trait ContentSource: Send + Sync {
    fn read(&self, path: &RelativePath) -> Result<String, IoError>;
}

/// Document text held in memory, for hosts that have already loaded it.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<RelativePathBuf, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<RelativePathBuf>, content: impl Into<String>) {
        self.documents.insert(path.into(), content.into());
    }

    pub fn with(mut self, path: impl Into<RelativePathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }
}

impl ContentSource for MemorySource {
    fn read(&self, path: &RelativePath) -> Result<String, IoError> {
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| IoError::NotFound(path.to_path("")))
    }
}
