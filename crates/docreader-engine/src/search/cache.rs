use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use relative_path::{RelativePath, RelativePathBuf};

use crate::io::IoError;

use super::ContentSource;

/// Read-through cache of document content, shared between the host and
/// search workers.
///
/// Every access takes the lock; no lock is held while a document is read
/// from its source. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct ContentCache {
    entries: Arc<Mutex<HashMap<RelativePathBuf, Arc<str>>>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<RelativePathBuf, Arc<str>>> {
        // A panicking worker cannot leave the map half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, path: &RelativePath) -> Option<Arc<str>> {
        self.lock().get(path).cloned()
    }

    pub fn insert(&self, path: RelativePathBuf, content: impl Into<Arc<str>>) -> Arc<str> {
        let content = content.into();
        self.lock().insert(path, Arc::clone(&content));
        content
    }

    /// Returns cached content, reading and caching it on a miss.
    pub fn get_or_load(
        &self,
        path: &RelativePath,
        source: &dyn ContentSource,
    ) -> Result<Arc<str>, IoError> {
        if let Some(content) = self.get(path) {
            return Ok(content);
        }
        let content = source.read(path)?;
        Ok(self.insert(path.to_relative_path_buf(), content))
    }

    /// Drops one document so the next scan re-reads it. Returns whether it
    /// was cached.
    pub fn invalidate(&self, path: &RelativePath) -> bool {
        self.lock().remove(path).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        reads: AtomicUsize,
    }

    impl ContentSource for CountingSource {
        fn read(&self, path: &RelativePath) -> Result<String, IoError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(format!("content of {path}"))
        }
    }

    #[test]
    fn second_load_hits_cache() {
        let cache = ContentCache::new();
        let source = CountingSource {
            reads: AtomicUsize::new(0),
        };
        let path = RelativePath::new("a.md");

        let first = cache.get_or_load(path, &source).unwrap();
        let second = cache.get_or_load(path, &source).unwrap();

        assert_eq!(&*first, "content of a.md");
        assert_eq!(first, second);
        assert_eq!(source.reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn invalidate_forces_reread() {
        let cache = ContentCache::new();
        let source = CountingSource {
            reads: AtomicUsize::new(0),
        };
        let path = RelativePath::new("a.md");

        cache.get_or_load(path, &source).unwrap();
        assert!(cache.invalidate(path));
        assert!(!cache.invalidate(path));
        cache.get_or_load(path, &source).unwrap();

        assert_eq!(source.reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn clones_share_entries() {
        let cache = ContentCache::new();
        let clone = cache.clone();
        clone.insert(RelativePathBuf::from("x.md"), "x");
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(clone.is_empty());
    }

    #[test]
    fn failed_read_is_not_cached() {
        let cache = ContentCache::new();
        let source = super::super::MemorySource::new();
        assert!(cache.get_or_load(RelativePath::new("missing.md"), &source).is_err());
        assert!(cache.is_empty());
    }
}
