//! Parse cache for source trees.
//!
//! The cache provides:
//! - Parsing on first access and reuse of the tree afterwards
//! - Manual invalidation (`invalidate`, `clear`)
//! - Shared read access so files can be processed in parallel
//!
//! The cache never looks at modification times: a file edited on disk keeps
//! its cached tree until it is invalidated.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::Result;
use crate::parser::{self, SourceTree};

/// Cache of parsed source trees, keyed by normalized absolute path.
#[derive(Debug, Default)]
pub struct ParseCache {
    trees: RwLock<HashMap<PathBuf, Arc<SourceTree>>>,
}

impl ParseCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the tree for `path`, parsing it on first access.
    ///
    /// Returns `None` when the file cannot be read or parsed. The cause is
    /// logged and nothing is cached, so a later call retries.
    pub fn get<P: AsRef<Path>>(&self, path: P) -> Option<Arc<SourceTree>> {
        let path = path.as_ref();
        match self.try_get(path) {
            Ok(tree) => Some(tree),
            Err(e) => {
                tracing::warn!(path = %path.display(), "skipping file: {}", e);
                None
            }
        }
    }

    /// Like `get`, but returns the cause of a failure.
    pub fn try_get<P: AsRef<Path>>(&self, path: P) -> Result<Arc<SourceTree>> {
        let key = normalize(path.as_ref());

        if let Some(tree) = self.read().get(&key) {
            return Ok(Arc::clone(tree));
        }

        let tree = Arc::new(parser::parse_file(&key)?);
        tracing::trace!(path = %key.display(), grammar = %tree.grammar(), "parsed");

        // Another thread may have parsed the same file meanwhile; keep the first.
        let mut trees = self.write();
        Ok(Arc::clone(trees.entry(key).or_insert(tree)))
    }

    /// Whether a tree for `path` is cached.
    pub fn contains<P: AsRef<Path>>(&self, path: P) -> bool {
        self.read().contains_key(&normalize(path.as_ref()))
    }

    /// Drop the cached tree for a single file.
    pub fn invalidate<P: AsRef<Path>>(&self, path: P) -> bool {
        self.write().remove(&normalize(path.as_ref())).is_some()
    }

    /// Drop all cached trees.
    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<PathBuf, Arc<SourceTree>>> {
        self.trees.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<PathBuf, Arc<SourceTree>>> {
        self.trees.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Normalize a path to its canonical absolute form, falling back to the path
/// as given when it cannot be resolved (the subsequent read reports why).
fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_caching() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("main.ts");
        fs::write(&file_path, "export function main() {}\n").unwrap();

        let cache = ParseCache::new();

        let first = cache.get(&file_path).unwrap();
        let second = cache.get(&file_path).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&file_path));
    }

    #[test]
    fn test_relative_and_absolute_share_entry() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();
        let file_path = temp.path().join("src").join("a.ts");
        fs::write(&file_path, "let a = 1;\n").unwrap();

        let cache = ParseCache::new();
        let direct = cache.get(&file_path).unwrap();
        let dotted = cache.get(temp.path().join("src/../src/a.ts")).unwrap();

        assert!(Arc::ptr_eq(&direct, &dotted));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_no_staleness_detection() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("a.ts");
        fs::write(&file_path, "class A {}\n").unwrap();

        let cache = ParseCache::new();
        let before = cache.get(&file_path).unwrap();

        fs::write(&file_path, "class B {}\nclass C {}\n").unwrap();
        let cached = cache.get(&file_path).unwrap();
        assert_eq!(cached.source(), "class A {}\n");
        assert!(Arc::ptr_eq(&before, &cached));

        assert!(cache.invalidate(&file_path));
        let fresh = cache.get(&file_path).unwrap();
        assert_eq!(fresh.source(), "class B {}\nclass C {}\n");
    }

    #[test]
    fn test_clear_reparses_equal_tree() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("a.ts");
        fs::write(&file_path, "import { A } from './a';\nnew A().run(1);\n").unwrap();

        let cache = ParseCache::new();
        let before = cache.get(&file_path).unwrap();

        cache.clear();
        assert!(cache.is_empty());

        let after = cache.get(&file_path).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.to_sexp(), after.to_sexp());
        assert_eq!(before.source(), after.source());
    }

    #[test]
    fn test_failures_are_not_cached() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.ts");

        let cache = ParseCache::new();
        assert!(cache.get(&missing).is_none());
        assert!(cache.try_get(&missing).is_err());
        assert!(cache.is_empty());

        fs::write(&missing, "let x = 1;\n").unwrap();
        assert!(cache.get(&missing).is_some());
    }
}
