//! Enumeration of candidate TypeScript source files.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::config::AnalyzerConfig;
use crate::error::Result;

/// The set of source files under a root directory.
///
/// Enumeration is repeated on every call, so files added or removed between
/// calls are picked up. Entries are visited in file-name order, which keeps
/// the result stable across calls against an unchanged file system.
#[derive(Debug, Clone)]
pub struct SourceSet {
    root: PathBuf,
    extensions: Vec<&'static str>,
    exclude_node_modules: bool,
    excluded: GlobSet,
}

impl SourceSet {
    /// Build a source set for `root` using the filters from `config`.
    pub fn new<P: AsRef<Path>>(root: P, config: &AnalyzerConfig) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &config.excluded_paths {
            builder.add(Glob::new(pattern)?);
        }

        Ok(Self {
            root: root.as_ref().to_path_buf(),
            extensions: config.extensions(),
            exclude_node_modules: config.exclude_node_modules,
            excluded: builder.build()?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every matching file under the root.
    ///
    /// Unreadable directory entries are logged and skipped.
    pub fn files(&self) -> Vec<PathBuf> {
        let exclude_node_modules = self.exclude_node_modules;
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                !(exclude_node_modules
                    && e.depth() > 0
                    && e.file_type().is_dir()
                    && e.file_name() == "node_modules")
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if self.has_source_extension(path) && !self.is_excluded(path) {
                files.push(path.to_path_buf());
            }
        }

        tracing::debug!(root = %self.root.display(), count = files.len(), "enumerated source files");
        files
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.contains(&ext))
            .unwrap_or(false)
    }

    /// Exclusion globs match either the path relative to the root or the full path.
    fn is_excluded(&self, path: &Path) -> bool {
        if self.excluded.is_empty() {
            return false;
        }
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.excluded.is_match(relative) || self.excluded.is_match(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "export {};\n").unwrap();
    }

    fn names(set: &SourceSet) -> Vec<String> {
        set.files()
            .iter()
            .map(|p| {
                p.strip_prefix(set.root())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/b.ts");
        touch(temp.path(), "src/a.ts");
        touch(temp.path(), "src/view.tsx");
        touch(temp.path(), "src/readme.md");
        touch(temp.path(), "src/gen/api.ts");
        touch(temp.path(), "node_modules/lib/index.ts");
        temp
    }

    #[test]
    fn test_default_filters() {
        let temp = fixture();
        let set = SourceSet::new(temp.path(), &AnalyzerConfig::default()).unwrap();

        assert_eq!(
            names(&set),
            vec!["src/a.ts", "src/b.ts", "src/gen/api.ts", "src/view.tsx"]
        );
    }

    #[test]
    fn test_without_tsx_and_with_node_modules() {
        let temp = fixture();
        let config = AnalyzerConfig {
            include_tsx: false,
            exclude_node_modules: false,
            ..Default::default()
        };
        let set = SourceSet::new(temp.path(), &config).unwrap();

        assert_eq!(
            names(&set),
            vec!["node_modules/lib/index.ts", "src/a.ts", "src/b.ts", "src/gen/api.ts"]
        );
    }

    #[test]
    fn test_excluded_globs() {
        let temp = fixture();
        let config = AnalyzerConfig {
            excluded_paths: vec!["**/gen/**".to_string()],
            ..Default::default()
        };
        let set = SourceSet::new(temp.path(), &config).unwrap();

        assert_eq!(names(&set), vec!["src/a.ts", "src/b.ts", "src/view.tsx"]);
    }

    #[test]
    fn test_invalid_glob() {
        let config = AnalyzerConfig {
            excluded_paths: vec!["src/[".to_string()],
            ..Default::default()
        };
        assert!(SourceSet::new(".", &config).is_err());
    }

    #[test]
    fn test_stable_order() {
        let temp = fixture();
        let set = SourceSet::new(temp.path(), &AnalyzerConfig::default()).unwrap();
        assert_eq!(set.files(), set.files());
    }
}
