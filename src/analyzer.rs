//! Analyzer for a TypeScript codebase rooted at a directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::analysis::{
    self, AnalysisReport, CompiledQuery, MatchRecord, ParseCache, Statistics,
};
use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, Result};
use crate::parser::{Grammar, SourceTree};
use crate::source::SourceSet;

/// Runs searches, queries and statistics over every source file under a root.
///
/// The analyzer owns its parse cache: trees are parsed on first use and
/// reused by every later operation until `clear_cache` is called.
pub struct Analyzer {
    root: PathBuf,
    config: AnalyzerConfig,
    sources: SourceSet,
    cache: ParseCache,
}

impl Analyzer {
    /// Create an analyzer with the default configuration.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        Self::with_config(root, AnalyzerConfig::default())
    }

    /// Create an analyzer with an explicit configuration.
    ///
    /// Fails when the grammars cannot be loaded, the root cannot be
    /// resolved, or an exclusion pattern is invalid.
    pub fn with_config<P: AsRef<Path>>(root: P, config: AnalyzerConfig) -> Result<Self> {
        Grammar::check_all()?;

        let root = root.as_ref();
        let root = root
            .canonicalize()
            .map_err(|e| AnalyzerError::io(root, e))?;
        let sources = SourceSet::new(&root, &config)?;

        tracing::debug!(root = %root.display(), ?config, "analyzer ready");

        Ok(Self {
            root,
            config,
            sources,
            cache: ParseCache::new(),
        })
    }

    /// The canonical root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn cache(&self) -> &ParseCache {
        &self.cache
    }

    /// Every source file currently under the root.
    pub fn source_files(&self) -> Vec<PathBuf> {
        self.sources.files()
    }

    /// Parse a file through the cache. `None` if it cannot be read or parsed.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Option<Arc<SourceTree>> {
        self.cache.get(path)
    }

    /// Drop every cached tree.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Find imports whose statement text contains `name`.
    pub fn find_imports(&self, name: &str) -> AnalysisReport {
        self.collect(|tree| analysis::find_imports(tree, name))
    }

    /// Find calls to `name` or `<expr>.name`.
    pub fn find_function_calls(&self, name: &str, extract_first_arg: bool) -> AnalysisReport {
        self.collect(|tree| analysis::find_function_calls(tree, name, extract_first_arg))
    }

    /// Find class declarations, optionally filtered by exact name.
    pub fn find_class_definitions(&self, name: Option<&str>) -> AnalysisReport {
        self.collect(|tree| analysis::find_class_definitions(tree, name))
    }

    /// Run a tree-sitter query and return one record per capture.
    ///
    /// A query that does not compile is logged and yields an empty report.
    pub fn custom_query(&self, query: &str) -> AnalysisReport {
        match self.compile(query) {
            Some(compiled) => self.collect(|tree| compiled.captures(tree)),
            None => AnalysisReport::new(),
        }
    }

    /// Run a tree-sitter query and return one record per match, with every
    /// capture of the match in `captures`.
    pub fn custom_query_grouped(&self, query: &str) -> AnalysisReport {
        match self.compile(query) {
            Some(compiled) => self.collect(|tree| compiled.matches(tree)),
            None => AnalysisReport::new(),
        }
    }

    /// Compute statistics over the source set.
    pub fn generate_stats(&self) -> Statistics {
        analysis::generate_stats(&self.cache, &self.source_files(), self.config.parallel)
    }

    /// Grammars needed for the configured source set.
    fn grammars(&self) -> Vec<Grammar> {
        if self.config.include_tsx {
            Grammar::ALL.to_vec()
        } else {
            vec![Grammar::TypeScript]
        }
    }

    fn compile(&self, query: &str) -> Option<CompiledQuery> {
        match CompiledQuery::compile(query, &self.grammars()) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                tracing::error!("query rejected: {}", e);
                None
            }
        }
    }

    /// Apply `search` to every parsed file and merge the results.
    fn collect<F>(&self, search: F) -> AnalysisReport
    where
        F: Fn(&SourceTree) -> Vec<MatchRecord> + Sync,
    {
        let files = self.source_files();
        let per_file = |path: &PathBuf| {
            let tree = self.cache.get(path)?;
            Some((path.to_string_lossy().to_string(), search(&tree)))
        };

        let results: Vec<(String, Vec<MatchRecord>)> = if self.config.parallel {
            files.par_iter().filter_map(per_file).collect()
        } else {
            files.iter().filter_map(per_file).collect()
        };

        results.into_iter().collect()
    }
}
