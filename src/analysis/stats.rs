//! Codebase statistics: construct counts and line counts.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::kinds::Construct;
use super::walk::traverse;
use super::ParseCache;
use crate::parser::SourceTree;

/// Number of each recognized construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructCounts {
    pub imports: usize,
    pub exports: usize,
    pub classes: usize,
    pub interfaces: usize,
    pub functions: usize,
    pub type_aliases: usize,
}

impl ConstructCounts {
    /// Count constructs in a parsed file with a single walk.
    pub fn count(tree: &SourceTree) -> Self {
        let mut counts = Self::default();
        traverse(tree.root(), |node| {
            if let Some(construct) = Construct::from_kind(node.kind()) {
                counts.increment(construct);
            }
        });
        counts
    }

    pub fn get(&self, construct: Construct) -> usize {
        match construct {
            Construct::Import => self.imports,
            Construct::Export => self.exports,
            Construct::Class => self.classes,
            Construct::Interface => self.interfaces,
            Construct::Function => self.functions,
            Construct::TypeAlias => self.type_aliases,
        }
    }

    fn increment(&mut self, construct: Construct) {
        let slot = match construct {
            Construct::Import => &mut self.imports,
            Construct::Export => &mut self.exports,
            Construct::Class => &mut self.classes,
            Construct::Interface => &mut self.interfaces,
            Construct::Function => &mut self.functions,
            Construct::TypeAlias => &mut self.type_aliases,
        };
        *slot += 1;
    }

    fn add(&mut self, other: &ConstructCounts) {
        self.imports += other.imports;
        self.exports += other.exports;
        self.classes += other.classes;
        self.interfaces += other.interfaces;
        self.functions += other.functions;
        self.type_aliases += other.type_aliases;
    }
}

/// Aggregate statistics for a source set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_files: usize,
    pub total_lines: usize,
    pub avg_lines_per_file: f64,
    #[serde(flatten)]
    pub constructs: ConstructCounts,
    /// Line count per file path.
    pub file_sizes: BTreeMap<String, usize>,
}

impl Statistics {
    /// Account for one enumerated file. `None` means the file could not be
    /// read or parsed: it still counts as a file, but adds no lines or
    /// constructs.
    fn record(&mut self, path: String, file: Option<FileStats>) {
        self.total_files += 1;
        if let Some(file) = file {
            self.total_lines += file.lines;
            self.file_sizes.insert(path, file.lines);
            self.constructs.add(&file.constructs);
        }
    }

    fn finish(mut self) -> Self {
        self.avg_lines_per_file = if self.total_files > 0 {
            self.total_lines as f64 / self.total_files as f64
        } else {
            0.0
        };
        self
    }
}

/// Per-file contribution to the statistics.
#[derive(Debug, Clone, Copy)]
struct FileStats {
    lines: usize,
    constructs: ConstructCounts,
}

impl FileStats {
    fn of(tree: &SourceTree) -> Self {
        Self {
            lines: tree.line_count(),
            constructs: ConstructCounts::count(tree),
        }
    }
}

/// Compute statistics for `files`, parsing through `cache`.
pub fn generate_stats(cache: &ParseCache, files: &[PathBuf], parallel: bool) -> Statistics {
    let per_file = |path: &PathBuf| {
        let file = cache.get(path).map(|tree| FileStats::of(&tree));
        (path.to_string_lossy().to_string(), file)
    };

    let results: Vec<(String, Option<FileStats>)> = if parallel {
        files.par_iter().map(per_file).collect()
    } else {
        files.iter().map(per_file).collect()
    };

    let mut stats = Statistics::default();
    for (path, file) in results {
        stats.record(path, file);
    }
    stats.finish()
}
