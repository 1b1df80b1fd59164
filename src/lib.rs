//! tslens - structural analysis of TypeScript codebases.
//!
//! tslens parses TypeScript sources into concrete syntax trees with
//! tree-sitter and searches them for imports, function and method calls,
//! class declarations, or arbitrary patterns written in tree-sitter's query
//! language. It is read-only: sources are never modified.
//!
//! # Architecture
//!
//! - `source`: enumeration of candidate files under a root
//! - `parser`: grammar selection and parsing into `SourceTree`
//! - `analysis`: parse cache, tree walker, pattern searches, query engine,
//!   statistics
//! - `analyzer`: the `Analyzer` facade that runs an operation over a root
//! - `config`: YAML configuration
//! - `report`: output formatting (pretty, JSON)
//!
//! # Example
//!
//! ```no_run
//! use tslens::Analyzer;
//!
//! let analyzer = Analyzer::new("path/to/app")?;
//! for (file, calls) in analyzer.find_function_calls("fetch", true).iter() {
//!     for call in calls {
//!         println!("{}:{} {:?}", file, call.line, call.first_arg);
//!     }
//! }
//! # Ok::<(), tslens::AnalyzerError>(())
//! ```

pub mod analysis;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod parser;
pub mod report;
pub mod source;

pub use analysis::{
    traverse, AnalysisReport, CompiledQuery, ConstructCounts, MatchRecord, ParseCache,
    RawCapture, Statistics, Visit,
};
pub use analyzer::Analyzer;
pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, Result};
pub use parser::{Grammar, SourceTree};
pub use source::SourceSet;
