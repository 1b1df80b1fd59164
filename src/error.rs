//! Error types for tslens.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while enumerating, reading, parsing or querying sources.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid UTF-8")]
    Encoding { path: PathBuf },
    #[error("failed to parse {path}")]
    Parse { path: PathBuf },
    #[error("grammar initialization failed: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),
    #[error("invalid query: {0}")]
    Query(#[from] tree_sitter::QueryError),
    #[error("walking source tree: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("invalid exclusion pattern: {0}")]
    Glob(#[from] globset::Error),
    #[error("loading config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl AnalyzerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalyzerError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
