//! Analyzer configuration.
//!
//! Configuration is read from a YAML file (`tslens.yaml` by default) and
//! controls which files make up the analyzed source set.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AnalyzerError, Result};

/// Default config file names to search for in the analyzed root.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["tslens.yaml", "tslens.yml", ".tslens.yaml"];

/// Settings for source enumeration and execution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Whether `.tsx` files are part of the source set (default: true)
    pub include_tsx: bool,
    /// Whether anything under a `node_modules` directory is skipped (default: true)
    pub exclude_node_modules: bool,
    /// Glob patterns for paths to exclude (e.g., "**/generated/**", "**/*.d.ts")
    pub excluded_paths: Vec<String>,
    /// Process files on the rayon thread pool (default: false)
    pub parallel: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            include_tsx: true,
            exclude_node_modules: true,
            excluded_paths: Vec::new(),
            parallel: false,
        }
    }
}

impl AnalyzerConfig {
    /// Parse a config from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| AnalyzerError::io(path, e))?;
        Self::from_yaml(&content).map_err(|source| AnalyzerError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a config from YAML text. Missing keys take their defaults.
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Look for a config file in `root`, then in the user config directory.
    ///
    /// Returns the path that was loaded, or `None` when no file exists.
    pub fn discover<P: AsRef<Path>>(root: P) -> Result<Option<(PathBuf, Self)>> {
        for candidate in Self::candidates(root.as_ref()) {
            if candidate.is_file() {
                let config = Self::from_file(&candidate)?;
                return Ok(Some((candidate, config)));
            }
        }
        Ok(None)
    }

    fn candidates(root: &Path) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| root.join(name))
            .collect();

        if let Some(dirs) = directories::ProjectDirs::from("", "", "tslens") {
            paths.push(dirs.config_dir().join("tslens.yaml"));
        }

        paths
    }

    /// File extensions (without dot) that make up the source set.
    pub fn extensions(&self) -> Vec<&'static str> {
        if self.include_tsx {
            vec!["ts", "tsx"]
        } else {
            vec!["ts"]
        }
    }
}
