//! Tree-sitter setup for TypeScript sources.
//!
//! This module provides:
//! - `Grammar`: the TypeScript and TSX grammars, selected by file extension
//! - `SourceTree`: a parsed tree kept together with the text it was built from
//! - `parse_source` / `read_source`: the read-once, parse-once entry points

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tree_sitter::{Language, Node, Parser as TsParser, Tree};

use crate::error::{AnalyzerError, Result};

/// Grammar used to parse a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    TypeScript,
    Tsx,
}

impl Grammar {
    /// Every grammar the analyzer knows about.
    pub const ALL: [Grammar; 2] = [Grammar::TypeScript, Grammar::Tsx];

    /// The tree-sitter language for this grammar.
    pub fn language(self) -> Language {
        match self {
            Grammar::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Grammar::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Pick the grammar for a path: `.tsx` files need JSX support.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("tsx") => Grammar::Tsx,
            _ => Grammar::TypeScript,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grammar::TypeScript => "typescript",
            Grammar::Tsx => "tsx",
        }
    }

    /// Create a parser for this grammar.
    ///
    /// Fails only when the grammar ABI is incompatible with the linked
    /// tree-sitter runtime.
    pub fn parser(self) -> Result<TsParser> {
        let mut parser = TsParser::new();
        parser.set_language(&self.language())?;
        Ok(parser)
    }

    /// Verify that every grammar can be loaded.
    pub fn check_all() -> Result<()> {
        for grammar in Grammar::ALL {
            grammar.parser()?;
        }
        Ok(())
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed source file: the concrete syntax tree and the text it came from.
///
/// Nodes borrowed from `root()` cannot outlive this value, and the text is
/// read exactly once, so every node-processing step slices the same buffer.
pub struct SourceTree {
    path: PathBuf,
    source: String,
    tree: Tree,
    grammar: Grammar,
}

impl SourceTree {
    /// The path the source was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The full source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The grammar used to parse this file.
    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    /// The underlying tree-sitter tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The root node of the tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by a node.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// Number of lines in the source. `\n`, `\r\n` and a lone `\r` all end a
    /// line, and a trailing terminator does not open a new one.
    pub fn line_count(&self) -> usize {
        let mut count = 0;
        let mut chars = self.source.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\n' => count += 1,
                '\r' => {
                    chars.next_if_eq(&'\n');
                    count += 1;
                }
                _ => {}
            }
        }
        if self.source.ends_with(|c: char| c != '\n' && c != '\r') {
            count += 1;
        }
        count
    }

    /// Whether the parser had to recover from syntax errors.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// S-expression of the whole tree, used to compare trees structurally.
    pub fn to_sexp(&self) -> String {
        self.tree.root_node().to_sexp()
    }
}

impl fmt::Debug for SourceTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceTree")
            .field("path", &self.path)
            .field("grammar", &self.grammar)
            .field("bytes", &self.source.len())
            .finish()
    }
}

/// Read a source file as UTF-8 text.
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| AnalyzerError::io(path, e))?;
    String::from_utf8(bytes).map_err(|_| AnalyzerError::Encoding {
        path: path.to_path_buf(),
    })
}

/// Parse source text with the given grammar.
pub fn parse_source(path: &Path, source: String, grammar: Grammar) -> Result<SourceTree> {
    let mut parser = grammar.parser()?;
    let tree = parser
        .parse(source.as_bytes(), None)
        .ok_or_else(|| AnalyzerError::Parse {
            path: path.to_path_buf(),
        })?;

    Ok(SourceTree {
        path: path.to_path_buf(),
        source,
        tree,
        grammar,
    })
}

/// Read and parse a file, choosing the grammar from its extension.
pub fn parse_file(path: &Path) -> Result<SourceTree> {
    let source = read_source(path)?;
    parse_source(path, source, Grammar::for_path(path))
}
