//! Structural queries written in tree-sitter's query language.
//!
//! A query is compiled once per grammar in use and then run against every
//! parsed file. Raw capture output is decoded through `RawCapture` into the
//! canonical `MatchRecord`, so capture shapes that cannot be interpreted are
//! dropped one at a time instead of failing the whole run.

use std::collections::BTreeMap;
use std::fmt;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCapture, QueryCursor};

use super::MatchRecord;
use crate::error::{AnalyzerError, Result};
use crate::parser::{Grammar, SourceTree};

/// Capture name used when a capture index cannot be resolved to a name.
pub const UNKNOWN_CAPTURE: &str = "unknown";

/// A capture as produced by the query engine, before normalization.
///
/// The engine reports captures as indices into the query's name table.
/// Every capture is decoded through this union, so an index the table cannot
/// resolve falls back to `UNKNOWN_CAPTURE` and a reported slot holding no
/// node is dropped, instead of either failing the run.
#[derive(Debug, Clone, Copy)]
pub enum RawCapture<'tree, 'query> {
    /// A node whose capture index resolved to a name.
    Named { node: Node<'tree>, name: &'query str },
    /// A node whose capture index is missing from the name table.
    Indexed { node: Node<'tree>, index: u32 },
    /// A reported capture slot that holds no node.
    Unrecognized,
}

impl<'tree, 'query> RawCapture<'tree, 'query> {
    /// Wrap a capture from a query match.
    pub fn from_capture(query: &'query Query, capture: &QueryCapture<'tree>) -> Self {
        match query.capture_names().get(capture.index as usize) {
            Some(&name) => RawCapture::Named {
                node: capture.node,
                name,
            },
            None => RawCapture::Indexed {
                node: capture.node,
                index: capture.index,
            },
        }
    }

    /// Wrap the capture at `slot` of a match's capture list.
    pub fn from_slot(query: &'query Query, captures: &[QueryCapture<'tree>], slot: usize) -> Self {
        captures
            .get(slot)
            .map_or(RawCapture::Unrecognized, |capture| Self::from_capture(query, capture))
    }

    /// Node and capture name, or `None` for shapes that cannot be decoded.
    pub fn resolve(&self) -> Option<(Node<'tree>, &'query str)> {
        match *self {
            RawCapture::Named { node, name } => Some((node, name)),
            RawCapture::Indexed { node, .. } => Some((node, UNKNOWN_CAPTURE)),
            RawCapture::Unrecognized => None,
        }
    }

    /// Normalize into a record.
    pub fn decode(&self, tree: &SourceTree) -> Option<MatchRecord> {
        let (node, name) = self.resolve()?;
        Some(MatchRecord::at(node, tree.node_text(node)).with_capture(name))
    }
}

/// A query compiled for each grammar that accepts it.
pub struct CompiledQuery {
    source: String,
    queries: Vec<(Grammar, Query)>,
}

impl fmt::Debug for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledQuery")
            .field("source", &self.source)
            .field("grammars", &self.grammars().collect::<Vec<_>>())
            .finish()
    }
}

impl CompiledQuery {
    /// Compile `source` for each of `grammars`.
    ///
    /// Grammars that reject the query are left out (some node types exist only
    /// in the TSX grammar). Fails when no grammar accepts it, returning the
    /// first grammar's error.
    pub fn compile(source: &str, grammars: &[Grammar]) -> Result<Self> {
        let mut queries = Vec::new();
        let mut first_error = None;

        for &grammar in grammars {
            match Query::new(&grammar.language(), source) {
                Ok(query) => queries.push((grammar, query)),
                Err(e) => {
                    tracing::debug!(grammar = %grammar, "query rejected: {}", e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if queries.is_empty() => Err(AnalyzerError::Query(e)),
            _ => Ok(Self {
                source: source.to_string(),
                queries,
            }),
        }
    }

    /// The query text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Grammars this query compiled for.
    pub fn grammars(&self) -> impl Iterator<Item = Grammar> + '_ {
        self.queries.iter().map(|(g, _)| *g)
    }

    /// Capture names declared by the query, in declaration order.
    pub fn capture_names(&self) -> Vec<&str> {
        self.queries
            .first()
            .map(|(_, q)| q.capture_names().to_vec())
            .unwrap_or_default()
    }

    fn query_for(&self, tree: &SourceTree) -> Option<&Query> {
        let found = self
            .queries
            .iter()
            .find(|(g, _)| *g == tree.grammar())
            .map(|(_, q)| q);
        if found.is_none() {
            tracing::debug!(path = %tree.path().display(), grammar = %tree.grammar(), "query not compiled for grammar");
        }
        found
    }

    /// One record per capture, in document order.
    pub fn captures(&self, tree: &SourceTree) -> Vec<MatchRecord> {
        let Some(query) = self.query_for(tree) else {
            return Vec::new();
        };

        let mut cursor = QueryCursor::new();
        let mut captures = cursor.captures(query, tree.root(), tree.source().as_bytes());
        let mut records = Vec::new();

        while let Some((m, index)) = captures.next() {
            match RawCapture::from_slot(query, m.captures, *index).decode(tree) {
                Some(record) => records.push(record),
                None => tracing::debug!(path = %tree.path().display(), "dropping unrecognized capture"),
            }
        }

        records
    }

    /// One record per match, positioned at the match's first capture, with
    /// the text of every captured node in `captures`. A name captured more
    /// than once (`@arg+`) lists its nodes in document order.
    pub fn matches(&self, tree: &SourceTree) -> Vec<MatchRecord> {
        let Some(query) = self.query_for(tree) else {
            return Vec::new();
        };

        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(query, tree.root(), tree.source().as_bytes());
        let mut records = Vec::new();

        while let Some(m) = matches.next() {
            let mut resolved: Vec<(Node, &str)> = m
                .captures
                .iter()
                .filter_map(|capture| RawCapture::from_capture(query, capture).resolve())
                .collect();
            // Quantified captures may repeat a name; keep document order.
            resolved.sort_by_key(|(node, _)| node.start_byte());

            let Some(&(anchor, _)) = resolved.first() else {
                continue;
            };

            let mut captured: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for (node, name) in resolved {
                captured
                    .entry(name.to_string())
                    .or_default()
                    .push(tree.node_text(node).to_string());
            }

            let mut record = MatchRecord::at(anchor, tree.node_text(anchor));
            record.captures = captured;
            records.push(record);
        }

        records
    }
}
