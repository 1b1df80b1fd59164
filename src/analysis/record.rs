//! Match records and per-file reports.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

/// A single match produced by a pattern search or query.
///
/// Records hold copied text rather than node handles, so they stay valid
/// after the parse cache is cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Start line (1-indexed).
    pub line: usize,
    /// Start column (0-indexed, in bytes).
    pub column: usize,
    /// Source text of the matched node.
    pub text: String,
    /// Grammar type tag of the matched node (e.g., "import_statement").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    /// Declared name, for declaration searches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// First call argument, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_arg: Option<String>,
    /// Capture name, for query captures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture: Option<String>,
    /// Capture name to the text of each node it captured, for grouped
    /// query matches.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub captures: BTreeMap<String, Vec<String>>,
}

impl MatchRecord {
    /// Create a record positioned at `node`.
    pub fn at(node: Node, text: impl Into<String>) -> Self {
        let start = node.start_position();
        Self {
            line: start.row + 1, // tree-sitter is 0-indexed
            column: start.column,
            text: text.into(),
            node_type: None,
            name: None,
            first_arg: None,
            capture: None,
            captures: BTreeMap::new(),
        }
    }

    pub fn with_node_type(mut self, node_type: &str) -> Self {
        self.node_type = Some(node_type.to_string());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_first_arg(mut self, arg: impl Into<String>) -> Self {
        self.first_arg = Some(arg.into());
        self
    }

    pub fn with_capture(mut self, capture: impl Into<String>) -> Self {
        self.capture = Some(capture.into());
        self
    }
}

impl fmt::Display for MatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Matches for a whole source set, keyed by file path.
///
/// Files without matches are never present. Paths iterate in sorted order;
/// records within a file keep traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisReport {
    files: BTreeMap<String, Vec<MatchRecord>>,
}

impl AnalysisReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the matches for one file. An empty list leaves the report unchanged.
    pub fn insert_file(&mut self, path: impl Into<String>, records: Vec<MatchRecord>) {
        if records.is_empty() {
            return;
        }
        self.files.entry(path.into()).or_default().extend(records);
    }

    /// Matches for a file, if it had any.
    pub fn get(&self, path: &str) -> Option<&[MatchRecord]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn contains_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Number of files with at least one match.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total number of matches across all files.
    pub fn total_matches(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MatchRecord])> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<MatchRecord>> {
        self.files
    }
}

impl FromIterator<(String, Vec<MatchRecord>)> for AnalysisReport {
    fn from_iter<I: IntoIterator<Item = (String, Vec<MatchRecord>)>>(iter: I) -> Self {
        let mut report = AnalysisReport::new();
        for (path, records) in iter {
            report.insert_file(path, records);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(line: usize, text: &str) -> MatchRecord {
        MatchRecord {
            line,
            column: 0,
            text: text.to_string(),
            node_type: None,
            name: None,
            first_arg: None,
            capture: None,
            captures: BTreeMap::new(),
        }
    }

    #[test]
    fn test_empty_files_are_omitted() {
        let mut report = AnalysisReport::new();
        report.insert_file("a.ts", vec![]);
        report.insert_file("b.ts", vec![record(1, "x")]);

        assert_eq!(report.len(), 1);
        assert!(!report.contains_file("a.ts"));
        assert_eq!(report.get("b.ts").unwrap().len(), 1);
    }

    #[test]
    fn test_paths_sorted_records_in_order() {
        let report: AnalysisReport = vec![
            ("z.ts".to_string(), vec![record(3, "c"), record(1, "a")]),
            ("a.ts".to_string(), vec![record(2, "b")]),
        ]
        .into_iter()
        .collect();

        assert_eq!(report.files().collect::<Vec<_>>(), vec!["a.ts", "z.ts"]);
        let lines: Vec<_> = report.get("z.ts").unwrap().iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![3, 1]);
        assert_eq!(report.total_matches(), 3);
    }

    #[test]
    fn test_optional_fields_not_serialized() {
        let json = serde_json::to_value(record(4, "import x from 'x';")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"line": 4, "column": 0, "text": "import x from 'x';"})
        );

        let with_arg = record(1, "bar(1, 2)").with_first_arg("1");
        let json = serde_json::to_value(with_arg).unwrap();
        assert_eq!(json["first_arg"], "1");
    }
}
