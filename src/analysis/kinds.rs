//! TypeScript grammar node types recognized by the pattern matcher and
//! statistics collector.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Node types denoting an import construct.
pub const IMPORT_KINDS: &[&str] = &["import_statement", "import_declaration"];

/// Node type of a call expression.
pub const CALL_KIND: &str = "call_expression";

/// Node type of a call's argument list.
pub const ARGUMENTS_KIND: &str = "arguments";

/// Node types denoting a class declaration.
pub const CLASS_KINDS: &[&str] = &["class_declaration", "abstract_class_declaration"];

/// Node type holding a declared type name.
pub const TYPE_IDENTIFIER_KIND: &str = "type_identifier";

pub fn is_import(kind: &str) -> bool {
    IMPORT_KINDS.contains(&kind)
}

pub fn is_call(kind: &str) -> bool {
    kind == CALL_KIND
}

pub fn is_class(kind: &str) -> bool {
    CLASS_KINDS.contains(&kind)
}

/// Construct kinds counted by the statistics collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Construct {
    Import,
    Export,
    Class,
    Interface,
    Function,
    TypeAlias,
}

impl Construct {
    pub const ALL: [Construct; 6] = [
        Construct::Import,
        Construct::Export,
        Construct::Class,
        Construct::Interface,
        Construct::Function,
        Construct::TypeAlias,
    ];

    /// Classify a node type tag.
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "import_statement" => Some(Construct::Import),
            "export_statement" => Some(Construct::Export),
            "class_declaration" | "abstract_class_declaration" => Some(Construct::Class),
            "interface_declaration" => Some(Construct::Interface),
            "function_declaration" => Some(Construct::Function),
            "type_alias_declaration" => Some(Construct::TypeAlias),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Construct::Import => "imports",
            Construct::Export => "exports",
            Construct::Class => "classes",
            Construct::Interface => "interfaces",
            Construct::Function => "functions",
            Construct::TypeAlias => "type_aliases",
        }
    }
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(Construct::from_kind("import_statement"), Some(Construct::Import));
        assert_eq!(
            Construct::from_kind("abstract_class_declaration"),
            Some(Construct::Class)
        );
        assert_eq!(Construct::from_kind("call_expression"), None);
        assert!(is_import("import_declaration"));
        assert!(!is_class("class_body"));
    }
}
