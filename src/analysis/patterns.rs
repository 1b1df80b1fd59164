//! Typed searches for imports, calls and class declarations.
//!
//! Each search walks one parsed file and returns its matches in traversal
//! order. The name filters are deliberately loose:
//! - imports match when the statement text contains the name anywhere, so
//!   `Foo` also matches an import of `FooBar`
//! - calls match the callee text exactly or as the last `.name` segment, so
//!   computed members (`obj["bar"]()`) are not recognized

use tree_sitter::Node;

use super::kinds::{self, ARGUMENTS_KIND, TYPE_IDENTIFIER_KIND};
use super::walk::{traverse, Visit};
use super::MatchRecord;
use crate::parser::SourceTree;

/// Find import statements whose text contains `name`.
pub fn find_imports(tree: &SourceTree, name: &str) -> Vec<MatchRecord> {
    let mut imports = Vec::new();

    traverse(tree.root(), |node| {
        if !kinds::is_import(node.kind()) {
            return Visit::Descend;
        }

        let text = tree.node_text(node);
        if text.contains(name) {
            imports.push(MatchRecord::at(node, text.trim()).with_node_type(node.kind()));
        }

        // Imports never contain other imports.
        Visit::SkipChildren
    });

    imports
}

/// Whether a callee expression names `name`, directly or as a member access.
pub fn callee_matches(callee: &str, name: &str) -> bool {
    callee == name
        || callee
            .strip_suffix(name)
            .map(|prefix| prefix.ends_with('.'))
            .unwrap_or(false)
}

/// Find calls to `name` (`name(...)` or `x.name(...)`).
///
/// With `extract_first_arg`, the first argument's text is attached to each
/// match that has one.
pub fn find_function_calls(
    tree: &SourceTree,
    name: &str,
    extract_first_arg: bool,
) -> Vec<MatchRecord> {
    let mut calls = Vec::new();

    traverse(tree.root(), |node| {
        if !kinds::is_call(node.kind()) {
            return;
        }

        let Some(callee) = node.child(0) else {
            return;
        };

        if !callee_matches(tree.node_text(callee), name) {
            return;
        }

        let mut record = MatchRecord::at(node, tree.node_text(node).trim());
        if extract_first_arg {
            if let Some(arg) = first_argument(node) {
                record = record.with_first_arg(tree.node_text(arg).trim());
            }
        }
        calls.push(record);
    });

    calls
}

/// The first argument of a call, skipping punctuation and comments.
fn first_argument(call: Node) -> Option<Node> {
    let args = call.child_by_field_name("arguments")?;
    if args.kind() != ARGUMENTS_KIND {
        // Tagged templates put a template string here.
        return None;
    }

    let mut cursor = args.walk();
    let first = args
        .named_children(&mut cursor)
        .find(|n| n.kind() != "comment");
    first
}

/// Find class declarations, optionally only those named `name_filter`.
///
/// Declarations without a name are skipped.
pub fn find_class_definitions(tree: &SourceTree, name_filter: Option<&str>) -> Vec<MatchRecord> {
    let mut classes = Vec::new();

    traverse(tree.root(), |node| {
        if !kinds::is_class(node.kind()) {
            return;
        }

        let Some(name_node) = declared_name(node) else {
            return;
        };

        let name = tree.node_text(name_node);
        if name_filter.map_or(true, |wanted| wanted == name) {
            classes.push(
                MatchRecord::at(node, tree.node_text(node))
                    .with_node_type(node.kind())
                    .with_name(name),
            );
        }
    });

    classes
}

fn declared_name(decl: Node) -> Option<Node> {
    let mut cursor = decl.walk();
    let name = decl
        .children(&mut cursor)
        .find(|c| c.kind() == TYPE_IDENTIFIER_KIND);
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_source, Grammar};
    use std::path::Path;

    fn parse(source: &str) -> SourceTree {
        parse_source(Path::new("test.ts"), source.to_string(), Grammar::TypeScript).unwrap()
    }

    #[test]
    fn test_find_imports() {
        let tree = parse("// header\nimport { Foo } from './foo';\nimport { Bar } from './bar';\n");
        let imports = find_imports(&tree, "Foo");

        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].line, 2);
        assert_eq!(imports[0].column, 0);
        assert_eq!(imports[0].text, "import { Foo } from './foo';");
        assert_eq!(imports[0].node_type.as_deref(), Some("import_statement"));
    }

    #[test]
    fn test_find_imports_matches_module_path() {
        let tree = parse("import * as path from 'node:path';\nimport fs from 'fs';\n");
        let imports = find_imports(&tree, "node:path");
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].line, 1);
    }

    #[test]
    fn test_find_imports_substring_false_positive() {
        // Substring matching is intentionally permissive.
        let tree = parse("import { FooBar } from './foobar';\n");
        let imports = find_imports(&tree, "Foo");
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].text, "import { FooBar } from './foobar';");
    }

    #[test]
    fn test_callee_matches() {
        assert!(callee_matches("bar", "bar"));
        assert!(callee_matches("obj.bar", "bar"));
        assert!(callee_matches("a.b.bar", "bar"));
        assert!(!callee_matches("barBaz", "bar"));
        assert!(!callee_matches("foobar", "bar"));
        assert!(!callee_matches("obj.foobar", "bar"));
    }

    #[test]
    fn test_find_function_calls() {
        let tree = parse("bar(1);\nobj.bar(1);\nbarBaz(1);\n");
        let calls = find_function_calls(&tree, "bar", false);

        let texts: Vec<_> = calls.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["bar(1)", "obj.bar(1)"]);
        assert_eq!(calls[1].line, 2);
        assert_eq!(calls[1].column, 0);
        assert!(calls.iter().all(|c| c.first_arg.is_none()));
    }

    #[test]
    fn test_first_arg() {
        let tree = parse("bar(1,2);\nbar();\nbar(/* note */ 'x', y);\n");
        let calls = find_function_calls(&tree, "bar", true);

        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].first_arg.as_deref(), Some("1"));
        assert_eq!(calls[1].first_arg, None);
        assert_eq!(calls[2].first_arg.as_deref(), Some("'x'"));
    }

    #[test]
    fn test_first_arg_with_type_arguments() {
        let tree = parse("const v = store.get<Config>(key, 2);\n");
        let calls = find_function_calls(&tree, "get", true);

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].first_arg.as_deref(), Some("key"));
        assert_eq!(calls[0].column, 10);
    }

    #[test]
    fn test_nested_calls_in_traversal_order() {
        let tree = parse("log(log(1));\n");
        let calls = find_function_calls(&tree, "log", true);

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].text, "log(log(1))");
        assert_eq!(calls[0].first_arg.as_deref(), Some("log(1)"));
        assert_eq!(calls[1].text, "log(1)");
        assert_eq!(calls[1].column, 4);
    }

    #[test]
    fn test_computed_member_not_matched() {
        let tree = parse("obj['bar'](1);\n");
        assert!(find_function_calls(&tree, "bar", false).is_empty());
    }

    #[test]
    fn test_find_class_definitions() {
        let tree = parse("class Widget {}\nclass Other {}\n");

        let widgets = find_class_definitions(&tree, Some("Widget"));
        assert_eq!(widgets.len(), 1);
        assert_eq!(widgets[0].name.as_deref(), Some("Widget"));
        assert_eq!(widgets[0].text, "class Widget {}");
        assert_eq!(widgets[0].line, 1);

        let all = find_class_definitions(&tree, None);
        let names: Vec<_> = all.iter().filter_map(|c| c.name.as_deref()).collect();
        assert_eq!(names, vec!["Widget", "Other"]);
    }

    #[test]
    fn test_exported_and_abstract_classes() {
        let tree = parse("export class A {}\nexport abstract class B {}\n");
        let all = find_class_definitions(&tree, None);

        let names: Vec<_> = all.iter().filter_map(|c| c.name.as_deref()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(all[0].column, 7);
        assert_eq!(
            all[1].node_type.as_deref(),
            Some("abstract_class_declaration")
        );
    }

    #[test]
    fn test_class_filter_is_exact() {
        let tree = parse("class WidgetFactory {}\n");
        assert!(find_class_definitions(&tree, Some("Widget")).is_empty());
    }
}
