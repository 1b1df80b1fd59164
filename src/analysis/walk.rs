//! Depth-first traversal over a concrete syntax tree.
//!
//! The walker is a pure procedure over an externally owned tree: it keeps no
//! state between calls and never mutates the tree. It uses a tree-sitter
//! cursor rather than recursion, so deeply nested sources cannot overflow
//! the stack.

use tree_sitter::Node;

/// What the walker should do after visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visit {
    /// Visit the node's children next.
    #[default]
    Descend,
    /// Continue with the node's next sibling, skipping its subtree.
    SkipChildren,
    /// End the traversal.
    Stop,
}

impl From<()> for Visit {
    fn from(_: ()) -> Self {
        Visit::Descend
    }
}

/// Visit `root` and every node below it in pre-order.
///
/// The visitor's return value controls pruning. Visitors returning `()` always
/// descend.
pub fn traverse<'tree, F, R>(root: Node<'tree>, mut visit: F)
where
    F: FnMut(Node<'tree>) -> R,
    R: Into<Visit>,
{
    let mut cursor = root.walk();
    let mut depth = 0usize;

    loop {
        match visit(cursor.node()).into() {
            Visit::Stop => return,
            Visit::Descend if cursor.goto_first_child() => {
                depth += 1;
                continue;
            }
            _ => {}
        }

        // Move to the next sibling, climbing until one exists.
        loop {
            if depth == 0 {
                return;
            }
            if cursor.goto_next_sibling() {
                break;
            }
            cursor.goto_parent();
            depth -= 1;
        }
    }
}

/// Collect every node satisfying `predicate`, in pre-order.
pub fn collect_nodes<'tree, P>(root: Node<'tree>, mut predicate: P) -> Vec<Node<'tree>>
where
    P: FnMut(&Node<'tree>) -> bool,
{
    let mut nodes = Vec::new();
    traverse(root, |node| {
        if predicate(&node) {
            nodes.push(node);
        }
    });
    nodes
}
