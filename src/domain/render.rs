//! Text renderings of a family tree.

use chrono::Datelike;
use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{TreeArena, TreeNode};

const BRANCH: &str = "├─ ";
const LAST_BRANCH: &str = "└─ ";
const INDENT: &str = "│  ";
const LAST_INDENT: &str = "   ";

/// Short node label: status mark, name and birth year.
pub fn node_label(node: &TreeNode) -> String {
    let status = if node.member.is_alive { "✓" } else { "✗" };
    format!(
        "{} {} ({})",
        status,
        node.member.name,
        node.member.date_of_birth.year()
    )
}

/// Pre-order dump with branch connectors; the root is drawn as a last child.
#[instrument(level = "debug", skip(tree))]
pub fn render_tree_text(tree: &TreeArena) -> String {
    let mut out = String::new();
    // (node, indent inherited from ancestors, is last sibling)
    let mut stack: Vec<(Index, String, bool)> = tree
        .root()
        .map(|root| (root, String::new(), true))
        .into_iter()
        .collect();

    while let Some((idx, indent, is_last)) = stack.pop() {
        let Some(node) = tree.get_node(idx) else {
            continue;
        };
        let (connector, child_indent) = if is_last {
            (LAST_BRANCH, format!("{indent}{LAST_INDENT}"))
        } else {
            (BRANCH, format!("{indent}{INDENT}"))
        };
        out.push_str(&indent);
        out.push_str(connector);
        out.push_str(&node_label(node));
        out.push('\n');

        let last = node.children.len().saturating_sub(1);
        for (i, &child) in node.children.iter().enumerate().rev() {
            stack.push((child, child_indent.clone(), i == last));
        }
    }
    out
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for TreeArena {
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(arena: &TreeArena, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = arena.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = arena.get_node(child_idx) {
                        let mut child_tree = Tree::new(node_label(child));
                        build_tree(arena, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        match self.root().and_then(|idx| self.get_node(idx).map(|node| (idx, node))) {
            Some((root_idx, root)) => {
                let mut tree = Tree::new(node_label(root));
                build_tree(self, root_idx, &mut tree);
                tree
            }
            None => Tree::new("Empty tree".to_string()),
        }
    }
}
