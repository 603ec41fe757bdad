//! Text rendering of expansion trees.

use std::fmt::Write;

use fabula_engine::{ExpansionTree, NodeId};

/// Renders `tree` as an indented outline.
///
/// Each line shows a node's kind, source, and text; unexpanded nodes show
/// `...` instead of text. The node that [`Grammar::step`] would expand next
/// is marked with `<- next`, and recorded errors follow their node.
///
/// [`Grammar::step`]: fabula_engine::Grammar::step
#[must_use]
pub fn render_tree(tree: &ExpansionTree) -> String {
    let mut out = String::new();
    let next = tree.next_unexpanded();
    render_node(tree, tree.root(), next, "", "", &mut out);
    out
}

fn render_node(
    tree: &ExpansionTree,
    id: NodeId,
    next: Option<NodeId>,
    lead: &str,
    child_lead: &str,
    out: &mut String,
) {
    let node = tree.node(id);
    let _ = write!(out, "{lead}{} {:?}", node.kind, node.raw);
    if node.expanded {
        let _ = write!(out, " => {:?}", node.finished_text);
    } else {
        out.push_str(" ...");
    }
    if next == Some(id) {
        out.push_str("  <- next");
    }
    out.push('\n');

    let has_children = !node.children.is_empty();
    for error in &node.errors {
        let bar = if has_children { "│ " } else { "  " };
        let _ = writeln!(out, "{child_lead}{bar}! {error}");
    }

    let count = node.children.len();
    for (i, &child) in node.children.iter().enumerate() {
        let last = i + 1 == count;
        let (branch, continuation) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        render_node(
            tree,
            child,
            next,
            &format!("{child_lead}{branch}"),
            &format!("{child_lead}{continuation}"),
            out,
        );
    }
}
