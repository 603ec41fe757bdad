//! Expansion trees.
//!
//! Every expansion builds a tree of nodes stored in an arena owned by an
//! [`ExpansionTree`]. Nodes refer to each other by [`NodeId`]; the parent link
//! exists only for depth bookkeeping and diagnostics.

use std::fmt;

pub use fabula_language::SectionKind as NodeKind;

use crate::error::ExpansionError;

// =============================================================================
// NodeId
// =============================================================================

/// Index of a node within its tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Returns the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

// =============================================================================
// Expansion Records
// =============================================================================

/// What an action did to its target symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingEffect {
    /// The expanded text was bound to the target.
    Push {
        /// The bound text, as generated.
        text: String,
    },
    /// The target's most recent binding was removed.
    Pop,
}

/// An activated action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionRecord {
    /// The symbol that was bound or unbound.
    pub target: String,
    /// What happened to it.
    pub effect: BindingEffect,
}

/// What a tag resolved to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagRecord {
    /// The symbol named by the tag.
    pub symbol: Option<String>,
    /// Modifiers applied to the tag's text, in order.
    pub modifiers: Vec<String>,
    /// The rule chosen for the symbol; `None` for placeholders.
    pub selected_rule: Option<String>,
    /// Actions activated before the symbol was resolved.
    pub preactions: Vec<ActionRecord>,
}

/// Per-kind details recorded when a node is expanded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeRecord {
    /// A resolved tag.
    Tag(TagRecord),
    /// An activated action.
    Action(ActionRecord),
}

// =============================================================================
// Node
// =============================================================================

/// One node of an expansion tree.
#[derive(Clone, Debug)]
pub struct Node {
    /// Node kind.
    pub kind: NodeKind,
    /// Source text (for tags and actions, without delimiters).
    pub raw: String,
    /// Parent node; `None` for the root.
    pub parent: Option<NodeId>,
    /// Children in order.
    pub children: Vec<NodeId>,
    /// Distance from the root of the outermost expansion.
    pub depth: usize,
    /// Generated text; empty until the node is expanded.
    pub finished_text: String,
    /// Whether the node has been expanded.
    pub expanded: bool,
    /// Problems recorded while expanding this node.
    pub errors: Vec<ExpansionError>,
    /// Tag or action details, once expanded.
    pub record: Option<NodeRecord>,
}

impl Node {
    fn new(kind: NodeKind, raw: String, parent: Option<NodeId>, depth: usize) -> Self {
        Self {
            kind,
            raw,
            parent,
            children: Vec::new(),
            depth,
            finished_text: String::new(),
            expanded: false,
            errors: Vec::new(),
            record: None,
        }
    }

    /// Returns the tag record, if this is an expanded tag.
    #[must_use]
    pub fn tag_record(&self) -> Option<&TagRecord> {
        match &self.record {
            Some(NodeRecord::Tag(record)) => Some(record),
            _ => None,
        }
    }

    /// Returns the action record, if this is an activated action.
    #[must_use]
    pub fn action_record(&self) -> Option<&ActionRecord> {
        match &self.record {
            Some(NodeRecord::Action(record)) => Some(record),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?}) d:{}", self.kind, self.raw, self.depth)
    }
}

// =============================================================================
// ExpansionTree
// =============================================================================

/// The arena of nodes produced by one expansion.
#[derive(Clone, Debug)]
pub struct ExpansionTree {
    nodes: Vec<Node>,
}

impl ExpansionTree {
    /// Creates a tree with a single unexpanded raw root.
    #[must_use]
    pub fn new(rule: impl Into<String>) -> Self {
        Self::with_base_depth(rule, 0)
    }

    /// Creates a tree whose root sits at `depth`.
    ///
    /// Used for push payloads so their depth continues from the action that
    /// spawned them.
    #[must_use]
    pub fn with_base_depth(rule: impl Into<String>, depth: usize) -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Raw, rule.into(), None, depth)],
        }
    }

    /// Returns the root id.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns the root node.
    #[must_use]
    pub fn root_node(&self) -> &Node {
        &self.nodes[0]
    }

    /// Returns a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Returns a node, or `None` if `id` does not belong to this tree.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the root's generated text.
    #[must_use]
    pub fn finished_text(&self) -> &str {
        &self.nodes[0].finished_text
    }

    /// Returns true when every node has been expanded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.nodes.iter().all(|node| node.expanded)
    }

    pub(crate) fn add_child(&mut self, parent: NodeId, kind: NodeKind, raw: String) -> NodeId {
        let id = NodeId(self.nodes.len());
        let depth = self.nodes[parent.0].depth + 1;
        self.nodes.push(Node::new(kind, raw, Some(parent), depth));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Returns node ids in pre-order (parent before children, children in order).
    #[must_use]
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        order
    }

    /// Returns the first unexpanded node in pre-order.
    #[must_use]
    pub fn next_unexpanded(&self) -> Option<NodeId> {
        self.pre_order()
            .into_iter()
            .find(|id| !self.nodes[id.0].expanded)
    }

    /// Returns every recorded error with the node it belongs to, in pre-order.
    #[must_use]
    pub fn errors(&self) -> Vec<(NodeId, &ExpansionError)> {
        self.pre_order()
            .into_iter()
            .flat_map(|id| self.nodes[id.0].errors.iter().map(move |e| (id, e)))
            .collect()
    }

    /// Returns true if no node recorded an error.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.nodes.iter().all(|node| node.errors.is_empty())
    }

    /// Returns the ancestors of `id`, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            out.push(parent);
            current = self.nodes[parent.0].parent;
        }
        out
    }
}
