//! Trace event and record types.
//!
//! Events are derived from a finished (or partially stepped) expansion tree,
//! one group per node in pre-order.

use fabula_engine::{BindingEffect, ExpansionError, ExpansionTree, NodeId, NodeRecord};
use serde::Serialize;

// =============================================================================
// Trace Event
// =============================================================================

/// Something that happened while expanding a node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum TraceEvent {
    /// A node was expanded.
    Expand {
        /// Node index within its tree.
        node: usize,
        /// Node kind name.
        kind: &'static str,
        /// Node source text.
        raw: String,
        /// Text the node produced.
        text: String,
    },

    /// A tag chose a rule for its symbol.
    RuleSelected {
        /// Node index of the tag.
        node: usize,
        /// The symbol.
        symbol: String,
        /// The chosen rule.
        rule: String,
    },

    /// An action bound text to a symbol.
    BindingPushed {
        /// Node index of the action or tag.
        node: usize,
        /// The bound symbol.
        target: String,
        /// The bound text.
        text: String,
    },

    /// An action removed a symbol's most recent binding.
    BindingPopped {
        /// Node index of the action or tag.
        node: usize,
        /// The unbound symbol.
        target: String,
    },

    /// A known modifier was applied to a tag's text.
    ModifierApplied {
        /// Node index of the tag.
        node: usize,
        /// The modifier name.
        modifier: String,
    },

    /// A tag used a modifier no grammar registers.
    UnknownModifier {
        /// Node index of the tag.
        node: usize,
        /// The modifier name.
        modifier: String,
    },

    /// Any other recorded problem.
    Issue {
        /// Node index.
        node: usize,
        /// The rendered error.
        message: String,
    },
}

impl TraceEvent {
    /// Returns a short name for the event type.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Expand { .. } => "expand",
            Self::RuleSelected { .. } => "rule-selected",
            Self::BindingPushed { .. } => "binding-pushed",
            Self::BindingPopped { .. } => "binding-popped",
            Self::ModifierApplied { .. } => "modifier-applied",
            Self::UnknownModifier { .. } => "unknown-modifier",
            Self::Issue { .. } => "issue",
        }
    }

    /// Returns the index of the node this event belongs to.
    #[must_use]
    pub fn node(&self) -> usize {
        match self {
            Self::Expand { node, .. }
            | Self::RuleSelected { node, .. }
            | Self::BindingPushed { node, .. }
            | Self::BindingPopped { node, .. }
            | Self::ModifierApplied { node, .. }
            | Self::UnknownModifier { node, .. }
            | Self::Issue { node, .. } => *node,
        }
    }

    /// Returns true if this event changed a symbol binding.
    #[must_use]
    pub fn is_binding_event(&self) -> bool {
        matches!(
            self,
            Self::BindingPushed { .. } | Self::BindingPopped { .. }
        )
    }

    /// Returns true if this event reports a problem.
    #[must_use]
    pub fn is_problem(&self) -> bool {
        matches!(self, Self::UnknownModifier { .. } | Self::Issue { .. })
    }

    /// Derives the events for every expanded node of `tree`, in pre-order.
    #[must_use]
    pub fn from_tree(tree: &ExpansionTree) -> Vec<(usize, Self)> {
        let mut events = Vec::new();
        for id in tree.pre_order() {
            let node = tree.node(id);
            if !node.expanded {
                continue;
            }
            let depth = node.depth;
            events.extend(Self::for_node(tree, id).into_iter().map(|e| (depth, e)));
        }
        events
    }

    fn for_node(tree: &ExpansionTree, id: NodeId) -> Vec<Self> {
        let node = tree.node(id);
        let index = id.index();
        let mut events = vec![Self::Expand {
            node: index,
            kind: node.kind.name(),
            raw: node.raw.clone(),
            text: node.finished_text.clone(),
        }];

        let unknown: Vec<&str> = node
            .errors
            .iter()
            .filter_map(|e| match e {
                ExpansionError::UnknownModifier(name) => Some(name.as_str()),
                _ => None,
            })
            .collect();

        match &node.record {
            Some(NodeRecord::Tag(record)) => {
                for action in &record.preactions {
                    events.push(Self::binding(index, &action.target, &action.effect));
                }
                if let (Some(symbol), Some(rule)) = (&record.symbol, &record.selected_rule) {
                    events.push(Self::RuleSelected {
                        node: index,
                        symbol: symbol.clone(),
                        rule: rule.clone(),
                    });
                }
                for modifier in &record.modifiers {
                    let event = if unknown.contains(&modifier.as_str()) {
                        Self::UnknownModifier {
                            node: index,
                            modifier: modifier.clone(),
                        }
                    } else {
                        Self::ModifierApplied {
                            node: index,
                            modifier: modifier.clone(),
                        }
                    };
                    events.push(event);
                }
            }
            Some(NodeRecord::Action(record)) => {
                events.push(Self::binding(index, &record.target, &record.effect));
            }
            None => {}
        }

        for error in &node.errors {
            if !matches!(error, ExpansionError::UnknownModifier(_)) {
                events.push(Self::Issue {
                    node: index,
                    message: error.to_string(),
                });
            }
        }

        events
    }

    fn binding(node: usize, target: &str, effect: &BindingEffect) -> Self {
        match effect {
            BindingEffect::Push { text } => Self::BindingPushed {
                node,
                target: target.to_string(),
                text: text.clone(),
            },
            BindingEffect::Pop => Self::BindingPopped {
                node,
                target: target.to_string(),
            },
        }
    }
}

// =============================================================================
// Trace Record
// =============================================================================

/// A numbered trace record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TraceRecord {
    /// Unique record ID within the tracer.
    pub id: u64,
    /// The generation (run) this event belongs to.
    pub generation: u64,
    /// Depth of the node in the expansion tree.
    pub depth: usize,
    /// The trace event.
    #[serde(flatten)]
    pub event: TraceEvent,
}

impl TraceRecord {
    /// Creates a new trace record.
    #[must_use]
    pub fn new(id: u64, generation: u64, depth: usize, event: TraceEvent) -> Self {
        Self {
            id,
            generation,
            depth,
            event,
        }
    }

    /// Returns the event type name.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }
}

// =============================================================================
// Tests
// =============================================================================
