//! Rule selection, symbol scopes, and the expansion engine for Fabula.
//!
//! This crate provides:
//! - [`Grammar`] - Symbol table, modifiers, sub-grammars, and the public API
//! - [`RuleSet`] / [`RuleDefinition`] - Candidate rules and their selection
//! - [`SymbolScope`] - Per-symbol stacks of dynamic bindings
//! - [`ExpansionTree`] - The node arena built by an expansion
//! - [`SelectionStrategy`] - The extension point for distributions

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod distribution;
pub mod error;
mod expand;
pub mod grammar;
pub mod node;
pub mod rule_set;
pub mod settings;
pub mod symbol;

pub use distribution::{Distribution, RandomPick, SelectionStrategy, ShuffleDeck};
pub use error::ExpansionError;
pub use grammar::{Grammar, GrammarDefinition, Modifier, placeholder};
pub use node::{
    ActionRecord, BindingEffect, ExpansionTree, Node, NodeId, NodeKind, NodeRecord, TagRecord,
};
pub use rule_set::{RuleDefinition, RuleSet};
pub use settings::{DEFAULT_MAX_DEPTH, GrammarSettings, MAX_DEPTH_LIMIT};
pub use symbol::SymbolScope;
