//! Integration tests for Layer 2: Engine
//!
//! Tests for rule selection, symbol bindings, expansion, and stepping.

mod bindings;
mod selection;
mod stepping;

use fabula_engine::{Grammar, GrammarDefinition, GrammarSettings, RuleDefinition};

/// Builds a seeded grammar from `(symbol, rules)` pairs.
pub fn grammar(seed: u64, pairs: &[(&str, &[&str])]) -> Grammar {
    let definition: GrammarDefinition = pairs
        .iter()
        .map(|(key, rules)| ((*key).to_string(), RuleDefinition::from(rules.to_vec())))
        .collect();
    Grammar::from_definition(definition, GrammarSettings::new().with_seed(seed)).unwrap()
}
