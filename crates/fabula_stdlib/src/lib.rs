//! Standard modifiers for Fabula grammars.
//!
//! This crate provides the base English modifier set:
//! - Case: `capitalize`, `capitalizeAll`, `uppercase`, `lowercase`
//! - Inflection: `a`, `s`, `firstS`, `ed`
//! - Punctuation: `inQuotes`, `comma`, `beeSpeak`
//!
//! # Example
//!
//! ```
//! use fabula_engine::{Grammar, GrammarSettings};
//!
//! let mut grammar = Grammar::new(GrammarSettings::new().with_seed(0)).unwrap();
//! fabula_stdlib::register(&mut grammar);
//! grammar.push_rules("animal", "owl").unwrap();
//! assert_eq!(grammar.flatten("#animal.a.capitalize#").unwrap(), "An owl");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod english;

use fabula_engine::Grammar;

pub use english::english_modifiers;

/// Registers the base English modifiers on `grammar`.
pub fn register(grammar: &mut Grammar) {
    grammar.add_modifiers(english_modifiers());
}
