//! Rule, tag, and action parsers for the Fabula grammar mini-language.
//!
//! This crate provides:
//! - [`parse`] - Split a rule into literal, tag, and action sections
//! - [`parse_tag`] - Decompose a tag into symbol, modifiers, and preactions
//! - [`parse_action`] - Decompose an action into a push or a pop
//! - [`parsed_sections_to_text`] - Diagnostic rendering of a parsed rule
//!
//! # Example
//!
//! ```
//! use fabula_language::{Section, parse};
//!
//! let parsed = parse("a #b#");
//! assert_eq!(parsed.sections, vec![Section::literal("a "), Section::tag("b")]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod action;
pub mod parser;
pub mod render;
pub mod section;
pub mod tag;

pub use action::{ActionKind, ActionSpec, POP_MARKER, parse_action};
pub use parser::parse;
pub use render::{escape, parsed_sections_to_text};
pub use section::{ParsedRule, Section, SectionKind, SyntaxError};
pub use tag::{TagSpec, parse_tag};
