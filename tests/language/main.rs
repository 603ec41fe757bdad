//! Integration tests for Layer 1: Language
//!
//! Tests for the rule, tag, and action parsers.

mod parser;
mod tags;
