//! Text rendering helpers for parsed rules.

use std::fmt::Write;

use crate::section::ParsedRule;

/// Characters with a syntactic role in rules.
const SPECIAL: [char; 4] = ['\\', '#', '[', ']'];

/// Renders a parsed rule for diagnostics.
///
/// Each section is shown as `kind("raw")`, followed by each warning as
/// `error("message")`, separated by spaces.
#[must_use]
pub fn parsed_sections_to_text(parsed: &ParsedRule) -> String {
    let mut out = String::new();
    for section in &parsed.sections {
        if !out.is_empty() {
            out.push(' ');
        }
        let _ = write!(out, "{}({:?})", section.kind, section.raw);
    }
    for error in &parsed.errors {
        if !out.is_empty() {
            out.push(' ');
        }
        let _ = write!(out, "error({:?})", error.to_string());
    }
    out
}

/// Escapes text so that it parses back as a single literal section.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
