//! Rule parser for the Fabula mini-language.
//!
//! A rule is plain text interleaved with two kinds of markup:
//!
//! ```text
//! The #animal.capitalize# [hero:#name#]met #hero#.
//!     ^^^^^^^^^^^^^^^^^^^ ^^^^^^^^^^^^^
//!     tag                 action
//! ```
//!
//! The parser is a single left-to-right scan tracking bracket depth and
//! whether it is inside a tag. Brackets may nest (`[a:[b:c]#b#]`), and `#`
//! only toggles a tag at bracket depth zero. A backslash escapes the next
//! character, which is then copied verbatim into the section being built.
//!
//! Problems are collected as [`SyntaxError`] warnings next to a best-effort
//! list of sections; the parser never fails.

use crate::section::{ParsedRule, Section, SectionKind, SyntaxError};

/// Parses a rule string into literal, tag, and action sections.
#[must_use]
pub fn parse(rule: &str) -> ParsedRule {
    RuleParser::new(rule).run()
}

/// Scanner state for one rule.
struct RuleParser<'src> {
    /// Source text being scanned.
    source: &'src str,
    /// Sections emitted so far.
    sections: Vec<Section>,
    /// Warnings collected so far.
    errors: Vec<SyntaxError>,
    /// Unescaped content of the section under construction.
    buffer: String,
    /// Character index where the section under construction starts.
    start: usize,
    /// Current bracket depth; negative after an unmatched `]`.
    depth: i32,
    /// Whether the scanner is between an opening and closing `#`.
    in_tag: bool,
}

impl<'src> RuleParser<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            sections: Vec::new(),
            errors: Vec::new(),
            buffer: String::with_capacity(source.len()),
            start: 0,
            depth: 0,
            in_tag: false,
        }
    }

    fn run(mut self) -> ParsedRule {
        let mut chars = self.source.chars().enumerate();

        while let Some((index, c)) = chars.next() {
            match c {
                '\\' => {
                    // A trailing lone backslash escapes nothing and is dropped.
                    if let Some((_, escaped)) = chars.next() {
                        self.buffer.push(escaped);
                    }
                }
                '[' => {
                    if self.depth == 0 && !self.in_tag {
                        self.flush_literal();
                        self.start = index + 1;
                    } else {
                        self.buffer.push(c);
                    }
                    self.depth += 1;
                }
                ']' => {
                    self.depth -= 1;
                    if self.depth == 0 && !self.in_tag {
                        self.close(SectionKind::Action);
                        self.start = index + 1;
                    } else {
                        self.buffer.push(c);
                    }
                }
                '#' if self.depth == 0 => {
                    if self.in_tag {
                        self.close(SectionKind::Tag);
                    } else {
                        self.flush_literal();
                    }
                    self.start = index + 1;
                    self.in_tag = !self.in_tag;
                }
                _ => self.buffer.push(c),
            }
        }

        self.flush_literal();

        if self.in_tag {
            self.errors.push(SyntaxError::UnclosedTag);
        }
        if self.depth > 0 {
            self.errors.push(SyntaxError::TooManyOpen);
        }
        if self.depth < 0 {
            self.errors.push(SyntaxError::TooManyClose);
        }

        ParsedRule {
            sections: self.sections,
            errors: self.errors,
        }
    }

    /// Emits pending text as a literal section, if there is any.
    fn flush_literal(&mut self) {
        if !self.buffer.is_empty() {
            let raw = std::mem::take(&mut self.buffer);
            self.sections.push(Section::literal(raw));
        }
    }

    /// Emits the pending content as a delimited section, even when empty.
    fn close(&mut self, kind: SectionKind) {
        let raw = std::mem::take(&mut self.buffer);
        if raw.is_empty() {
            self.errors.push(SyntaxError::ZeroLength {
                position: self.start,
                kind,
            });
        }
        self.sections.push(Section::new(kind, raw));
    }
}
