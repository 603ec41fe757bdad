//! Parsed rule sections and syntax warnings.

use std::fmt;

use thiserror::Error;

/// The kind of a parsed section (and of an expansion node).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// An unparsed rule; only ever created by the expansion engine.
    Raw,
    /// Plain text, already unescaped.
    Literal,
    /// A symbol reference, `#symbol.modifier#`.
    Tag,
    /// A binding action, `[target:rule]` or `[target:POP]`.
    Action,
}

impl SectionKind {
    /// Returns the lowercase name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Literal => "literal",
            Self::Tag => "tag",
            Self::Action => "action",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One section of a parsed rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    /// What kind of section this is.
    pub kind: SectionKind,
    /// The section's content with delimiters removed and escapes applied.
    pub raw: String,
}

impl Section {
    /// Creates a section.
    #[must_use]
    pub fn new(kind: SectionKind, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
        }
    }

    /// Creates a literal section.
    #[must_use]
    pub fn literal(raw: impl Into<String>) -> Self {
        Self::new(SectionKind::Literal, raw)
    }

    /// Creates a tag section.
    #[must_use]
    pub fn tag(raw: impl Into<String>) -> Self {
        Self::new(SectionKind::Tag, raw)
    }

    /// Creates an action section.
    #[must_use]
    pub fn action(raw: impl Into<String>) -> Self {
        Self::new(SectionKind::Action, raw)
    }
}

/// A non-fatal syntax problem found while parsing a rule, tag, or action.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SyntaxError {
    /// A tag or action with no content (`##`, `[]`).
    #[error("{position}: 0-length section of type {kind}")]
    ZeroLength {
        /// Character index where the empty section's content starts.
        position: usize,
        /// The kind of the empty section.
        kind: SectionKind,
    },

    /// Input ended inside a tag.
    #[error("Unclosed tag")]
    UnclosedTag,

    /// More `[` than `]`.
    #[error("Too many [")]
    TooManyOpen,

    /// More `]` than `[`.
    #[error("Too many ]")]
    TooManyClose,

    /// A tag contained more than one symbol section.
    #[error("Multiple main sections in tag: {0}")]
    MultipleMainSections(String),

    /// An action without a `target:` prefix.
    #[error("Action has no target: {0}")]
    MissingActionTarget(String),
}

/// The result of parsing a rule: its sections plus any warnings.
///
/// Warnings never prevent a best-effort parse; callers decide whether to
/// treat them as fatal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedRule {
    /// Sections in source order.
    pub sections: Vec<Section>,
    /// Warnings in the order they were found.
    pub errors: Vec<SyntaxError>,
}

impl ParsedRule {
    /// Returns true if parsing produced no warnings.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns true if there are no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Returns an iterator over the sections.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Returns true if any warning renders as the given message.
    #[must_use]
    pub fn has_error(&self, message: &str) -> bool {
        self.errors.iter().any(|e| e.to_string() == message)
    }
}
