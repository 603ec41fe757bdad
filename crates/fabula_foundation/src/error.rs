//! Fatal grammar errors.
//!
//! These are the *fatal* errors: structural misuse of a grammar (popping a
//! permanent rule set, runaway recursion) and invalid definitions. Authoring
//! mistakes inside rules, such as an undefined symbol, are not errors at this
//! level; the engine records them next to the generated text instead.

use std::fmt;

use thiserror::Error;

/// An error from loading, configuring, or expanding a grammar.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// What went wrong.
    pub kind: ErrorKind,
    /// The file and rule stack involved, when known.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Wraps `kind` without context.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Attaches `context`, replacing any previous context.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an undefined symbol error.
    #[must_use]
    pub fn undefined_symbol(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UndefinedSymbol(name.into()))
    }

    /// Creates an error for popping the permanent base rules of a symbol.
    #[must_use]
    pub fn pop_base_rules(symbol: impl Into<String>) -> Self {
        Self::new(ErrorKind::PopBaseRules(symbol.into()))
    }

    /// Creates an error for popping a symbol that does not exist.
    #[must_use]
    pub fn pop_undefined_symbol(symbol: impl Into<String>) -> Self {
        Self::new(ErrorKind::PopUndefinedSymbol(symbol.into()))
    }

    /// Creates an error for a rule set without candidates.
    #[must_use]
    pub fn empty_rule_set(symbol: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptyRuleSet(symbol.into()))
    }

    /// Creates an invalid grammar definition error.
    #[must_use]
    pub fn invalid_definition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidDefinition(message.into()))
    }

    /// Creates an invalid setting error.
    #[must_use]
    pub fn invalid_setting(name: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidSetting {
            name,
            message: message.into(),
        })
    }

    /// Creates an expansion limit exceeded error.
    #[must_use]
    pub fn limit_exceeded(limit: ExpansionLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }
}

/// The distinct failures callers match on.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Symbol was not defined where a definition is required.
    #[error("undefined symbol: {0}")]
    UndefinedSymbol(String),

    /// Attempted to pop the base rule set of a symbol.
    #[error("cannot pop base rules of symbol: {0}")]
    PopBaseRules(String),

    /// Attempted to pop rules from a symbol that does not exist.
    #[error("no symbol to pop: {0}")]
    PopUndefinedSymbol(String),

    /// A rule set was defined with no candidate rules.
    #[error("symbol {0} has no candidate rules")]
    EmptyRuleSet(String),

    /// The grammar definition could not be interpreted.
    #[error("invalid grammar definition: {0}")]
    InvalidDefinition(String),

    /// A configuration value is out of range.
    #[error("invalid setting {name}: {message}")]
    InvalidSetting {
        /// The setting that was rejected.
        name: &'static str,
        /// Why it was rejected.
        message: String,
    },

    /// Expansion limit exceeded (kill switch triggered).
    #[error("limit exceeded: {0}")]
    LimitExceeded(ExpansionLimit),

    /// I/O error while reading or writing grammar files.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Error while decoding or encoding a definition.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// A broken engine invariant or a terminal setup failure.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Expansion limits (kill switches) that can be exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionLimit {
    /// Maximum expansion tree depth exceeded.
    MaxDepth {
        /// The configured limit.
        limit: usize,
        /// The raw text of the node that crossed the limit.
        rule: Option<String>,
    },
}

impl fmt::Display for ExpansionLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxDepth { limit, rule } => {
                write!(f, "max expansion depth ({limit}) exceeded")?;
                if let Some(rule) = rule {
                    write!(f, " while expanding {rule:?}")?;
                }
                Ok(())
            }
        }
    }
}

/// Where an error happened: the grammar file and the rules being expanded.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source file or symbol name.
    pub source: Option<String>,
    /// Stack of rules being expanded, outermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// No source and an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the file or symbol the error came from.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Pushes one more rule onto the stack.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}

/// Result with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
