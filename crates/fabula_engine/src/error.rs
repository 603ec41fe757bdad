//! Non-fatal expansion errors.
//!
//! These are recorded on the node where they happened and returned together
//! with the generated text. They never abort an expansion; structural misuse
//! is reported through [`fabula_foundation::Error`] instead.

use fabula_language::SyntaxError;
use thiserror::Error;

/// A problem recorded on an expansion node.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExpansionError {
    /// A warning from parsing a rule, tag, or action.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// A tag named a symbol no grammar defines.
    #[error("No symbol for key: {0}")]
    UndefinedSymbol(String),

    /// A tag named no symbol at all.
    #[error("Child rule not created")]
    MissingRule,

    /// A tag applied a modifier no grammar registers.
    #[error("Unknown modifier: {0}")]
    UnknownModifier(String),
}
