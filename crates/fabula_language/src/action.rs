//! Action parser.
//!
//! An action's content is `target:rest`. When `rest` is exactly `POP` the
//! action pops the target's most recent binding; otherwise `rest` is a rule
//! that is expanded and pushed as the target's new binding.

use crate::section::SyntaxError;

/// The marker that turns an action into a pop.
pub const POP_MARKER: &str = "POP";

/// What an action does to its target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionKind {
    /// Expand `rule` and bind the result to the target.
    Push {
        /// The rule to expand before binding.
        rule: String,
    },
    /// Remove the target's most recent binding.
    Pop,
}

/// A parsed action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionSpec {
    /// The symbol the action binds or unbinds.
    pub target: String,
    /// Push or pop.
    pub kind: ActionKind,
}

impl ActionSpec {
    /// Returns true for pop actions.
    #[must_use]
    pub fn is_pop(&self) -> bool {
        matches!(self.kind, ActionKind::Pop)
    }
}

/// Parses the content between an action's brackets.
///
/// Everything after the first colon is the rule, so rules may themselves
/// contain colons.
///
/// # Errors
///
/// Returns [`SyntaxError::MissingActionTarget`] if there is no colon or the
/// target before it is empty.
pub fn parse_action(raw: &str) -> Result<ActionSpec, SyntaxError> {
    let Some((target, rest)) = raw.split_once(':') else {
        return Err(SyntaxError::MissingActionTarget(raw.to_string()));
    };
    if target.is_empty() {
        return Err(SyntaxError::MissingActionTarget(raw.to_string()));
    }

    let kind = if rest == POP_MARKER {
        ActionKind::Pop
    } else {
        ActionKind::Push {
            rule: rest.to_string(),
        }
    };

    Ok(ActionSpec {
        target: target.to_string(),
        kind,
    })
}
