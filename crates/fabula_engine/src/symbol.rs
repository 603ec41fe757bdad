//! Per-symbol stacks of rule sets.
//!
//! The bottom of the stack is the symbol's base definition. Push actions add
//! rule sets on top, and only the top one is consulted when the symbol is
//! selected.

use fabula_foundation::{Error, RandomSource, Result};

use crate::rule_set::RuleSet;

/// The stack of rule sets bound to one symbol name.
#[derive(Debug)]
pub struct SymbolScope {
    key: String,
    stack: Vec<RuleSet>,
    dynamic: bool,
    uses: u64,
}

impl SymbolScope {
    /// Creates a scope whose base is `base`.
    #[must_use]
    pub fn new(key: impl Into<String>, base: RuleSet) -> Self {
        Self {
            key: key.into(),
            stack: vec![base],
            dynamic: false,
            uses: 0,
        }
    }

    /// Creates a scope that exists only because an action bound it.
    #[must_use]
    pub fn dynamic(key: impl Into<String>, first: RuleSet) -> Self {
        Self {
            dynamic: true,
            ..Self::new(key, first)
        }
    }

    /// Returns the symbol name.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns true if this scope was created by a push action.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Returns the number of rule sets on the stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns the stack, base first.
    #[must_use]
    pub fn stack(&self) -> &[RuleSet] {
        &self.stack
    }

    /// Returns the active rule set.
    #[must_use]
    pub fn active(&self) -> &RuleSet {
        // The stack is never empty.
        &self.stack[self.stack.len() - 1]
    }

    /// Returns the base rule set.
    #[must_use]
    pub fn base(&self) -> &RuleSet {
        &self.stack[0]
    }

    /// Returns how many times this symbol was selected since the last reset.
    #[must_use]
    pub fn uses(&self) -> u64 {
        self.uses
    }

    /// Selects a rule from the active rule set.
    pub fn select_rule(&mut self, rng: &mut dyn RandomSource) -> String {
        self.uses += 1;
        let last = self.stack.len() - 1;
        self.stack[last].get_rule(rng).to_string()
    }

    /// Pushes a rule set, making it active.
    pub fn push_rules(&mut self, rules: RuleSet) {
        self.stack.push(rules);
        tracing::debug!(symbol = %self.key, depth = self.stack.len(), "pushed rules");
    }

    /// Pops the active rule set.
    ///
    /// # Errors
    ///
    /// Returns [`PopBaseRules`](fabula_foundation::ErrorKind::PopBaseRules)
    /// if only the base rule set is left.
    pub fn pop_rules(&mut self) -> Result<RuleSet> {
        if self.stack.len() <= 1 {
            return Err(Error::pop_base_rules(&self.key));
        }
        let popped = self.stack.pop().ok_or_else(|| Error::pop_base_rules(&self.key))?;
        tracing::debug!(symbol = %self.key, depth = self.stack.len(), "popped rules");
        Ok(popped)
    }

    /// Drops pushed rule sets and resets the base.
    pub fn clear_state(&mut self) {
        self.stack.truncate(1);
        self.stack[0].clear_state();
        self.uses = 0;
    }
}
