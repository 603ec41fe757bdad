//! Snapshots of a grammar's symbol stacks.

use std::fmt;

use fabula_engine::{Grammar, RuleSet, SymbolScope};
use serde::Serialize;

/// One rule set on a symbol's stack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RuleSetSnapshot {
    /// Candidate rules.
    pub rules: Vec<String>,
    /// Selections per candidate since the last reset.
    pub uses: Vec<u64>,
    /// Strategy name.
    pub strategy: String,
}

impl From<&RuleSet> for RuleSetSnapshot {
    fn from(set: &RuleSet) -> Self {
        Self {
            rules: set.rules().to_vec(),
            uses: set.uses().to_vec(),
            strategy: set.strategy_name().to_string(),
        }
    }
}

/// A symbol's full stack of bindings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SymbolSnapshot {
    /// Symbol name.
    pub key: String,
    /// Whether an action created the symbol.
    pub dynamic: bool,
    /// Selections since the last reset.
    pub uses: u64,
    /// Rule sets, base first; the last one is active.
    pub stack: Vec<RuleSetSnapshot>,
}

impl SymbolSnapshot {
    /// Returns the active rule set.
    #[must_use]
    pub fn active(&self) -> Option<&RuleSetSnapshot> {
        self.stack.last()
    }
}

impl From<&SymbolScope> for SymbolSnapshot {
    fn from(scope: &SymbolScope) -> Self {
        Self {
            key: scope.key().to_string(),
            dynamic: scope.is_dynamic(),
            uses: scope.uses(),
            stack: scope.stack().iter().map(RuleSetSnapshot::from).collect(),
        }
    }
}

impl fmt::Display for SymbolSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)?;
        if self.dynamic {
            write!(f, " (dynamic)")?;
        }
        writeln!(f, " used {}x", self.uses)?;
        let last = self.stack.len().saturating_sub(1);
        for (level, set) in self.stack.iter().enumerate() {
            let marker = if level == last { '*' } else { ' ' };
            writeln!(f, "  {marker}{level} [{}] {:?}", set.strategy, set.rules)?;
        }
        Ok(())
    }
}

/// Snapshots every symbol of `grammar`, ordered by name.
#[must_use]
pub fn snapshot(grammar: &Grammar) -> Vec<SymbolSnapshot> {
    grammar.symbols().map(SymbolSnapshot::from).collect()
}

/// Snapshots one symbol.
#[must_use]
pub fn snapshot_symbol(grammar: &Grammar, key: &str) -> Option<SymbolSnapshot> {
    grammar.symbol(key).map(SymbolSnapshot::from)
}
