//! Candidate rules for one binding of a symbol.

use std::fmt;

use fabula_foundation::{Error, RandomSource, Result};
use serde::{Deserialize, Serialize};

use crate::distribution::{Distribution, SelectionStrategy};
use crate::settings::{GrammarSettings, validate_falloff};

// =============================================================================
// RuleDefinition
// =============================================================================

/// A rule definition as written in a grammar file.
///
/// ```json
/// {
///   "name": "Ada",
///   "animal": ["cat", "dog"],
///   "mood": { "rules": ["calm", "wild"], "distribution": "shuffle" }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleDefinition {
    /// A single rule.
    Single(String),
    /// Several candidate rules.
    List(Vec<String>),
    /// Candidate rules with explicit selection settings.
    Configured {
        /// Candidate rules.
        rules: Vec<String>,
        /// Distribution name; the grammar default when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        distribution: Option<String>,
        /// Falloff exponent; the grammar default when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        falloff: Option<f64>,
    },
}

impl RuleDefinition {
    /// Returns the candidate rules in order.
    #[must_use]
    pub fn rules(&self) -> &[String] {
        match self {
            Self::Single(rule) => std::slice::from_ref(rule),
            Self::List(rules) | Self::Configured { rules, .. } => rules,
        }
    }

    /// Normalizes this definition into a rule set for `symbol`.
    ///
    /// # Errors
    ///
    /// Returns an error if the candidate list is empty, the distribution is
    /// not one of `random` or `shuffle`, or the falloff is not positive.
    pub fn into_rule_set(self, symbol: &str, settings: &GrammarSettings) -> Result<RuleSet> {
        let (rules, distribution, falloff) = match self {
            Self::Single(rule) => (vec![rule], None, None),
            Self::List(rules) => (rules, None, None),
            Self::Configured {
                rules,
                distribution,
                falloff,
            } => (rules, distribution, falloff),
        };

        if rules.is_empty() {
            return Err(Error::empty_rule_set(symbol));
        }

        let distribution = match distribution {
            Some(name) => name.parse::<Distribution>()?,
            None => settings.distribution,
        };
        let falloff = falloff.unwrap_or(settings.falloff);
        validate_falloff(falloff)?;

        Ok(RuleSet::from_parts(rules, distribution.strategy(falloff)))
    }
}

impl From<&str> for RuleDefinition {
    fn from(rule: &str) -> Self {
        Self::Single(rule.to_string())
    }
}

impl From<String> for RuleDefinition {
    fn from(rule: String) -> Self {
        Self::Single(rule)
    }
}

impl From<Vec<String>> for RuleDefinition {
    fn from(rules: Vec<String>) -> Self {
        Self::List(rules)
    }
}

impl From<Vec<&str>> for RuleDefinition {
    fn from(rules: Vec<&str>) -> Self {
        Self::List(rules.into_iter().map(str::to_string).collect())
    }
}

// =============================================================================
// RuleSet
// =============================================================================

/// An ordered, non-empty list of candidate rules plus a selection strategy.
pub struct RuleSet {
    rules: Vec<String>,
    strategy: Box<dyn SelectionStrategy>,
    uses: Vec<u64>,
}

impl RuleSet {
    /// Creates a rule set with a single candidate and random selection.
    #[must_use]
    pub fn single(rule: impl Into<String>) -> Self {
        Self::from_parts(vec![rule.into()], Distribution::Random.strategy(1.0))
    }

    /// Creates a rule set with a custom selection strategy.
    ///
    /// # Errors
    ///
    /// Returns an error if `rules` is empty.
    pub fn with_strategy(
        rules: Vec<String>,
        strategy: Box<dyn SelectionStrategy>,
    ) -> Result<Self> {
        if rules.is_empty() {
            return Err(Error::invalid_definition("rule set has no candidate rules"));
        }
        Ok(Self::from_parts(rules, strategy))
    }

    fn from_parts(rules: Vec<String>, strategy: Box<dyn SelectionStrategy>) -> Self {
        let uses = vec![0; rules.len()];
        Self {
            rules,
            strategy,
            uses,
        }
    }

    /// Selects the next rule and records its use.
    pub fn get_rule(&mut self, rng: &mut dyn RandomSource) -> &str {
        let index = self.strategy.select_index(self.rules.len(), rng);
        let index = index.min(self.rules.len() - 1);
        self.uses[index] += 1;
        tracing::trace!(
            index,
            strategy = self.strategy.name(),
            rule = %self.rules[index],
            "selected rule"
        );
        &self.rules[index]
    }

    /// Resets strategy state and usage counts.
    pub fn clear_state(&mut self) {
        self.strategy.reset();
        self.uses.iter_mut().for_each(|n| *n = 0);
    }

    /// Returns the candidate rules.
    #[must_use]
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    /// Returns how often each candidate was selected since the last reset.
    #[must_use]
    pub fn uses(&self) -> &[u64] {
        &self.uses
    }

    /// Returns the number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Always false; a rule set has at least one candidate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the strategy's name.
    #[must_use]
    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Returns a copy with the same rules, a fresh strategy, and zeroed counts.
    #[must_use]
    pub fn fresh_copy(&self) -> Self {
        Self::from_parts(self.rules.clone(), self.strategy.fresh())
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.rules)
            .field("strategy", &self.strategy)
            .field("uses", &self.uses)
            .finish()
    }
}
