//! Grammar-wide configuration.

use fabula_foundation::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::distribution::Distribution;

/// Default bound on expansion tree depth.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Largest accepted `max_depth`.
///
/// Expansion recurses once per tree level, so deeper limits could exhaust a
/// default 2 MiB thread stack before the limit is reached.
pub const MAX_DEPTH_LIMIT: usize = 400;

/// Settings shared by every symbol of a grammar.
///
/// Rule sets that do not name their own distribution or falloff inherit
/// these defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarSettings {
    /// Distribution for rule sets that do not choose one.
    pub distribution: Distribution,
    /// Falloff exponent for random selection.
    pub falloff: f64,
    /// Deepest node an expansion may create before aborting.
    pub max_depth: usize,
    /// Seed for the grammar's random source; `None` draws one from entropy.
    pub seed: Option<u64>,
}

impl Default for GrammarSettings {
    fn default() -> Self {
        Self {
            distribution: Distribution::Random,
            falloff: 1.0,
            max_depth: DEFAULT_MAX_DEPTH,
            seed: None,
        }
    }
}

impl GrammarSettings {
    /// Creates default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default distribution.
    #[must_use]
    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Sets the default falloff.
    #[must_use]
    pub fn with_falloff(mut self, falloff: f64) -> Self {
        self.falloff = falloff;
        self
    }

    /// Sets the maximum expansion depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that every value is in range.
    ///
    /// # Errors
    ///
    /// Returns an invalid setting error for a non-positive or non-finite
    /// falloff, or a `max_depth` outside `1..=MAX_DEPTH_LIMIT`.
    pub fn validate(&self) -> Result<()> {
        validate_falloff(self.falloff)?;
        if self.max_depth == 0 {
            return Err(Error::invalid_setting("max_depth", "must be at least 1"));
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(Error::invalid_setting(
                "max_depth",
                format!("must be at most {MAX_DEPTH_LIMIT}, got {}", self.max_depth),
            ));
        }
        Ok(())
    }
}

/// Checks a falloff exponent.
///
/// # Errors
///
/// Returns an invalid setting error unless `falloff` is finite and positive.
pub fn validate_falloff(falloff: f64) -> Result<()> {
    if falloff.is_finite() && falloff > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_setting(
            "falloff",
            format!("must be a positive number, got {falloff}"),
        ))
    }
}
