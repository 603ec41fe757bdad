//! Rule selection strategies.
//!
//! A strategy only chooses an index into a candidate list. The list itself,
//! and the usage counts kept for introspection, live in [`RuleSet`].
//!
//! [`RuleSet`]: crate::rule_set::RuleSet

use std::fmt;
use std::str::FromStr;

use fabula_foundation::RandomSource;
use serde::{Deserialize, Serialize};

// =============================================================================
// Distribution
// =============================================================================

/// The named distributions a grammar definition may request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    /// Independent draws, skewed by `falloff`.
    #[default]
    Random,
    /// Every candidate once per cycle, in shuffled order.
    Shuffle,
}

impl Distribution {
    /// Returns the name used in definitions.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Shuffle => "shuffle",
        }
    }

    /// Builds a fresh strategy for this distribution.
    #[must_use]
    pub fn strategy(self, falloff: f64) -> Box<dyn SelectionStrategy> {
        match self {
            Self::Random => Box::new(RandomPick::new(falloff)),
            Self::Shuffle => Box::new(ShuffleDeck::new()),
        }
    }
}

impl FromStr for Distribution {
    type Err = fabula_foundation::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "shuffle" => Ok(Self::Shuffle),
            other => Err(fabula_foundation::Error::invalid_definition(format!(
                "unsupported distribution {other:?} (expected \"random\" or \"shuffle\")"
            ))),
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// SelectionStrategy
// =============================================================================

/// Chooses which candidate rule a [`RuleSet`](crate::rule_set::RuleSet) yields next.
pub trait SelectionStrategy: fmt::Debug + Send {
    /// Returns an index in `0..count`. `count` is never zero.
    fn select_index(&mut self, count: usize, rng: &mut dyn RandomSource) -> usize;

    /// Forgets any strategy-local state.
    fn reset(&mut self);

    /// Short name for diagnostics.
    fn name(&self) -> &str;

    /// Returns a fresh strategy with the same configuration and no state.
    fn fresh(&self) -> Box<dyn SelectionStrategy>;
}

// =============================================================================
// RandomPick
// =============================================================================

/// Uniform pick, optionally skewed toward early candidates.
///
/// The index is `floor(r^falloff * count)`. A falloff of 1 is uniform;
/// larger values favour the first candidates.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomPick {
    falloff: f64,
}

impl RandomPick {
    /// Creates a random strategy with the given falloff exponent.
    #[must_use]
    pub const fn new(falloff: f64) -> Self {
        Self { falloff }
    }

    /// Returns the falloff exponent.
    #[must_use]
    pub const fn falloff(&self) -> f64 {
        self.falloff
    }
}

impl Default for RandomPick {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl SelectionStrategy for RandomPick {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn select_index(&mut self, count: usize, rng: &mut dyn RandomSource) -> usize {
        let r = rng.next_f64().powf(self.falloff);
        let index = (r * count as f64).floor() as usize;
        index.min(count.saturating_sub(1))
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        Distribution::Random.name()
    }

    fn fresh(&self) -> Box<dyn SelectionStrategy> {
        Box::new(self.clone())
    }
}

// =============================================================================
// ShuffleDeck
// =============================================================================

/// Deals every candidate exactly once per cycle.
///
/// When the deck runs out it is rebuilt with a Fisher-Yates shuffle and dealt
/// from the end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShuffleDeck {
    deck: Vec<usize>,
}

impl ShuffleDeck {
    /// Creates an empty deck; the first draw shuffles.
    #[must_use]
    pub const fn new() -> Self {
        Self { deck: Vec::new() }
    }

    /// Returns the indices still to be dealt in this cycle, last dealt first.
    #[must_use]
    pub fn remaining(&self) -> &[usize] {
        &self.deck
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn shuffle(&mut self, count: usize, rng: &mut dyn RandomSource) {
        self.deck = (0..count).collect();
        let mut i = count;
        while i != 0 {
            let j = ((rng.next_f64() * i as f64).floor() as usize).min(i - 1);
            i -= 1;
            self.deck.swap(i, j);
        }
    }
}

impl SelectionStrategy for ShuffleDeck {
    fn select_index(&mut self, count: usize, rng: &mut dyn RandomSource) -> usize {
        // A deck left over from a longer candidate list is discarded.
        if self.deck.iter().any(|&index| index >= count) {
            self.deck.clear();
        }
        if self.deck.is_empty() {
            self.shuffle(count, rng);
        }
        self.deck.pop().unwrap_or(0)
    }

    fn reset(&mut self) {
        self.deck.clear();
    }

    fn name(&self) -> &str {
        Distribution::Shuffle.name()
    }

    fn fresh(&self) -> Box<dyn SelectionStrategy> {
        Box::new(Self::new())
    }
}
