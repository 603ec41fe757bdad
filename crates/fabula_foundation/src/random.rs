//! Random-number capability consumed by rule selection.
//!
//! The engine only ever asks for "the next float in `[0, 1)`". Seeding and
//! determinism policy belong to whoever constructs the source.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A source of uniformly distributed floats in `[0, 1)`.
pub trait RandomSource {
    /// Returns the next value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Deterministic random source backed by ChaCha8.
///
/// Two sources built from the same seed produce the same sequence on every
/// platform.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededRandom {
    /// Creates a source from an explicit seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a source with a freshly drawn seed.
    ///
    /// The seed is still recorded, so the run can be reproduced later.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().r#gen())
    }

    /// Returns the seed this source was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Restarts the sequence from a new seed.
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}

/// A scripted source that replays a fixed list of values, cycling forever.
///
/// Useful for tests and for reproducing a selection by hand. Values outside
/// `[0, 1)` are clamped into range; an empty script always yields `0.0`.
#[derive(Clone, Debug, Default)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceRandom {
    /// Largest `f64` strictly below one.
    const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

    /// Creates a scripted source.
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let values = values
            .into_iter()
            .map(|v| {
                if v.is_nan() || v < 0.0 {
                    0.0
                } else if v >= 1.0 {
                    Self::BELOW_ONE
                } else {
                    v
                }
            })
            .collect();
        Self { values, cursor: 0 }
    }

    /// Number of values drawn so far.
    #[must_use]
    pub const fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceRandom {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
