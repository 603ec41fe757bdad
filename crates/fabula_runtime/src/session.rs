//! Generation sessions.
//!
//! A session owns a grammar (with the standard modifiers registered) plus the
//! policy for running it: which symbol to start from, how many texts to
//! produce per run, and which seed to use.

use std::path::Path;

use fabula_debug::{Tracer, TracerConfig};
use fabula_engine::{ExpansionTree, Grammar, GrammarSettings, NodeId};
use fabula_foundation::{Error, Result};
use rand::Rng;

use crate::loader;

/// Upper bound (exclusive) for freshly drawn seeds.
const SEED_RANGE: u64 = 10_000_000;

/// Default start symbol.
pub const DEFAULT_ORIGIN: &str = "origin";

/// Session configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Symbol that every run expands, as `#origin#`.
    pub origin: String,
    /// Number of texts per run.
    pub count: usize,
    /// Starting seed; drawn at random when `None`.
    pub seed: Option<u64>,
    /// Keep the seed between runs.
    pub seed_locked: bool,
    /// Record an expansion trace for every generated text.
    pub trace: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            count: 1,
            seed: None,
            seed_locked: false,
            trace: false,
        }
    }
}

impl SessionConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start symbol.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Sets the number of texts per run.
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Fixes the seed. An explicit seed is locked so that runs repeat.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.seed_locked = true;
        self
    }

    /// Enables expansion tracing.
    #[must_use]
    pub fn with_trace(mut self) -> Self {
        self.trace = true;
        self
    }
}

/// A grammar plus its generation policy.
pub struct Session {
    grammar: Grammar,
    config: SessionConfig,
    /// Seed of the current (or next, when unlocked) run.
    seed: u64,
    tracer: Tracer,
    /// Texts from the latest run.
    generated: Vec<ExpansionTree>,
    /// Tree being stepped through, if any.
    stepping: Option<ExpansionTree>,
}

impl Session {
    /// Creates a session with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be created.
    pub fn new() -> Result<Self> {
        Self::with_config(SessionConfig::default())
    }

    /// Creates a session from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an invalid setting error for a zero `count`.
    pub fn with_config(config: SessionConfig) -> Result<Self> {
        validate_count(config.count)?;
        let seed = config.seed.unwrap_or_else(fresh_seed);
        let mut grammar = Grammar::new(GrammarSettings::new().with_seed(seed))?;
        fabula_stdlib::register(&mut grammar);

        let tracer = if config.trace {
            Tracer::new(TracerConfig::new().enabled())
        } else {
            Tracer::disabled()
        };

        Ok(Self {
            grammar,
            config,
            seed,
            tracer,
            generated: Vec::new(),
            stepping: None,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the grammar.
    #[must_use]
    pub const fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Returns the grammar mutably.
    pub fn grammar_mut(&mut self) -> &mut Grammar {
        &mut self.grammar
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the current seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns whether the seed is locked.
    #[must_use]
    pub const fn is_seed_locked(&self) -> bool {
        self.config.seed_locked
    }

    /// Returns the tracer.
    #[must_use]
    pub const fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    /// Returns the tracer mutably.
    pub fn tracer_mut(&mut self) -> &mut Tracer {
        &mut self.tracer
    }

    /// Returns the trees of the latest run.
    #[must_use]
    pub fn generated(&self) -> &[ExpansionTree] {
        &self.generated
    }

    /// Returns the tree being stepped through.
    #[must_use]
    pub const fn stepping(&self) -> Option<&ExpansionTree> {
        self.stepping.as_ref()
    }

    /// Returns the rule every run expands.
    #[must_use]
    pub fn origin_rule(&self) -> String {
        format!("#{}#", self.config.origin)
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Sets the start symbol.
    pub fn set_origin(&mut self, origin: impl Into<String>) {
        self.config.origin = origin.into();
    }

    /// Sets the number of texts per run.
    ///
    /// # Errors
    ///
    /// Returns an invalid setting error for zero.
    pub fn set_count(&mut self, count: usize) -> Result<()> {
        validate_count(count)?;
        self.config.count = count;
        Ok(())
    }

    /// Sets and locks the seed.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.config.seed_locked = true;
    }

    /// Locks or unlocks the seed.
    pub fn set_seed_locked(&mut self, locked: bool) {
        self.config.seed_locked = locked;
    }

    /// Enables or disables tracing.
    pub fn set_trace(&mut self, enabled: bool) {
        self.config.trace = enabled;
        if enabled {
            self.tracer.enable();
        } else {
            self.tracer.disable();
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Merges grammar JSON into the session's grammar.
    ///
    /// # Errors
    ///
    /// See [`loader::load_str`].
    pub fn load_str(&mut self, source: &str) -> Result<usize> {
        loader::load_str(&mut self.grammar, source)
    }

    /// Merges a grammar file into the session's grammar.
    ///
    /// # Errors
    ///
    /// See [`loader::load_file`].
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        loader::load_file(&mut self.grammar, path)
    }

    // =========================================================================
    // Generation
    // =========================================================================

    /// Runs the grammar from the origin symbol.
    ///
    /// Draws a new seed unless the seed is locked, resets every symbol to its
    /// base rules once, then expands the origin `count` times. Returns the
    /// generated texts.
    ///
    /// # Errors
    ///
    /// Returns the first fatal expansion error.
    pub fn generate(&mut self) -> Result<Vec<String>> {
        self.start_run();
        let rule = self.origin_rule();

        let mut generated = Vec::with_capacity(self.config.count);
        for _ in 0..self.config.count {
            let tree = self.grammar.expand(rule.as_str())?;
            self.tracer.record_tree(&tree);
            generated.push(tree);
        }

        tracing::debug!(seed = self.seed, count = generated.len(), "generated");
        self.generated = generated;
        Ok(self.texts())
    }

    /// Releases the seed lock and runs again with a new seed.
    ///
    /// # Errors
    ///
    /// See [`Session::generate`].
    pub fn reroll(&mut self) -> Result<Vec<String>> {
        self.config.seed_locked = false;
        self.generate()
    }

    /// Returns the texts of the latest run.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.generated
            .iter()
            .map(|tree| tree.finished_text().to_string())
            .collect()
    }

    /// Expands an arbitrary rule against freshly reset symbols.
    ///
    /// The random source continues from where it is; the seed is not changed.
    ///
    /// # Errors
    ///
    /// Returns a fatal expansion error.
    pub fn expand(&mut self, rule: &str) -> Result<ExpansionTree> {
        self.grammar.clear_state();
        let tree = self.grammar.expand(rule)?;
        self.tracer.record_tree(&tree);
        Ok(tree)
    }

    // =========================================================================
    // Step mode
    // =========================================================================

    /// Starts a run that expands the origin one node at a time.
    ///
    /// Seeds and resets exactly as [`Session::generate`] does, then expands
    /// only the root. Use [`Session::step`] to continue.
    ///
    /// # Errors
    ///
    /// Returns a fatal expansion error from the root.
    pub fn start_stepping(&mut self) -> Result<&ExpansionTree> {
        self.start_run();
        let mut tree = self.grammar.create_root(self.origin_rule());
        self.grammar.step(&mut tree)?;
        Ok(&*self.stepping.insert(tree))
    }

    /// Expands the next node of the stepped tree.
    ///
    /// Returns the expanded node, or `None` when there is nothing to step or
    /// the tree is complete. A completed tree is traced and kept as the
    /// latest run.
    ///
    /// # Errors
    ///
    /// Returns a fatal expansion error.
    pub fn step(&mut self) -> Result<Option<NodeId>> {
        let Some(tree) = self.stepping.as_mut() else {
            return Ok(None);
        };
        let stepped = self.grammar.step(tree)?;
        if tree.is_complete() && stepped.is_some() {
            self.tracer.record_tree(tree);
            self.generated = vec![tree.clone()];
        }
        Ok(stepped)
    }

    /// Abandons step mode.
    pub fn stop_stepping(&mut self) {
        self.stepping = None;
    }

    fn start_run(&mut self) {
        if !self.config.seed_locked {
            self.seed = fresh_seed();
        }
        self.grammar.reseed(self.seed);
        self.grammar.clear_state();
        self.stepping = None;
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("seed", &self.seed)
            .field("generated", &self.generated.len())
            .field("stepping", &self.stepping.is_some())
            .finish_non_exhaustive()
    }
}

fn fresh_seed() -> u64 {
    rand::thread_rng().gen_range(0..SEED_RANGE)
}

fn validate_count(count: usize) -> Result<()> {
    if count == 0 {
        return Err(Error::invalid_setting("count", "must be at least 1"));
    }
    Ok(())
}
