//! Expansion tracing.
//!
//! A [`Tracer`] turns expansion trees into [`TraceRecord`]s, keeps the most
//! recent ones in a [`TraceBuffer`], and optionally echoes them to stderr in
//! human-readable or JSON form.
//!
//! # Example
//!
//! ```text
//! :trace on                ;; Enable tracing in the REPL
//! #origin#                 ;; Expand; the trace is printed after the text
//! :trace off
//! ```

pub mod buffer;
pub mod format;
pub mod record;

pub use buffer::TraceBuffer;
pub use format::{HumanFormatter, JsonFormatter, TraceFormatter};
pub use record::{TraceEvent, TraceRecord};

use std::io::{self, Write};

use fabula_engine::ExpansionTree;

/// Destination for records as they are recorded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TraceOutput {
    /// Keep records in the buffer only.
    #[default]
    None,
    /// Also print each generation to stderr.
    Stderr,
}

// =============================================================================
// TracerConfig
// =============================================================================

/// Settings for a [`Tracer`].
#[derive(Clone, Debug)]
pub struct TracerConfig {
    /// Record anything at all.
    pub enabled: bool,
    /// Records kept before the oldest are dropped.
    pub buffer_size: usize,
    /// Where recorded generations are echoed.
    pub output: TraceOutput,
    /// Format as JSON instead of indented text.
    pub json_format: bool,
    /// Event type names to keep. Empty keeps every event.
    pub event_filter: Vec<String>,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            buffer_size: TraceBuffer::DEFAULT_SIZE,
            output: TraceOutput::None,
            json_format: false,
            event_filter: Vec::new(),
        }
    }
}

impl TracerConfig {
    /// Disabled tracing with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns recording on.
    #[must_use]
    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    /// Keeps at most `size` records.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Formats records as JSON.
    #[must_use]
    pub fn json(mut self) -> Self {
        self.json_format = true;
        self
    }

    /// Keeps only events whose type name is in `types`.
    #[must_use]
    pub fn filter_events(mut self, types: Vec<String>) -> Self {
        self.event_filter = types;
        self
    }

    fn keeps(&self, event: &TraceEvent) -> bool {
        self.event_filter.is_empty() || self.event_filter.iter().any(|t| t == event.event_type())
    }
}

// =============================================================================
// Tracer
// =============================================================================

/// Turns expansion trees into trace records.
///
/// Each recorded tree is one generation. A disabled tracer records nothing and
/// leaves the generation counter alone.
#[derive(Debug, Default)]
pub struct Tracer {
    config: TracerConfig,
    buffer: TraceBuffer,
    generation: u64,
    human: HumanFormatter,
    json: JsonFormatter,
}

impl Tracer {
    /// Creates a tracer from `config`.
    #[must_use]
    pub fn new(config: TracerConfig) -> Self {
        Self {
            buffer: TraceBuffer::new(config.buffer_size),
            config,
            generation: 0,
            human: HumanFormatter::new(),
            json: JsonFormatter::new(),
        }
    }

    /// A tracer that records nothing until enabled.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// True while recording.
    #[must_use]
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Starts recording.
    pub fn enable(&mut self) {
        self.config.enabled = true;
    }

    /// Stops recording. Stored records are kept.
    pub fn disable(&mut self) {
        self.config.enabled = false;
    }

    /// Switches between JSON and indented text.
    pub fn set_json_format(&mut self, json: bool) {
        self.config.json_format = json;
    }

    /// Changes where new generations are echoed.
    pub fn set_output(&mut self, output: TraceOutput) {
        self.config.output = output;
    }

    /// Where new generations are echoed.
    #[must_use]
    pub fn output(&self) -> TraceOutput {
        self.config.output
    }

    /// Number of trees recorded so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Records every expanded node of `tree` as a new generation.
    ///
    /// Returns the IDs of the records that passed the event filter.
    pub fn record_tree(&mut self, tree: &ExpansionTree) -> Vec<u64> {
        if !self.config.enabled {
            return Vec::new();
        }
        self.generation += 1;

        let generation = self.generation;
        let ids: Vec<u64> = TraceEvent::from_tree(tree)
            .into_iter()
            .filter(|(_, event)| self.config.keeps(event))
            .map(|(depth, event)| self.buffer.push(generation, depth, event))
            .collect();

        if self.config.output == TraceOutput::Stderr && !ids.is_empty() {
            let text = self.format_since(generation - 1);
            if !text.is_empty() {
                let _ = writeln!(io::stderr(), "{text}");
            }
        }
        ids
    }

    /// Formats `records` with the current format.
    #[must_use]
    pub fn format_records(&self, records: &[&TraceRecord]) -> String {
        if records.is_empty() {
            String::new()
        } else if self.config.json_format {
            self.json.format_many(records)
        } else {
            self.human.format_many(records)
        }
    }

    /// Formats the latest generation, or returns an empty string if it left
    /// no records.
    #[must_use]
    pub fn format_last_generation(&self) -> String {
        self.format_records(&self.buffer.records_for_generation(self.generation))
    }

    /// Formats every generation recorded after `generation`.
    #[must_use]
    pub fn format_since(&self, generation: u64) -> String {
        self.format_records(&self.buffer.records_after(generation))
    }

    /// The stored records.
    #[must_use]
    pub fn buffer(&self) -> &TraceBuffer {
        &self.buffer
    }

    /// Drops every stored record. The generation counter keeps counting.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

// =============================================================================
// Tests
// =============================================================================
