//! Diagnostics for Fabula grammars.
//!
//! This crate provides:
//! - [`Tracer`] - Expansion traces with human and JSON output
//! - [`sample`] - Distribution sampling over many expansions
//! - [`snapshot`] - Symbol stack inspection
//! - [`render_tree`] - Expansion tree rendering for step mode

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod distribution;
pub mod inspect;
pub mod trace;
pub mod tree;

pub use distribution::{CandidateUsage, SymbolUsage, UsageReport, sample};
pub use inspect::{RuleSetSnapshot, SymbolSnapshot, snapshot, snapshot_symbol};
pub use trace::{
    HumanFormatter, JsonFormatter, TraceBuffer, TraceEvent, TraceFormatter, TraceOutput,
    TraceRecord, Tracer, TracerConfig,
};
pub use tree::render_tree;
