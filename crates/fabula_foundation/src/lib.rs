//! Core types for Fabula.
//!
//! This crate provides:
//! - [`Error`] - Rich error types with context
//! - [`RandomSource`] - The random-number capability rule selection consumes
//! - [`SeededRandom`] and [`SequenceRandom`] - Deterministic sources

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod random;

pub use error::{Error, ErrorContext, ErrorKind, ExpansionLimit, Result};
pub use random::{RandomSource, SeededRandom, SequenceRandom};
