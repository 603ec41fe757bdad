//! Fabula - Generative grammars for procedural text
//!
//! This crate re-exports all layers of the Fabula system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: fabula_runtime    - Sessions, JSON loading, REPL, CLI
//!          fabula_debug      - Tracing, sampling, inspection
//! Layer 3: fabula_stdlib     - English modifiers
//! Layer 2: fabula_engine     - Rule sets, symbol stacks, expansion trees
//! Layer 1: fabula_language   - Rule, tag, and action parsers
//! Layer 0: fabula_foundation - Errors and random sources
//! ```
//!
//! # Example
//!
//! ```
//! use fabula::runtime::{Session, SessionConfig};
//!
//! let mut session = Session::with_config(SessionConfig::new().with_seed(7)).unwrap();
//! session
//!     .load_str(
//!         r##"{
//!             "origin": "#[hero:#name#]story#",
//!             "story": "#hero# met #hero#.",
//!             "name": ["Ada", "Grace"]
//!         }"##,
//!     )
//!     .unwrap();
//! let text = session.generate().unwrap().remove(0);
//! assert!(text == "Ada met Ada." || text == "Grace met Grace.");
//! ```

pub use fabula_debug as debug;
pub use fabula_engine as engine;
pub use fabula_foundation as foundation;
pub use fabula_language as language;
pub use fabula_runtime as runtime;
pub use fabula_stdlib as stdlib;
