//! REPL, CLI, sessions, and grammar loading for Fabula.
//!
//! This crate provides:
//! - [`loader`] - JSON grammar files
//! - [`Session`] - Seeded, repeatable generation from an origin symbol
//! - [`Repl`] - Interactive read-eval-print loop

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod editor;
pub mod highlight;
pub mod loader;
pub mod repl;
pub mod session;

use std::sync::Once;

pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use repl::{Outcome, Repl};
pub use session::{Session, SessionConfig};

static TRACING_INIT: Once = Once::new();

/// Installs a stderr log subscriber.
///
/// Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=fabula_engine=trace`. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        if std::env::var("RUST_LOG").is_ok() {
            let _ = tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(EnvFilter::from_default_env())
                .try_init();
        }
    });
}
