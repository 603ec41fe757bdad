//! Cross-crate integration tests
//!
//! Tests that load JSON grammars, run sessions, drive the REPL, and inspect
//! the results with the debug tools.

mod loading;
mod repl;
mod sessions;

use fabula_runtime::{Session, SessionConfig};

/// A small grammar that exercises bindings, modifiers, and shuffle decks.
pub const GREETING: &str = r##"{
    "origin": "#[who:#name#]line#",
    "line": "#greeting.capitalize#, #who#! Nice to meet you, #who#.",
    "greeting": ["hello", "hi", "good day"],
    "name": { "rules": ["Ada", "Grace", "Hedy"], "distribution": "shuffle" }
}"##;

/// Creates a session with a locked seed and [`GREETING`] loaded.
pub fn greeting_session(seed: u64) -> Session {
    let mut session = Session::with_config(SessionConfig::new().with_seed(seed)).unwrap();
    session.load_str(GREETING).unwrap();
    session
}
