//! Grammar loading from JSON.
//!
//! A grammar file is a JSON object mapping symbol names to rule definitions:
//!
//! ```json
//! {
//!   "origin": "#hero# met #animal.a#.",
//!   "hero": ["Ada", "Grace"],
//!   "animal": { "rules": ["owl", "cat"], "distribution": "shuffle" }
//! }
//! ```

use std::fs;
use std::path::Path;

use fabula_engine::{Grammar, GrammarDefinition};
use fabula_foundation::{Error, ErrorContext, ErrorKind, Result};

/// Parses grammar JSON into a definition.
///
/// The text is checked for the obvious mistakes before it reaches the JSON
/// decoder so that half-typed input gets a friendlier message.
///
/// # Errors
///
/// Returns an invalid definition error for empty input or input that is not
/// wrapped in braces, and a serialization error for malformed JSON.
pub fn parse_definition(source: &str) -> Result<GrammarDefinition> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_definition("Empty grammar, can't parse yet."));
    }
    if !trimmed.starts_with('{') {
        return Err(Error::invalid_definition("JSON must start with {, missing {"));
    }
    if !trimmed.ends_with('}') {
        return Err(Error::invalid_definition("JSON must end with }, missing }"));
    }

    serde_json::from_str(trimmed).map_err(|e| {
        Error::new(ErrorKind::SerializationError(format!(
            "line {}, column {}: {e}",
            e.line(),
            e.column()
        )))
    })
}

/// Parses grammar JSON and merges it into `grammar`.
///
/// Symbols already defined with the same name are replaced. Returns the
/// number of symbols loaded.
///
/// # Errors
///
/// Returns the parse error, or the first invalid rule definition. The grammar
/// is unchanged on error.
pub fn load_str(grammar: &mut Grammar, source: &str) -> Result<usize> {
    let definition = parse_definition(source)?;
    let count = definition.len();
    grammar.load_definition(definition)?;
    tracing::debug!(symbols = count, "loaded grammar");
    Ok(count)
}

/// Reads a grammar file and merges it into `grammar`.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, otherwise the same errors
/// as [`load_str`] with the file path attached as context.
pub fn load_file<P: AsRef<Path>>(grammar: &mut Grammar, path: P) -> Result<usize> {
    let path = path.as_ref();
    let source = read_source(path)?;
    load_str(grammar, &source).map_err(|e| {
        let context = e
            .context
            .clone()
            .unwrap_or_default()
            .with_frame(path.display().to_string());
        e.with_context(context)
    })
}

/// Reads a grammar file into a definition without loading it.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or the errors of
/// [`parse_definition`].
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<GrammarDefinition> {
    let path = path.as_ref();
    parse_definition(&read_source(path)?)
        .map_err(|e| e.with_context(ErrorContext::new().with_source(path.display().to_string())))
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to read '{}': {e}",
            path.display()
        )))
    })
}
