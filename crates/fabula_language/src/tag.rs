//! Tag parser.
//!
//! A tag's content is itself parsed as a rule: leading actions become
//! preactions, and the single remaining text section names the symbol plus
//! its modifier chain, separated by dots.
//!
//! ```text
//! #[hero:#name#]hero.capitalize.s#
//!  ^^^^^^^^^^^^^ ^^^^ ^^^^^^^^^^^^
//!  preaction     symbol  modifiers
//! ```

use crate::parser::parse;
use crate::section::{SectionKind, SyntaxError};

/// The decomposed content of a tag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagSpec {
    /// Symbol to resolve; `None` when the tag names no symbol.
    pub symbol: Option<String>,
    /// Raw action content (`target:rule`) to activate before resolution.
    pub preactions: Vec<String>,
    /// Modifier names, applied left to right.
    pub modifiers: Vec<String>,
    /// Warnings from parsing the tag's content.
    pub errors: Vec<SyntaxError>,
}

/// Parses the content between a tag's `#` delimiters.
///
/// # Errors
///
/// Returns [`SyntaxError::MultipleMainSections`] if more than one text section
/// remains after removing actions.
pub fn parse_tag(contents: &str) -> Result<TagSpec, SyntaxError> {
    let parsed = parse(contents);
    let mut spec = TagSpec {
        errors: parsed.errors,
        ..TagSpec::default()
    };

    let mut main: Option<String> = None;
    for section in parsed.sections {
        match section.kind {
            SectionKind::Action => spec.preactions.push(section.raw),
            _ => {
                if main.is_some() {
                    return Err(SyntaxError::MultipleMainSections(contents.to_string()));
                }
                main = Some(section.raw);
            }
        }
    }

    if let Some(main) = main {
        let mut components = main.split('.');
        spec.symbol = components
            .next()
            .filter(|symbol| !symbol.is_empty())
            .map(str::to_string);
        spec.modifiers = components.map(str::to_string).collect();
    }

    Ok(spec)
}
