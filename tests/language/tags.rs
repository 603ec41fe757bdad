//! Integration tests for the tag parser

use fabula_language::{SyntaxError, TagSpec, parse_tag};

#[test]
fn symbol_and_modifiers() {
    let spec = parse_tag("animal.s.capitalize").unwrap();
    assert_eq!(spec.symbol.as_deref(), Some("animal"));
    assert_eq!(spec.modifiers, ["s", "capitalize"]);
}

#[test]
fn preactions_before_symbol() {
    let spec = parse_tag("[hero:#name#][place:#city#]journey").unwrap();
    assert_eq!(spec.preactions, ["hero:#name#", "place:#city#"]);
    assert_eq!(spec.symbol.as_deref(), Some("journey"));
}

#[test]
fn preaction_after_symbol_is_still_a_preaction() {
    let spec = parse_tag("journey[hero:Ada]").unwrap();
    assert_eq!(spec.preactions, ["hero:Ada"]);
    assert_eq!(spec.symbol.as_deref(), Some("journey"));
}

#[test]
fn actions_only() {
    let spec = parse_tag("[hero:POP]").unwrap();
    assert!(spec.symbol.is_none());
    assert!(spec.modifiers.is_empty());
}

#[test]
fn empty_tag() {
    assert_eq!(parse_tag("").unwrap(), TagSpec::default());
}

#[test]
fn two_symbols_are_rejected() {
    assert!(matches!(
        parse_tag("a[b:c]d"),
        Err(SyntaxError::MultipleMainSections(_))
    ));
}

#[test]
fn trailing_dot_gives_empty_modifier() {
    let spec = parse_tag("name.").unwrap();
    assert_eq!(spec.symbol.as_deref(), Some("name"));
    assert_eq!(spec.modifiers, [""]);
}
