//! Integration tests for the rule parser
//!
//! Tests section splitting, escapes, nesting, and syntax warnings.

use fabula_language::{
    ParsedRule, Section, SectionKind, SyntaxError, escape, parse, parsed_sections_to_text,
};

fn kinds(parsed: &ParsedRule) -> Vec<SectionKind> {
    parsed.iter().map(|s| s.kind).collect()
}

// =============================================================================
// Sections
// =============================================================================

#[test]
fn literal_then_tag() {
    let parsed = parse("a#b#");
    assert_eq!(parsed.sections, vec![Section::literal("a"), Section::tag("b")]);
    assert!(parsed.is_clean());
}

#[test]
fn single_action() {
    let parsed = parse("[a:b]");
    assert_eq!(parsed.sections, vec![Section::action("a:b")]);
    assert!(parsed.is_clean());
}

#[test]
fn story_rule() {
    let parsed = parse("[hero:#name#]#hero# met #animal.a#.");
    assert_eq!(
        kinds(&parsed),
        vec![
            SectionKind::Action,
            SectionKind::Tag,
            SectionKind::Literal,
            SectionKind::Tag,
            SectionKind::Literal,
        ]
    );
    assert_eq!(parsed.sections[3].raw, "animal.a");
    assert!(parsed.is_clean());
}

#[test]
fn actions_nest() {
    let parsed = parse("[outer:[inner:x]#inner#] done");
    assert_eq!(
        parsed.sections,
        vec![
            Section::action("outer:[inner:x]#inner#"),
            Section::literal(" done"),
        ]
    );
}

#[test]
fn tag_holds_preactions() {
    let parsed = parse("#[pet:#animal#]pet.capitalize#");
    assert_eq!(
        parsed.sections,
        vec![Section::tag("[pet:#animal#]pet.capitalize")]
    );
}

#[test]
fn sections_never_contain_raw_delimiters_from_escapes() {
    let parsed = parse("\\#test\\#");
    assert_eq!(parsed.sections, vec![Section::literal("#test#")]);
    assert!(parsed.is_clean());
}

#[test]
fn escaped_bracket_inside_action_stays_inside() {
    let parsed = parse("[a:x\\]y]");
    assert_eq!(parsed.sections, vec![Section::action("a:x]y")]);
    assert!(parsed.is_clean());
}

// =============================================================================
// Warnings
// =============================================================================

#[test]
fn unclosed_tag() {
    assert!(parse("#a").has_error("Unclosed tag"));
}

#[test]
fn too_many_open() {
    assert!(parse("a[b").has_error("Too many ["));
}

#[test]
fn too_many_close() {
    assert!(parse("a]").has_error("Too many ]"));
}

#[test]
fn empty_tag_and_action_are_reported_with_positions() {
    let parsed = parse("ab##[]");
    assert_eq!(
        parsed.errors,
        vec![
            SyntaxError::ZeroLength {
                position: 3,
                kind: SectionKind::Tag,
            },
            SyntaxError::ZeroLength {
                position: 5,
                kind: SectionKind::Action,
            },
        ]
    );
    assert_eq!(parsed.len(), 3);
}

#[test]
fn warnings_do_not_stop_parsing() {
    let parsed = parse("one ## two #three");
    assert!(!parsed.is_clean());
    assert_eq!(parsed.sections.first(), Some(&Section::literal("one ")));
    assert!(parsed.iter().any(|s| s.raw == " two "));
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn diagnostic_rendering() {
    assert_eq!(
        parsed_sections_to_text(&parse("hi #name#[x:y]")),
        "literal(\"hi \") tag(\"name\") action(\"x:y\")"
    );
}

#[test]
fn escape_round_trips_through_literal() {
    for text in ["plain", "#tag#", "[act:ion]", "back\\slash", "mixed [#\\]"] {
        let parsed = parse(&escape(text));
        assert_eq!(parsed.sections, vec![Section::literal(text)], "{text}");
    }
}
