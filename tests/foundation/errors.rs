//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use fabula_foundation::{Error, ErrorContext, ErrorKind, ExpansionLimit};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_undefined_symbol() {
    let err = Error::undefined_symbol("hero");
    assert!(matches!(err.kind, ErrorKind::UndefinedSymbol(_)));
    assert!(err.to_string().contains("hero"));
}

#[test]
fn error_pop_base_rules() {
    let err = Error::pop_base_rules("animal");
    assert!(matches!(err.kind, ErrorKind::PopBaseRules(ref s) if s == "animal"));
    assert_eq!(err.to_string(), "cannot pop base rules of symbol: animal");
}

#[test]
fn error_pop_undefined_symbol() {
    let err = Error::pop_undefined_symbol("ghost");
    assert!(matches!(err.kind, ErrorKind::PopUndefinedSymbol(_)));
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn error_empty_rule_set() {
    let err = Error::empty_rule_set("nothing");
    assert_eq!(err.to_string(), "symbol nothing has no candidate rules");
}

#[test]
fn error_invalid_definition() {
    let err = Error::invalid_definition("unsupported distribution: weighted");
    assert!(matches!(err.kind, ErrorKind::InvalidDefinition(_)));
    assert!(err.to_string().contains("weighted"));
}

#[test]
fn error_invalid_setting() {
    let err = Error::invalid_setting("falloff", "must be positive");
    match &err.kind {
        ErrorKind::InvalidSetting { name, message } => {
            assert_eq!(*name, "falloff");
            assert_eq!(message, "must be positive");
        }
        other => panic!("unexpected kind: {other:?}"),
    }
    assert_eq!(err.to_string(), "invalid setting falloff: must be positive");
}

// =============================================================================
// Expansion Limits
// =============================================================================

#[test]
fn limit_without_rule() {
    let err = Error::limit_exceeded(ExpansionLimit::MaxDepth {
        limit: 8,
        rule: None,
    });
    assert_eq!(
        err.to_string(),
        "limit exceeded: max expansion depth (8) exceeded"
    );
}

#[test]
fn limit_with_rule() {
    let limit = ExpansionLimit::MaxDepth {
        limit: 2,
        rule: Some("#loop#".to_string()),
    };
    assert_eq!(
        limit.to_string(),
        "max expansion depth (2) exceeded while expanding \"#loop#\""
    );
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn error_without_context() {
    assert!(Error::undefined_symbol("x").context.is_none());
}

#[test]
fn error_with_context() {
    let err = Error::empty_rule_set("pet").with_context(
        ErrorContext::new()
            .with_source("pets.json")
            .with_frame("#story#")
            .with_frame("#pet#"),
    );
    let context = err.context.as_ref().unwrap();
    assert_eq!(context.source.as_deref(), Some("pets.json"));
    assert_eq!(context.stack, vec!["#story#", "#pet#"]);

    let shown = context.to_string();
    assert!(shown.starts_with("at pets.json"));
    assert!(shown.contains("  in #story#"));
    assert!(shown.contains("  in #pet#"));
}

#[test]
fn error_is_std_error() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    assert_error(&Error::undefined_symbol("x"));
}
