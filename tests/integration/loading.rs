//! Integration tests for loading JSON grammars

use fabula_engine::{Grammar, GrammarSettings};
use fabula_foundation::ErrorKind;
use fabula_runtime::loader::{load_file, load_str, parse_definition, read_file};

use crate::GREETING;

fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("fabula-it-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn parses_every_definition_shape() {
    let definition = parse_definition(GREETING).unwrap();
    assert_eq!(definition.len(), 4);
    assert_eq!(definition["greeting"].rules(), ["hello", "hi", "good day"]);
    assert_eq!(definition["name"].rules(), ["Ada", "Grace", "Hedy"]);
}

#[test]
fn loaded_grammar_generates() {
    let mut grammar = Grammar::new(GrammarSettings::new().with_seed(2)).unwrap();
    fabula_stdlib::register(&mut grammar);
    assert_eq!(load_str(&mut grammar, GREETING).unwrap(), 4);

    let text = grammar.flatten("#origin#").unwrap();
    assert!(text.ends_with('.'));
    assert!(text.chars().next().unwrap().is_uppercase());
}

#[test]
fn bad_distribution_names_the_symbol() {
    let mut grammar = Grammar::new(GrammarSettings::new()).unwrap();
    let err = load_str(
        &mut grammar,
        r#"{"ok": "fine", "odd": {"rules": ["a"], "distribution": "weighted"}}"#,
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidDefinition(_)));
    assert_eq!(err.context.unwrap().source.as_deref(), Some("odd"));
    assert!(!grammar.defines("ok"));
}

#[test]
fn non_string_rules_are_rejected() {
    let err = parse_definition(r#"{"n": [1, 2, 3]}"#).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SerializationError(_)));
}

#[test]
fn file_errors_carry_the_path() {
    let path = temp_file("broken.json", r#"{"a": ["x",]}"#);
    let mut grammar = Grammar::new(GrammarSettings::new()).unwrap();
    let err = load_file(&mut grammar, &path).unwrap_err();
    let _ = std::fs::remove_file(&path);

    let context = err.context.unwrap();
    assert!(context.stack.iter().any(|frame| frame.contains("broken.json")));
}

#[test]
fn read_file_returns_the_definition() {
    let path = temp_file("read.json", GREETING);
    let definition = read_file(&path);
    let _ = std::fs::remove_file(&path);
    assert!(definition.unwrap().contains_key("origin"));
}
