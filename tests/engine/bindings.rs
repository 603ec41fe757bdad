//! Integration tests for push and pop actions

use fabula_engine::{BindingEffect, NodeKind};
use fabula_foundation::ErrorKind;

use crate::grammar;

#[test]
fn pushed_binding_stays_consistent() {
    for seed in 0..20 {
        let mut g = grammar(seed, &[("name", &["Ada", "Grace", "Hedy", "Joan"])]);
        let text = g.flatten("[hero:#name#]#hero#/#hero#/#hero#").unwrap();
        let parts: Vec<&str> = text.split('/').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| *p == parts[0]), "{text}");
    }
}

#[test]
fn nested_pushes_shadow_and_pop_in_order() {
    let mut g = grammar(1, &[("a", &["base"])]);
    let text = g
        .flatten("#a#[a:one]#a#[a:two]#a#[a:POP]#a#[a:POP]#a#")
        .unwrap();
    assert_eq!(text, "baseonetwoonebase");
}

#[test]
fn popping_last_dynamic_binding_removes_symbol() {
    let mut g = grammar(1, &[]);
    let tree = g.expand("[pet:owl]#pet#[pet:POP]#pet#").unwrap();
    assert_eq!(tree.finished_text(), "owl((pet))");
    assert!(!g.defines("pet"));
    assert_eq!(tree.errors().len(), 1);
}

#[test]
fn popping_base_rules_is_an_error() {
    let mut g = grammar(1, &[("a", &["base"])]);
    let err = g.flatten("[a:POP]").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::PopBaseRules(ref key) if key == "a"));
}

#[test]
fn popping_undefined_symbol_is_an_error() {
    let mut g = grammar(1, &[]);
    let err = g.flatten("[ghost:POP]").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::PopUndefinedSymbol(ref key) if key == "ghost"));
}

#[test]
fn pushed_text_is_not_reexpanded() {
    let mut g = grammar(1, &[("x", &["\\#hash"])]);
    assert_eq!(g.flatten("#x#").unwrap(), "#hash");
    assert_eq!(g.flatten("[y:#x#]#y#").unwrap(), "#hash");
}

#[test]
fn bindings_outlive_a_single_expansion() {
    let mut g = grammar(1, &[("a", &["base"])]);
    g.flatten("[a:one]").unwrap();
    assert_eq!(g.flatten("#a#").unwrap(), "one");

    g.clear_state();
    assert_eq!(g.flatten("#a#").unwrap(), "base");
}

#[test]
fn clear_state_discards_dynamic_symbols() {
    let mut g = grammar(1, &[]);
    g.flatten("[fresh:value]").unwrap();
    assert!(g.defines("fresh"));
    g.clear_state();
    assert!(!g.defines("fresh"));
}

#[test]
fn preactions_bind_before_the_symbol_resolves() {
    let mut g = grammar(1, &[("story", &["#hero# rode #steed#"])]);
    let text = g.flatten("#[hero:Ada][steed:a comet]story#").unwrap();
    assert_eq!(text, "Ada rode a comet");
}

#[test]
fn public_push_and_pop() {
    let mut g = grammar(1, &[("a", &["base"])]);
    g.push_rules("a", "pushed").unwrap();
    assert_eq!(g.flatten("#a#").unwrap(), "pushed");
    assert_eq!(g.symbol("a").unwrap().depth(), 2);

    g.pop_rules("a").unwrap();
    assert_eq!(g.flatten("#a#").unwrap(), "base");

    let err = g.pop_rules("a").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::PopBaseRules(_)));
}

#[test]
fn public_push_creates_a_lasting_symbol() {
    let mut g = grammar(1, &[]);
    g.push_rules("mood", vec!["calm"]).unwrap();
    g.clear_state();
    assert_eq!(g.flatten("#mood#").unwrap(), "calm");
}

#[test]
fn action_records_describe_effects() {
    let mut g = grammar(1, &[("name", &["Ada"])]);
    let tree = g.expand("[hero:#name#][hero:POP]").unwrap();

    let effects: Vec<_> = tree
        .pre_order()
        .into_iter()
        .map(|id| tree.node(id))
        .filter(|node| node.kind == NodeKind::Action)
        .map(|node| node.action_record().unwrap().effect.clone())
        .collect();
    assert_eq!(
        effects,
        [
            BindingEffect::Push {
                text: "Ada".to_string()
            },
            BindingEffect::Pop
        ]
    );
}
