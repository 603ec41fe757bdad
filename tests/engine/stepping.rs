//! Integration tests for step-by-step expansion

use fabula_engine::NodeKind;

use crate::grammar;

const PAIRS: &[(&str, &[&str])] = &[
    ("origin", &["#[hero:#name#]story#"]),
    ("story", &["#hero# saw #animal#, then #hero# left."]),
    ("name", &["Ada", "Grace", "Hedy"]),
    ("animal", &["an owl", "a cat", "a fox"]),
];

#[test]
fn stepping_matches_full_expansion() {
    for seed in 0..10 {
        let mut full = grammar(seed, PAIRS);
        let expected = full.expand("#origin#").unwrap();

        let mut stepped = grammar(seed, PAIRS);
        let mut tree = stepped.create_root("#origin#");
        while stepped.step(&mut tree).unwrap().is_some() {}

        assert!(tree.is_complete());
        assert_eq!(tree.finished_text(), expected.finished_text());
        assert_eq!(tree.len(), expected.len());
    }
}

#[test]
fn steps_follow_pre_order() {
    let mut g = grammar(5, &[("a", &["x#b#y"]), ("b", &["z"])]);
    let mut tree = g.create_root("#a#");

    let mut kinds = Vec::new();
    while let Some(id) = g.step(&mut tree).unwrap() {
        kinds.push(tree.node(id).kind);
    }
    assert_eq!(
        kinds,
        [
            NodeKind::Raw,
            NodeKind::Tag,
            NodeKind::Raw,
            NodeKind::Literal,
            NodeKind::Tag,
            NodeKind::Raw,
            NodeKind::Literal,
            NodeKind::Literal,
        ]
    );
    assert_eq!(tree.finished_text(), "xzy");
}

#[test]
fn partial_trees_show_partial_text() {
    let mut g = grammar(5, &[("a", &["x#b#y"]), ("b", &["z"])]);
    let mut tree = g.create_root("#a#");

    for _ in 0..4 {
        g.step(&mut tree).unwrap();
    }
    assert!(!tree.is_complete());
    assert_eq!(tree.finished_text(), "x");
    assert!(tree.next_unexpanded().is_some());
}

#[test]
fn step_on_complete_tree_returns_none() {
    let mut g = grammar(5, &[("b", &["z"])]);
    let mut tree = g.expand("#b#").unwrap();
    assert_eq!(g.step(&mut tree).unwrap(), None);
    assert_eq!(tree.finished_text(), "z");
}
