//! Bestiary grammar tests.

use fabula_debug::snapshot_symbol;
use fabula_engine::RuleDefinition;
use fabula_runtime::loader::parse_definition;
use fabula_runtime::{Session, SessionConfig};

const BESTIARY: &str = include_str!("../../demos/bestiary.json");

const CREATURES: [&str; 5] = ["ice wyrm", "moss golem", "ember fox", "glass heron", "umber moth"];

fn session(seed: u64) -> Session {
    let mut session =
        Session::with_config(SessionConfig::new().with_seed(seed).with_count(25)).unwrap();
    session.load_str(BESTIARY).unwrap();
    session
}

#[test]
fn definition_uses_every_shape() {
    let definition = parse_definition(BESTIARY).unwrap();
    assert!(matches!(definition["origin"], RuleDefinition::Single(_)));
    assert!(matches!(definition["creature"], RuleDefinition::List(_)));
    assert!(matches!(
        definition["phase"],
        RuleDefinition::Configured {
            falloff: Some(_),
            ..
        }
    ));
}

#[test]
fn entries_generate_cleanly() {
    let mut session = session(1);
    session.generate().unwrap();
    for tree in session.generated() {
        assert!(tree.is_clean(), "{:?}", tree.errors());
    }
}

#[test]
fn every_entry_names_one_creature() {
    let mut session = session(2);
    for text in session.generate().unwrap() {
        let lower = text.to_lowercase();
        let named = CREATURES.iter().filter(|c| lower.contains(*c)).count();
        assert_eq!(named, 1, "{text}");
    }
}

#[test]
fn articles_and_plurals_apply() {
    let mut session = session(3);
    let texts = session.generate().unwrap();
    for wrong in [" a abandoned", " a ember", " a umber"] {
        assert!(texts.iter().all(|t| !t.contains(wrong)));
    }
    assert!(texts.iter().all(|t| !t.contains("marshs")));
}

#[test]
fn bindings_stack_across_a_run() {
    let mut session = session(4);
    session.generate().unwrap();
    let beast = snapshot_symbol(session.grammar(), "beast").unwrap();
    assert!(beast.dynamic);
    assert_eq!(beast.stack.len(), 25);
}
