//! Integration tests for rule selection

use fabula_engine::{
    Grammar, GrammarDefinition, GrammarSettings, RuleDefinition, RuleSet, SelectionStrategy,
    SymbolScope,
};
use fabula_foundation::{ErrorKind, RandomSource, SequenceRandom};

use crate::grammar;

fn configured(rules: &[&str], distribution: Option<&str>, falloff: Option<f64>) -> RuleDefinition {
    RuleDefinition::Configured {
        rules: rules.iter().map(|r| (*r).to_string()).collect(),
        distribution: distribution.map(str::to_string),
        falloff,
    }
}

fn single_symbol(key: &str, definition: RuleDefinition) -> Grammar {
    let definition: GrammarDefinition = [(key.to_string(), definition)].into_iter().collect();
    Grammar::from_definition(definition, GrammarSettings::new().with_seed(9)).unwrap()
}

#[derive(Debug)]
struct AlwaysLast;

impl SelectionStrategy for AlwaysLast {
    fn select_index(&mut self, count: usize, _rng: &mut dyn RandomSource) -> usize {
        count - 1
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "last"
    }

    fn fresh(&self) -> Box<dyn SelectionStrategy> {
        Box::new(AlwaysLast)
    }
}

// =============================================================================
// Random
// =============================================================================

#[test]
fn same_seed_same_choices() {
    let pairs: &[(&str, &[&str])] = &[("n", &["a", "b", "c", "d", "e", "f"])];
    let mut first = grammar(17, pairs);
    let mut second = grammar(17, pairs);
    let a: Vec<String> = (0..20).map(|_| first.flatten("#n#").unwrap()).collect();
    let b: Vec<String> = (0..20).map(|_| second.flatten("#n#").unwrap()).collect();
    assert_eq!(a, b);
}

#[test]
fn uniform_pick_uses_scaled_draw() {
    let mut g = single_symbol("n", configured(&["a", "b", "c", "d"], None, None))
        .with_random(SequenceRandom::new([0.0, 0.3, 0.7, 0.99]));
    assert_eq!(g.flatten("#n##n##n##n#").unwrap(), "abcd");
}

#[test]
fn falloff_favours_early_rules() {
    // 0.7^2 * 4 = 1.96
    let mut g = single_symbol("n", configured(&["a", "b", "c", "d"], None, Some(2.0)))
        .with_random(SequenceRandom::new([0.7]));
    assert_eq!(g.flatten("#n#").unwrap(), "b");
}

#[test]
fn falloff_below_one_favours_late_rules() {
    // 0.3^0.5 * 4 = 2.19, uniform would give 1.2
    let mut g = single_symbol("n", configured(&["a", "b", "c", "d"], None, Some(0.5)))
        .with_random(SequenceRandom::new([0.3]));
    assert_eq!(g.flatten("#n#").unwrap(), "c");
}

#[test]
fn grammar_default_falloff_applies() {
    let rules = RuleDefinition::from(vec!["a", "b", "c", "d"]);
    let definition: GrammarDefinition = [("n".to_string(), rules)].into_iter().collect();
    let mut g = Grammar::from_definition(definition, GrammarSettings::new().with_falloff(2.0))
        .unwrap()
        .with_random(SequenceRandom::new([0.7]));
    assert_eq!(g.flatten("#n#").unwrap(), "b");
}

// =============================================================================
// Shuffle
// =============================================================================

#[test]
fn shuffle_deals_every_rule_once_per_cycle() {
    let mut g = single_symbol("x", configured(&["a", "b", "c"], Some("shuffle"), None));
    for _ in 0..10 {
        let mut dealt: Vec<char> = g.flatten("#x##x##x#").unwrap().chars().collect();
        dealt.sort_unstable();
        assert_eq!(dealt, ['a', 'b', 'c']);
    }
}

#[test]
fn clear_state_restarts_the_deck() {
    let mut g = single_symbol("x", configured(&["a", "b", "c"], Some("shuffle"), None));
    g.flatten("#x#").unwrap();
    g.clear_state();
    let mut dealt: Vec<char> = g.flatten("#x##x##x#").unwrap().chars().collect();
    dealt.sort_unstable();
    assert_eq!(dealt, ['a', 'b', 'c']);
}

#[test]
fn unknown_distribution_is_rejected() {
    let definition: GrammarDefinition =
        [("x".to_string(), configured(&["a"], Some("weighted"), None))]
            .into_iter()
            .collect();
    let err = Grammar::from_definition(definition, GrammarSettings::new()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidDefinition(_)));
}

#[test]
fn empty_rule_list_is_rejected() {
    let definition: GrammarDefinition = [("x".to_string(), RuleDefinition::List(Vec::new()))]
        .into_iter()
        .collect();
    assert!(Grammar::from_definition(definition, GrammarSettings::new()).is_err());
}

// =============================================================================
// Custom strategies
// =============================================================================

#[test]
fn custom_strategy_drives_selection() {
    let rules = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let mut set = RuleSet::with_strategy(rules, Box::new(AlwaysLast)).unwrap();
    let mut rng = SequenceRandom::new([0.0]);

    assert_eq!(set.get_rule(&mut rng), "c");
    assert_eq!(set.get_rule(&mut rng), "c");
    assert_eq!(set.uses(), [0, 0, 2]);
    assert_eq!(set.strategy_name(), "last");

    let copy = set.fresh_copy();
    assert_eq!(copy.uses(), [0, 0, 0]);
    assert_eq!(copy.strategy_name(), "last");
}

#[test]
fn custom_strategy_needs_candidates() {
    assert!(RuleSet::with_strategy(Vec::new(), Box::new(AlwaysLast)).is_err());
}

#[test]
fn scope_selects_from_top_of_stack() {
    let base = RuleSet::with_strategy(vec!["base".into()], Box::new(AlwaysLast)).unwrap();
    let mut scope = SymbolScope::new("x", base);
    let mut rng = SequenceRandom::new([0.5]);

    scope.push_rules(RuleSet::single("pushed"));
    assert_eq!(scope.depth(), 2);
    assert_eq!(scope.select_rule(&mut rng), "pushed");

    scope.pop_rules().unwrap();
    assert_eq!(scope.select_rule(&mut rng), "base");

    let err = scope.pop_rules().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::PopBaseRules(_)));
}
