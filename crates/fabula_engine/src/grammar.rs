//! The grammar: symbol table, modifier table, and fallback sub-grammars.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use fabula_foundation::{Error, ErrorContext, RandomSource, Result, SeededRandom};

use crate::node::ExpansionTree;
use crate::rule_set::{RuleDefinition, RuleSet};
use crate::settings::GrammarSettings;
use crate::symbol::SymbolScope;

/// A text transform applied by `#symbol.name#`.
pub type Modifier = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// A grammar definition: symbol name to rule definition.
pub type GrammarDefinition = BTreeMap<String, RuleDefinition>;

/// A generative grammar.
///
/// Owns the symbol scopes that actions mutate during an expansion, so an
/// expansion borrows the grammar mutably for its whole duration.
///
/// # Example
///
/// ```
/// use fabula_engine::{Grammar, GrammarDefinition, GrammarSettings, RuleDefinition};
///
/// let mut definition = GrammarDefinition::new();
/// definition.insert("animal".into(), RuleDefinition::from(vec!["cat", "dog"]));
///
/// let settings = GrammarSettings::new().with_seed(1);
/// let mut grammar = Grammar::from_definition(definition, settings).unwrap();
/// let text = grammar.flatten("a #animal#").unwrap();
/// assert!(text == "a cat" || text == "a dog");
/// ```
pub struct Grammar {
    pub(crate) symbols: BTreeMap<String, SymbolScope>,
    pub(crate) modifiers: BTreeMap<String, Modifier>,
    pub(crate) subgrammars: Vec<Grammar>,
    pub(crate) random: Box<dyn RandomSource>,
    pub(crate) settings: GrammarSettings,
}

impl Grammar {
    /// Creates an empty grammar.
    ///
    /// # Errors
    ///
    /// Returns an error if `settings` fail validation.
    pub fn new(settings: GrammarSettings) -> Result<Self> {
        settings.validate()?;
        let random = match settings.seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        };
        Ok(Self {
            symbols: BTreeMap::new(),
            modifiers: BTreeMap::new(),
            subgrammars: Vec::new(),
            random: Box::new(random),
            settings,
        })
    }

    /// Creates a grammar from a definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings or any rule definition are invalid.
    pub fn from_definition(
        definition: GrammarDefinition,
        settings: GrammarSettings,
    ) -> Result<Self> {
        let mut grammar = Self::new(settings)?;
        grammar.load_definition(definition)?;
        Ok(grammar)
    }

    /// Replaces the random source.
    #[must_use]
    pub fn with_random(mut self, random: impl RandomSource + 'static) -> Self {
        self.set_random(random);
        self
    }

    /// Replaces the random source in place.
    pub fn set_random(&mut self, random: impl RandomSource + 'static) {
        self.random = Box::new(random);
    }

    /// Restarts the random source from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.settings.seed = Some(seed);
        self.random = Box::new(SeededRandom::new(seed));
    }

    /// Loads symbols, replacing any existing symbols with the same name.
    ///
    /// Nothing is changed if any definition is invalid.
    ///
    /// # Errors
    ///
    /// Returns the first invalid definition's error.
    pub fn load_definition(&mut self, definition: GrammarDefinition) -> Result<()> {
        let scopes = definition
            .into_iter()
            .map(|(key, raw)| {
                let rules = raw
                    .into_rule_set(&key, &self.settings)
                    .map_err(|e| e.with_context(ErrorContext::new().with_source(key.clone())))?;
                Ok((key.clone(), SymbolScope::new(key, rules)))
            })
            .collect::<Result<Vec<_>>>()?;

        for (key, scope) in scopes {
            self.symbols.insert(key, scope);
        }
        Ok(())
    }

    /// Restores every symbol to its base rules and discards symbols that were
    /// created by actions.
    pub fn clear_state(&mut self) {
        self.symbols.retain(|_, scope| !scope.is_dynamic());
        for scope in self.symbols.values_mut() {
            scope.clear_state();
        }
    }

    /// Registers modifiers, replacing existing ones with the same name.
    pub fn add_modifiers<I, K>(&mut self, modifiers: I)
    where
        I: IntoIterator<Item = (K, Modifier)>,
        K: Into<String>,
    {
        for (name, modifier) in modifiers {
            self.modifiers.insert(name.into(), modifier);
        }
    }

    /// Registers one modifier.
    pub fn add_modifier(
        &mut self,
        name: impl Into<String>,
        modifier: impl Fn(&str) -> String + Send + Sync + 'static,
    ) {
        self.modifiers.insert(name.into(), Arc::new(modifier));
    }

    /// Adds a fallback grammar consulted for symbols this one lacks.
    ///
    /// Sub-grammars are consulted in registration order.
    pub fn add_subgrammar(&mut self, grammar: Grammar) {
        self.subgrammars.push(grammar);
    }

    /// Creates an unexpanded tree for `rule`.
    #[must_use]
    pub fn create_root(&self, rule: impl Into<String>) -> ExpansionTree {
        ExpansionTree::new(rule)
    }

    /// Fully expands `rule`.
    ///
    /// # Errors
    ///
    /// Returns an error on structural misuse (see [`Grammar::expand_node`]).
    pub fn expand(&mut self, rule: impl Into<String>) -> Result<ExpansionTree> {
        let mut tree = self.create_root(rule);
        let root = tree.root();
        self.expand_node(&mut tree, root, false)?;
        Ok(tree)
    }

    /// Fully expands `rule` and returns only its text.
    ///
    /// # Errors
    ///
    /// Returns an error on structural misuse (see [`Grammar::expand_node`]).
    pub fn flatten(&mut self, rule: impl Into<String>) -> Result<String> {
        let tree = self.expand(rule)?;
        Ok(tree.finished_text().to_string())
    }

    /// Pushes rules onto `key`, creating the symbol if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition is invalid.
    pub fn push_rules(&mut self, key: &str, raw: impl Into<RuleDefinition>) -> Result<()> {
        let rules = raw.into().into_rule_set(key, &self.settings)?;
        self.push_rule_set(key, rules, false);
        Ok(())
    }

    pub(crate) fn push_rule_set(&mut self, key: &str, rules: RuleSet, dynamic: bool) {
        if let Some(scope) = self.symbols.get_mut(key) {
            scope.push_rules(rules);
        } else {
            let scope = if dynamic {
                SymbolScope::dynamic(key, rules)
            } else {
                SymbolScope::new(key, rules)
            };
            tracing::debug!(symbol = key, dynamic, "created symbol");
            self.symbols.insert(key.to_string(), scope);
        }
    }

    /// Pops the most recent rules pushed onto `key`.
    ///
    /// A symbol created by an action disappears when its last binding is
    /// popped.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is not defined, or if only its base rules
    /// are left.
    pub fn pop_rules(&mut self, key: &str) -> Result<()> {
        let Some(scope) = self.symbols.get_mut(key) else {
            return Err(Error::pop_undefined_symbol(key));
        };
        if scope.is_dynamic() && scope.depth() == 1 {
            self.symbols.remove(key);
            tracing::debug!(symbol = key, "removed dynamic symbol");
            return Ok(());
        }
        scope.pop_rules()?;
        Ok(())
    }

    /// Selects a rule for `key`, or `None` if no grammar defines it.
    pub(crate) fn try_select_rule(&mut self, key: &str) -> Option<String> {
        if let Some(scope) = self.symbols.get_mut(key) {
            return Some(scope.select_rule(&mut *self.random));
        }
        for subgrammar in &mut self.subgrammars {
            if let Some(scope) = subgrammar.symbols.get_mut(key) {
                return Some(scope.select_rule(&mut *self.random));
            }
        }
        None
    }

    /// Selects a rule for `key`.
    ///
    /// Looks in this grammar, then in each sub-grammar. Undefined symbols
    /// yield the placeholder `((key))`.
    pub fn select_rule(&mut self, key: &str) -> String {
        self.try_select_rule(key).unwrap_or_else(|| placeholder(key))
    }

    /// Returns a symbol's scope.
    #[must_use]
    pub fn symbol(&self, key: &str) -> Option<&SymbolScope> {
        self.symbols.get(key)
    }

    /// Returns every symbol scope, ordered by name.
    pub fn symbols(&self) -> impl Iterator<Item = &SymbolScope> {
        self.symbols.values()
    }

    /// Returns true if this grammar or a sub-grammar defines `key`.
    #[must_use]
    pub fn defines(&self, key: &str) -> bool {
        self.symbols.contains_key(key)
            || self
                .subgrammars
                .iter()
                .any(|g| g.symbols.contains_key(key))
    }

    /// Returns the registered modifier names, ordered.
    pub fn modifier_names(&self) -> impl Iterator<Item = &str> {
        self.modifiers.keys().map(String::as_str)
    }

    /// Returns a registered modifier.
    #[must_use]
    pub fn modifier(&self, name: &str) -> Option<&Modifier> {
        self.modifiers.get(name)
    }

    /// Returns the sub-grammars in registration order.
    #[must_use]
    pub fn subgrammars(&self) -> &[Grammar] {
        &self.subgrammars
    }

    /// Returns the settings.
    #[must_use]
    pub fn settings(&self) -> &GrammarSettings {
        &self.settings
    }
}

/// Renders the placeholder text for an undefined symbol.
#[must_use]
pub fn placeholder(key: &str) -> String {
    format!("(({key}))")
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("symbols", &self.symbols.keys().collect::<Vec<_>>())
            .field("modifiers", &self.modifiers.keys().collect::<Vec<_>>())
            .field("subgrammars", &self.subgrammars.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
