//! Node expansion.
//!
//! Expansion walks an [`ExpansionTree`] depth first. Raw nodes parse into
//! children, tags resolve a symbol through the grammar and apply modifiers,
//! and actions push or pop symbol bindings. Each node is expanded at most
//! once; the `expanded` flag makes re-expansion a no-op.

use std::fmt::Write;

use fabula_foundation::{Error, ErrorContext, ExpansionLimit, Result};
use fabula_language::{ActionKind, parse, parse_action, parse_tag};

use crate::error::ExpansionError;
use crate::grammar::{Grammar, placeholder};
use crate::node::{
    ActionRecord, BindingEffect, ExpansionTree, NodeId, NodeKind, NodeRecord, TagRecord,
};
use crate::rule_set::RuleSet;

impl Grammar {
    // =========================================================================
    // Expansion
    // =========================================================================

    /// Expands one node of `tree`.
    ///
    /// With `prevent_recursion`, children are created but left unexpanded, to
    /// be expanded later by [`Grammar::step`].
    ///
    /// # Errors
    ///
    /// Returns an error if the node is deeper than `max_depth`, or if an
    /// action pops a symbol that has nothing to pop. Authoring problems are
    /// recorded on the nodes instead.
    pub fn expand_node(
        &mut self,
        tree: &mut ExpansionTree,
        id: NodeId,
        prevent_recursion: bool,
    ) -> Result<()> {
        if tree.node(id).expanded {
            return Ok(());
        }
        self.check_depth(tree, id)?;
        tree.node_mut(id).expanded = true;

        match tree.node(id).kind {
            NodeKind::Raw => self.expand_raw(tree, id, prevent_recursion),
            NodeKind::Literal => {
                let node = tree.node_mut(id);
                node.finished_text = node.raw.clone();
                Ok(())
            }
            NodeKind::Tag => self.expand_tag(tree, id, prevent_recursion),
            NodeKind::Action => self.expand_action(tree, id),
        }
    }

    fn check_depth(&self, tree: &ExpansionTree, id: NodeId) -> Result<()> {
        let node = tree.node(id);
        let limit = self.settings.max_depth;
        if node.depth <= limit {
            return Ok(());
        }

        let mut context = ErrorContext::new();
        for ancestor in tree.ancestors(id).into_iter().rev() {
            let ancestor = tree.node(ancestor);
            if ancestor.kind == NodeKind::Tag {
                context = context.with_frame(format!("#{}#", ancestor.raw));
            }
        }
        Err(Error::limit_exceeded(ExpansionLimit::MaxDepth {
            limit,
            rule: Some(node.raw.clone()),
        })
        .with_context(context))
    }

    fn expand_raw(
        &mut self,
        tree: &mut ExpansionTree,
        id: NodeId,
        prevent_recursion: bool,
    ) -> Result<()> {
        let parsed = parse(&tree.node(id).raw);
        tree.node_mut(id)
            .errors
            .extend(parsed.errors.into_iter().map(ExpansionError::from));

        for section in parsed.sections {
            let child = tree.add_child(id, section.kind, section.raw);
            if !prevent_recursion {
                self.expand_node(tree, child, false)?;
            }
        }

        let text = concat_children(tree, id);
        tree.node_mut(id).finished_text = text;
        Ok(())
    }

    fn expand_tag(
        &mut self,
        tree: &mut ExpansionTree,
        id: NodeId,
        prevent_recursion: bool,
    ) -> Result<()> {
        let depth = tree.node(id).depth;
        let spec = match parse_tag(&tree.node(id).raw) {
            Ok(spec) => spec,
            Err(err) => {
                tree.node_mut(id).errors.push(err.into());
                return Ok(());
            }
        };

        let mut errors: Vec<ExpansionError> =
            spec.errors.into_iter().map(ExpansionError::from).collect();

        let mut preactions = Vec::with_capacity(spec.preactions.len());
        for raw in &spec.preactions {
            if let Some(record) = self.activate(raw, depth, &mut errors)? {
                preactions.push(record);
            }
        }

        let (kind, child_raw, selected_rule) = match &spec.symbol {
            None => {
                errors.push(ExpansionError::MissingRule);
                (NodeKind::Raw, String::new(), None)
            }
            Some(symbol) => {
                if let Some(rule) = self.try_select_rule(symbol) {
                    (NodeKind::Raw, rule.clone(), Some(rule))
                } else {
                    tracing::debug!(symbol = %symbol, "undefined symbol");
                    errors.push(ExpansionError::UndefinedSymbol(symbol.clone()));
                    (NodeKind::Literal, placeholder(symbol), None)
                }
            }
        };

        let child = tree.add_child(id, kind, child_raw);
        if !prevent_recursion {
            self.expand_node(tree, child, false)?;
        }

        let text = tree.node(child).finished_text.clone();
        let text = self.apply_modifiers(&spec.modifiers, text, Some(&mut errors));

        let node = tree.node_mut(id);
        node.finished_text = text;
        node.errors.extend(errors);
        node.record = Some(NodeRecord::Tag(TagRecord {
            symbol: spec.symbol,
            modifiers: spec.modifiers,
            selected_rule,
            preactions,
        }));
        Ok(())
    }

    fn expand_action(&mut self, tree: &mut ExpansionTree, id: NodeId) -> Result<()> {
        let depth = tree.node(id).depth;
        let raw = tree.node(id).raw.clone();
        let mut errors = Vec::new();
        let record = self.activate(&raw, depth, &mut errors)?;

        let node = tree.node_mut(id);
        node.finished_text.clear();
        node.errors.extend(errors);
        node.record = record.map(NodeRecord::Action);
        Ok(())
    }

    /// Runs one action. Returns `None` if the action could not be parsed.
    fn activate(
        &mut self,
        raw: &str,
        depth: usize,
        errors: &mut Vec<ExpansionError>,
    ) -> Result<Option<ActionRecord>> {
        let spec = match parse_action(raw) {
            Ok(spec) => spec,
            Err(err) => {
                errors.push(err.into());
                return Ok(None);
            }
        };

        let effect = match spec.kind {
            ActionKind::Push { rule } => {
                let mut payload = ExpansionTree::with_base_depth(rule, depth + 1);
                let root = payload.root();
                self.expand_node(&mut payload, root, false)?;
                errors.extend(payload.errors().into_iter().map(|(_, e)| e.clone()));

                let text = payload.finished_text().to_string();
                let bound = fabula_language::escape(&text);
                self.push_rule_set(&spec.target, RuleSet::single(bound), true);
                BindingEffect::Push { text }
            }
            ActionKind::Pop => {
                self.pop_rules(&spec.target)?;
                BindingEffect::Pop
            }
        };

        Ok(Some(ActionRecord {
            target: spec.target,
            effect,
        }))
    }

    /// Applies a modifier chain left to right.
    ///
    /// Unknown modifiers append `((.name))`; they are recorded in `errors`
    /// when it is given.
    fn apply_modifiers(
        &self,
        modifiers: &[String],
        mut text: String,
        mut errors: Option<&mut Vec<ExpansionError>>,
    ) -> String {
        for name in modifiers {
            if let Some(modifier) = self.modifiers.get(name) {
                text = modifier(&text);
            } else if let Some(modifier) = self
                .subgrammars
                .iter()
                .find_map(|grammar| grammar.modifiers.get(name))
            {
                text = modifier(&text);
            } else {
                let _ = write!(text, "((.{name}))");
                if let Some(errors) = errors.as_deref_mut() {
                    tracing::debug!(modifier = %name, "unknown modifier");
                    errors.push(ExpansionError::UnknownModifier(name.clone()));
                }
            }
        }
        text
    }

    // =========================================================================
    // Stepping
    // =========================================================================

    /// Expands the next unexpanded node (pre-order) without recursing, then
    /// recomposes the text of every expanded node.
    ///
    /// Returns the node that was expanded, or `None` once the tree is
    /// complete.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Grammar::expand_node`].
    pub fn step(&mut self, tree: &mut ExpansionTree) -> Result<Option<NodeId>> {
        let Some(id) = tree.next_unexpanded() else {
            return Ok(None);
        };
        self.expand_node(tree, id, true)?;
        self.recompose(tree);
        Ok(Some(id))
    }

    /// Rebuilds `finished_text` bottom-up for every expanded node.
    ///
    /// Unexpanded nodes contribute nothing. Modifiers are re-applied without
    /// recording errors a second time.
    pub fn recompose(&self, tree: &mut ExpansionTree) {
        for id in tree.pre_order().into_iter().rev() {
            let node = tree.node(id);
            if !node.expanded {
                continue;
            }
            let text = match node.kind {
                NodeKind::Literal => node.raw.clone(),
                NodeKind::Action => String::new(),
                NodeKind::Raw => concat_children(tree, id),
                NodeKind::Tag => {
                    let text = concat_children(tree, id);
                    match node.tag_record() {
                        Some(record) => self.apply_modifiers(&record.modifiers, text, None),
                        None => text,
                    }
                }
            };
            tree.node_mut(id).finished_text = text;
        }
    }
}

fn concat_children(tree: &ExpansionTree, id: NodeId) -> String {
    tree.node(id)
        .children
        .iter()
        .map(|&child| tree.node(child).finished_text.as_str())
        .collect()
}
