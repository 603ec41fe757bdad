//! Distribution sampling.
//!
//! Expands a rule many times and counts which candidate each symbol chose,
//! to check by eye that selection behaves as intended.

use std::collections::BTreeMap;
use std::fmt;

use fabula_engine::{ExpansionTree, Grammar};
use fabula_foundation::Result;
use serde::Serialize;

const BAR_WIDTH: f64 = 40.0;

/// How often one candidate rule was chosen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CandidateUsage {
    /// The candidate rule text.
    pub rule: String,
    /// Times it was chosen.
    pub count: u64,
}

/// Selection counts for one symbol.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SymbolUsage {
    /// Total selections.
    pub selections: u64,
    /// Per-candidate counts; base candidates first, in definition order.
    pub candidates: Vec<CandidateUsage>,
}

impl SymbolUsage {
    fn record(&mut self, rule: &str) {
        self.selections += 1;
        match self.candidates.iter_mut().find(|c| c.rule == rule) {
            Some(candidate) => candidate.count += 1,
            None => self.candidates.push(CandidateUsage {
                rule: rule.to_string(),
                count: 1,
            }),
        }
    }
}

/// The result of sampling a rule.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UsageReport {
    /// The sampled rule.
    pub rule: String,
    /// Number of expansions.
    pub runs: usize,
    /// Usage per symbol, ordered by name.
    pub symbols: BTreeMap<String, SymbolUsage>,
}

impl UsageReport {
    /// Adds the tag selections of one expansion tree.
    pub fn add_tree(&mut self, tree: &ExpansionTree) {
        for id in tree.pre_order() {
            let Some(record) = tree.node(id).tag_record() else {
                continue;
            };
            if let (Some(symbol), Some(rule)) = (&record.symbol, &record.selected_rule) {
                self.symbols.entry(symbol.clone()).or_default().record(rule);
            }
        }
    }
}

/// Expands `rule` `runs` times and reports which candidates were chosen.
///
/// The grammar's state is cleared before every run, and once more at the
/// end.
///
/// # Errors
///
/// Returns the first fatal expansion error.
pub fn sample(grammar: &mut Grammar, rule: &str, runs: usize) -> Result<UsageReport> {
    let mut report = UsageReport {
        rule: rule.to_string(),
        runs,
        symbols: BTreeMap::new(),
    };

    // Seed every defined candidate so unchosen ones show up with zero.
    for scope in grammar.symbols().filter(|s| !s.is_dynamic()) {
        let usage = report.symbols.entry(scope.key().to_string()).or_default();
        for candidate in scope.base().rules() {
            if !usage.candidates.iter().any(|c| &c.rule == candidate) {
                usage.candidates.push(CandidateUsage {
                    rule: candidate.clone(),
                    count: 0,
                });
            }
        }
    }

    for _ in 0..runs {
        grammar.clear_state();
        let tree = grammar.expand(rule)?;
        report.add_tree(&tree);
    }
    grammar.clear_state();

    report.symbols.retain(|_, usage| usage.selections > 0);
    Ok(report)
}

impl fmt::Display for UsageReport {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} runs of {:?}", self.runs, self.rule)?;
        for (symbol, usage) in &self.symbols {
            writeln!(f, "#{symbol}# ({} selections)", usage.selections)?;
            for candidate in &usage.candidates {
                let share = candidate.count as f64 / usage.selections.max(1) as f64;
                let bar = "#".repeat((share * BAR_WIDTH).round() as usize);
                writeln!(
                    f,
                    "  {:>6} {:>5.1}% {bar:<width$} {:?}",
                    candidate.count,
                    share * 100.0,
                    candidate.rule,
                    width = BAR_WIDTH as usize,
                )?;
            }
        }
        Ok(())
    }
}
