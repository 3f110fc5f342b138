//! FIRST and FOLLOW set computation.
//!
//! Nullability is tracked separately from FIRST sets rather than by
//! inserting a synthetic epsilon symbol: `Symbol` has no epsilon kind, so
//! "ε ∈ FIRST(α)" becomes "α is nullable", a plain boolean.

use crate::grammar::Cfg;
use crate::symbol::Symbol;
use log::trace;
use std::collections::{BTreeMap, BTreeSet};

pub type FirstSets = BTreeMap<Symbol, BTreeSet<Symbol>>;
pub type FollowSets = BTreeMap<Symbol, BTreeSet<Symbol>>;

/// The result of running the FIRST/FOLLOW engine over a grammar: FIRST sets,
/// FOLLOW sets, and the nullable-symbol set (which subsumes `Cfg::is_nullable_symbol`
/// by also covering strings, via [`FirstFollow::is_nullable_string`]).
#[derive(Debug, Clone)]
pub struct FirstFollow {
    first: FirstSets,
    follow: FollowSets,
    nullable: BTreeSet<Symbol>,
}

impl FirstFollow {
    /// Runs both fixed points over `grammar` and returns the combined result.
    pub fn compute(grammar: &Cfg) -> Self {
        let nullable = compute_nullable(grammar);
        let first = compute_first_sets(grammar, &nullable);
        let follow = compute_follow_sets(grammar, &first, &nullable);
        FirstFollow {
            first,
            follow,
            nullable,
        }
    }

    pub fn first_of(&self, symbol: &Symbol) -> BTreeSet<Symbol> {
        self.first.get(symbol).cloned().unwrap_or_default()
    }

    pub fn follow_of(&self, nonterminal: &Symbol) -> BTreeSet<Symbol> {
        self.follow.get(nonterminal).cloned().unwrap_or_default()
    }

    pub fn is_nullable_symbol(&self, symbol: &Symbol) -> bool {
        self.nullable.contains(symbol)
    }

    pub fn is_nullable_string(&self, symbols: &[Symbol]) -> bool {
        symbols.iter().all(|s| self.is_nullable_symbol(s))
    }

    /// FIRST of a string of symbols, without epsilon folded in; call
    /// [`FirstFollow::is_nullable_string`] separately to know whether the
    /// string can also vanish entirely.
    pub fn first_of_string(&self, symbols: &[Symbol]) -> BTreeSet<Symbol> {
        let mut result = BTreeSet::new();
        for symbol in symbols {
            result.extend(self.first_of(symbol));
            if !self.is_nullable_symbol(symbol) {
                break;
            }
        }
        result
    }
}

/// Nullability fixed point: a nonterminal is nullable if it has an epsilon
/// alternative (`Cfg::is_nullable_symbol`) or if some production's RHS is
/// entirely composed of nullable symbols.
fn compute_nullable(grammar: &Cfg) -> BTreeSet<Symbol> {
    let mut nullable: BTreeSet<Symbol> = grammar
        .nonterminals()
        .iter()
        .filter(|nt| grammar.is_nullable_symbol(nt))
        .cloned()
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for production in grammar.all_productions() {
            if nullable.contains(&production.lhs) {
                continue;
            }
            if production.rhs.iter().all(|s| nullable.contains(s)) {
                nullable.insert(production.lhs.clone());
                changed = true;
            }
        }
    }
    trace!("nullable set converged with {} symbols", nullable.len());
    nullable
}

fn compute_first_sets(grammar: &Cfg, nullable: &BTreeSet<Symbol>) -> FirstSets {
    let mut first: FirstSets = FirstSets::new();

    for terminal in grammar.terminals() {
        first.insert(terminal.clone(), BTreeSet::from([terminal.clone()]));
    }
    for nonterminal in grammar.nonterminals() {
        first.entry(nonterminal.clone()).or_default();
    }

    let mut changed = true;
    let mut pass = 0;
    while changed {
        changed = false;
        pass += 1;
        for production in grammar.all_productions() {
            let mut rhs_first = BTreeSet::new();
            for symbol in &production.rhs {
                rhs_first.extend(first.get(symbol).cloned().unwrap_or_default());
                if !nullable.contains(symbol) {
                    break;
                }
            }
            let entry = first.entry(production.lhs.clone()).or_default();
            let before = entry.len();
            entry.extend(rhs_first);
            if entry.len() != before {
                changed = true;
            }
        }
        trace!("FIRST fixed-point pass {pass} (changed = {changed})");
    }

    first
}

fn compute_follow_sets(grammar: &Cfg, first: &FirstSets, nullable: &BTreeSet<Symbol>) -> FollowSets {
    let mut follow: FollowSets = FollowSets::new();
    for nonterminal in grammar.nonterminals() {
        follow.entry(nonterminal.clone()).or_default();
    }
    follow
        .entry(grammar.start().clone())
        .or_default()
        .insert(Symbol::end_marker());

    let first_of_string = |symbols: &[Symbol]| -> BTreeSet<Symbol> {
        let mut result = BTreeSet::new();
        for symbol in symbols {
            result.extend(first.get(symbol).cloned().unwrap_or_default());
            if !nullable.contains(symbol) {
                break;
            }
        }
        result
    };
    let string_is_nullable = |symbols: &[Symbol]| symbols.iter().all(|s| nullable.contains(s));

    let mut changed = true;
    let mut pass = 0;
    while changed {
        changed = false;
        pass += 1;
        for production in grammar.all_productions() {
            let rhs = &production.rhs;
            for (i, symbol) in rhs.iter().enumerate() {
                if !symbol.is_nonterminal() {
                    continue;
                }
                let beta = &rhs[i + 1..];
                let mut additions = first_of_string(beta);
                if beta.is_empty() || string_is_nullable(beta) {
                    additions.extend(follow.get(&production.lhs).cloned().unwrap_or_default());
                }
                let entry = follow.entry(symbol.clone()).or_default();
                let before = entry.len();
                entry.extend(additions);
                if entry.len() != before {
                    changed = true;
                }
            }
        }
        trace!("FOLLOW fixed-point pass {pass} (changed = {changed})");
    }

    follow
}
