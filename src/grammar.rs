//! Context-free grammar model.
//!
//! A [`Cfg`] bundles terminals `T`, nonterminals `N`, a start symbol `S`, a
//! production map `P`, and a set `E` of nonterminals that also carry an
//! epsilon alternative. Epsilon is never a [`Symbol`] inside a production's
//! right-hand side; membership in `E` is the only representation of "this
//! nonterminal can derive the empty string directly".

use crate::error::{GrammarToolError, Result};
use crate::symbol::Symbol;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A production rule `lhs -> rhs`. `rhs` is never empty: an epsilon
/// alternative for `lhs` is recorded by adding `lhs` to the grammar's
/// epsilon set instead of pushing a `Production` here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Production {
    pub lhs: Symbol,
    pub rhs: Vec<Symbol>,
}

impl Production {
    pub fn new(lhs: Symbol, rhs: Vec<Symbol>) -> Self {
        Self { lhs, rhs }
    }

    /// The synthetic `lhs -> ε` production used internally by closure
    /// construction for a nonterminal that carries an epsilon alternative.
    /// `Cfg` never stores this production -- it only records membership in
    /// the epsilon set -- so callers synthesize it on demand rather than
    /// looking it up.
    pub fn epsilon(lhs: Symbol) -> Self {
        Self { lhs, rhs: vec![] }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.lhs)?;
        if self.rhs.is_empty() {
            write!(f, " \u{03b5}")?;
        }
        for sym in &self.rhs {
            write!(f, " {}", sym)?;
        }
        Ok(())
    }
}

/// A context-free grammar: `T`, `N`, `S`, `P`, and `E`.
#[derive(Debug, Clone)]
pub struct Cfg {
    terminals: BTreeSet<Symbol>,
    nonterminals: BTreeSet<Symbol>,
    start: Symbol,
    productions: Vec<Production>,
    production_map: BTreeMap<Symbol, Vec<Production>>,
    epsilon_nonterminals: BTreeSet<Symbol>,
}

impl Cfg {
    /// Builds a grammar and validates its invariants:
    /// `T ∩ N = ∅`; `S ∈ N`; every RHS symbol is in `T ∪ N`; every RHS is
    /// non-empty; every member of `E` is in `N`.
    pub fn new(
        terminals: BTreeSet<Symbol>,
        nonterminals: BTreeSet<Symbol>,
        start: Symbol,
        productions: Vec<Production>,
        epsilon_nonterminals: BTreeSet<Symbol>,
    ) -> Result<Self> {
        if !terminals.is_disjoint(&nonterminals) {
            return Err(GrammarToolError::InvalidGrammar(
                "terminals and nonterminals overlap".to_string(),
            ));
        }
        if !nonterminals.contains(&start) {
            return Err(GrammarToolError::InvalidGrammar(format!(
                "start symbol {start} is not a declared nonterminal"
            )));
        }
        for prod in &productions {
            if !nonterminals.contains(&prod.lhs) {
                return Err(GrammarToolError::InvalidGrammar(format!(
                    "production LHS {} is not a declared nonterminal",
                    prod.lhs
                )));
            }
            if prod.rhs.is_empty() {
                return Err(GrammarToolError::InvalidGrammar(format!(
                    "production {} has an empty right-hand side; use the epsilon set instead",
                    prod.lhs
                )));
            }
            for sym in &prod.rhs {
                if !terminals.contains(sym) && !nonterminals.contains(sym) {
                    return Err(GrammarToolError::InvalidGrammar(format!(
                        "symbol {sym} in production for {} is neither a declared terminal nor nonterminal",
                        prod.lhs
                    )));
                }
            }
        }
        for nt in &epsilon_nonterminals {
            if !nonterminals.contains(nt) {
                return Err(GrammarToolError::InvalidGrammar(format!(
                    "epsilon-producing symbol {nt} is not a declared nonterminal"
                )));
            }
        }

        let mut production_map: BTreeMap<Symbol, Vec<Production>> = BTreeMap::new();
        for prod in &productions {
            production_map
                .entry(prod.lhs.clone())
                .or_default()
                .push(prod.clone());
        }

        Ok(Self {
            terminals,
            nonterminals,
            start,
            productions,
            production_map,
            epsilon_nonterminals,
        })
    }

    pub fn terminals(&self) -> &BTreeSet<Symbol> {
        &self.terminals
    }

    pub fn nonterminals(&self) -> &BTreeSet<Symbol> {
        &self.nonterminals
    }

    pub fn start(&self) -> &Symbol {
        &self.start
    }

    pub fn all_productions(&self) -> &[Production] {
        &self.productions
    }

    /// Productions whose LHS is `nt` (excluding its epsilon alternative, if
    /// any -- check [`Cfg::is_nullable`] for that).
    pub fn productions_of(&self, nt: &Symbol) -> &[Production] {
        self.production_map
            .get(nt)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `nt` has an epsilon alternative, i.e. `nt ∈ E`.
    pub fn is_nullable_symbol(&self, nt: &Symbol) -> bool {
        self.epsilon_nonterminals.contains(nt)
    }

    pub fn epsilon_nonterminals(&self) -> &BTreeSet<Symbol> {
        &self.epsilon_nonterminals
    }
}

impl fmt::Display for Cfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for prod in &self.productions {
            writeln!(f, "{}", prod)?;
        }
        for nt in &self.epsilon_nonterminals {
            writeln!(f, "{nt} -> ε")?;
        }
        Ok(())
    }
}
