//! Parsing Table Value and Builder.
//!
//! Conflicts are logged and recorded, never treated as a build failure, and
//! an empty ACTION is not the same thing as an empty cell -- a cell is empty
//! only when neither table has an entry for it at all.

use crate::augment::Augmented;
use crate::dfa_builder::ItemSetDfa;
use crate::error::{GrammarToolError, Result};
use crate::first_follow::FirstFollow;
use crate::grammar::{Cfg, Production};
use crate::item::Item;
use crate::symbol::Symbol;
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionEntry {
    Shift(String),
    Reduce(Production),
    Accept,
    /// An explicit error marker. The builder never emits this; it exists so
    /// a caller can record "this cell is deliberately an error" rather than
    /// leaving it unfilled. A cell holding both an `Error` and something else
    /// is still a conflict -- no entry kind is special-cased out.
    Error,
}

impl fmt::Display for ActionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionEntry::Shift(s) => write!(f, "shift {s}"),
            ActionEntry::Reduce(p) => write!(f, "reduce {p}"),
            ActionEntry::Accept => write!(f, "accept"),
            ActionEntry::Error => write!(f, "error"),
        }
    }
}

/// Which of the three strategies filled this table; carried for diagnostics
/// and for `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Lr0,
    Slr1,
    Lr1,
}

/// Report produced by `filling_check`: cells that were never filled, and
/// cells recorded for a state/symbol outside the declared universe.
#[derive(Debug, Clone, Default)]
pub struct FillingReport {
    pub missing_cells: Vec<(String, Symbol)>,
    pub unrecognized_cells: Vec<(String, Symbol)>,
}

impl FillingReport {
    pub fn is_valid(&self) -> bool {
        self.missing_cells.is_empty() && self.unrecognized_cells.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ParsingTable {
    kind: TableKind,
    action_table: BTreeMap<(String, Symbol), BTreeSet<ActionEntry>>,
    goto_table: BTreeMap<(String, Symbol), BTreeSet<String>>,
    all_states: BTreeSet<String>,
    all_symbols: BTreeSet<Symbol>,
}

impl ParsingTable {
    fn new(kind: TableKind, all_states: BTreeSet<String>, all_symbols: BTreeSet<Symbol>) -> Self {
        ParsingTable {
            kind,
            action_table: BTreeMap::new(),
            goto_table: BTreeMap::new(),
            all_states,
            all_symbols,
        }
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// Inserts an ACTION entry. Returns whether it was newly inserted; a
    /// duplicate insertion is not a conflict. A second, *different* entry in
    /// the same cell is logged as a conflict but still inserted -- the
    /// caller finds out about it later via `find_conflicts`, not here.
    pub fn add_action(&mut self, state: &str, symbol: &Symbol, entry: ActionEntry) -> bool {
        let key = (state.to_string(), symbol.clone());
        let cell_was_empty = self.check_cell_empty(state, symbol);
        let entries = self.action_table.entry(key).or_default();
        if entries.contains(&entry) {
            debug!("action {entry} already present at ({state}, {symbol}), skipping");
            return false;
        }
        if !cell_was_empty && !entries.is_empty() {
            warn!("conflict in action table at ({state}, {symbol}): adding {entry}");
        }
        entries.insert(entry);
        true
    }

    pub fn add_goto(&mut self, state: &str, symbol: &Symbol, next_state: &str) -> bool {
        let key = (state.to_string(), symbol.clone());
        let cell_was_empty = self.check_cell_empty(state, symbol);
        let entries = self.goto_table.entry(key).or_default();
        if entries.contains(next_state) {
            debug!("goto {next_state} already present at ({state}, {symbol}), skipping");
            return false;
        }
        if !cell_was_empty && !entries.is_empty() {
            warn!("conflict in goto table at ({state}, {symbol}): adding {next_state}");
        }
        entries.insert(next_state.to_string());
        true
    }

    /// An empty ACTION cell is not the same as an empty overall cell: the
    /// cell is empty only if neither table has an entry for (state, symbol).
    pub fn check_cell_empty(&self, state: &str, symbol: &Symbol) -> bool {
        let key = (state.to_string(), symbol.clone());
        let action_empty = self
            .action_table
            .get(&key)
            .map(BTreeSet::is_empty)
            .unwrap_or(true);
        let goto_empty = self
            .goto_table
            .get(&key)
            .map(BTreeSet::is_empty)
            .unwrap_or(true);
        action_empty && goto_empty
    }

    pub fn get_actions(&self, state: &str, symbol: &Symbol) -> Result<&BTreeSet<ActionEntry>> {
        if !symbol.is_terminal() && !symbol.is_end_marker() {
            return Err(GrammarToolError::WrongCategory {
                symbol: symbol.to_string(),
                expected: "terminal",
                actual: "nonterminal",
            });
        }
        let key = (state.to_string(), symbol.clone());
        self.action_table
            .get(&key)
            .filter(|entries| !entries.is_empty())
            .ok_or_else(|| GrammarToolError::NoSuchCell {
                state: state.to_string(),
                symbol: symbol.to_string(),
            })
    }

    pub fn get_gotos(&self, state: &str, symbol: &Symbol) -> Result<&BTreeSet<String>> {
        if !symbol.is_nonterminal() {
            return Err(GrammarToolError::WrongCategory {
                symbol: symbol.to_string(),
                expected: "nonterminal",
                actual: "terminal",
            });
        }
        let key = (state.to_string(), symbol.clone());
        self.goto_table
            .get(&key)
            .filter(|entries| !entries.is_empty())
            .ok_or_else(|| GrammarToolError::NoSuchCell {
                state: state.to_string(),
                symbol: symbol.to_string(),
            })
    }

    /// Permissive filling check: reports every empty (state, symbol) pair
    /// over the declared universe, plus any recorded cell that falls outside
    /// it. Never fails the build; callers decide what to do with the report.
    pub fn filling_check(&self) -> FillingReport {
        let mut report = FillingReport::default();
        for state in &self.all_states {
            for symbol in &self.all_symbols {
                if self.check_cell_empty(state, symbol) {
                    report.missing_cells.push((state.clone(), symbol.clone()));
                }
            }
        }
        for (state, symbol) in self.action_table.keys().chain(self.goto_table.keys()) {
            if !self.all_states.contains(state) || !self.all_symbols.contains(symbol) {
                report
                    .unrecognized_cells
                    .push((state.clone(), symbol.clone()));
            }
        }
        if !report.is_valid() {
            warn!(
                "filling check failed: {} missing cells, {} unrecognized cells",
                report.missing_cells.len(),
                report.unrecognized_cells.len()
            );
        }
        report
    }

    /// Returns every (state, symbol) ACTION cell with more than one entry.
    pub fn find_conflicts(&self) -> Vec<(String, Symbol)> {
        let mut conflicts = Vec::new();
        for ((state, symbol), entries) in &self.action_table {
            if entries.len() > 1 {
                warn!(
                    "conflict at ({state}, {symbol}): {} competing actions",
                    entries.len()
                );
                conflicts.push((state.clone(), symbol.clone()));
            }
        }
        conflicts
    }
}

impl fmt::Display for ParsingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for state in &self.all_states {
            for symbol in &self.all_symbols {
                let key = (state.clone(), symbol.clone());
                if let Some(entries) = self.action_table.get(&key) {
                    for entry in entries {
                        writeln!(f, "ACTION[{state}, {symbol}] = {entry}")?;
                    }
                }
                if let Some(entries) = self.goto_table.get(&key) {
                    for entry in entries {
                        writeln!(f, "GOTO[{state}, {symbol}] = {entry}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// The reduce-lookahead set `L(A, γ, Iᵢ)` varies per strategy; this is the
/// one place the three builders differ.
pub enum Strategy<'a> {
    Lr0,
    Slr1(&'a FirstFollow),
    Lr1,
}

fn reduce_lookaheads(strategy: &Strategy, grammar: &Cfg, item: &Item) -> BTreeSet<Symbol> {
    match strategy {
        Strategy::Lr0 => {
            let mut set: BTreeSet<Symbol> = grammar.terminals().clone();
            set.insert(Symbol::end_marker());
            set
        }
        Strategy::Slr1(first_follow) => first_follow.follow_of(&item.production.lhs),
        Strategy::Lr1 => item
            .lookahead
            .clone()
            .into_iter()
            .collect::<BTreeSet<_>>(),
    }
}

/// Fills a parsing table from an already-built item-set DFA. The DFA itself
/// must already match the strategy: LR(0)/SLR(1) share an LR(0) DFA, LR(1)
/// needs one built with lookahead-carrying items.
pub fn fill_table(augmented: &Augmented, dfa: &ItemSetDfa, strategy: Strategy) -> ParsingTable {
    let kind = match strategy {
        Strategy::Lr0 => TableKind::Lr0,
        Strategy::Slr1(_) => TableKind::Slr1,
        Strategy::Lr1 => TableKind::Lr1,
    };

    let all_states: BTreeSet<String> = dfa.names.iter().cloned().collect();
    let mut all_symbols: BTreeSet<Symbol> = augmented.grammar.terminals().clone();
    all_symbols.extend(augmented.grammar.nonterminals().clone());

    let mut table = ParsingTable::new(kind, all_states, all_symbols);
    let augmented_start = augmented.grammar.start().clone();

    for (state_id, state) in dfa.states.iter().enumerate() {
        let name = dfa.name_of(state_id).to_string();
        for item in state {
            if !item.is_reduce_item() {
                let symbol = item.symbol_after_dot().unwrap();
                let Some(next_id) = dfa.transition(state_id, symbol) else {
                    continue;
                };
                let next_name = dfa.name_of(next_id).to_string();
                if symbol.is_terminal() || symbol.is_end_marker() {
                    table.add_action(&name, symbol, ActionEntry::Shift(next_name));
                } else if symbol.is_nonterminal() {
                    table.add_goto(&name, symbol, &next_name);
                }
                continue;
            }

            if item.production.lhs == augmented_start {
                table.add_action(&name, &Symbol::end_marker(), ActionEntry::Accept);
                continue;
            }

            for lookahead in reduce_lookaheads(&strategy, &augmented.grammar, item) {
                table.add_action(
                    &name,
                    &lookahead,
                    ActionEntry::Reduce(item.production.clone()),
                );
            }
        }
    }

    table
}
