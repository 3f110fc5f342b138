//! Item-Set DFA Builder, via canonical subset construction.
//!
//! Closure and goto are fused into one worklist loop rather than built atop
//! an explicitly materialized item-set NFA. [`crate::nfa`] builds that NFA
//! explicitly when one is needed (DOT emission, tests that inspect ε-edges
//! directly); both walk the same closure rule, so the DFA states this module
//! produces are exactly the NFA's subset-construction states.

use crate::first_follow::FirstFollow;
use crate::grammar::{Cfg, Production};
use crate::item::{Item, ItemSet};
use crate::symbol::Symbol;
use log::debug;
use std::collections::{BTreeMap, VecDeque};

/// A canonical collection of item sets with named states and deterministic
/// transitions: states are named in discovery order so two runs over the
/// same grammar produce identical names and transitions.
#[derive(Debug, Clone)]
pub struct ItemSetDfa {
    pub states: Vec<ItemSet>,
    pub names: Vec<String>,
    pub transitions: BTreeMap<(usize, Symbol), usize>,
}

impl ItemSetDfa {
    pub fn name_of(&self, state: usize) -> &str {
        &self.names[state]
    }

    pub fn transition(&self, state: usize, symbol: &Symbol) -> Option<usize> {
        self.transitions.get(&(state, symbol.clone())).copied()
    }

    /// All symbols the grammar could ever shift/goto on, in stable order:
    /// every symbol that appears immediately after some dot in some state.
    pub fn outgoing_symbols(&self, state: usize) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self.states[state]
            .iter()
            .filter_map(Item::symbol_after_dot)
            .cloned()
            .collect();
        symbols.sort();
        symbols.dedup();
        symbols
    }

    /// Renders the DFA to DOT: nodes named by canonical state name `I0…In`,
    /// edges labeled by the transition symbol. Pure string building, no
    /// file I/O.
    pub fn to_dot(&self) -> String {
        let nodes: Vec<String> = self
            .names
            .iter()
            .map(|name| format!("    {name} [shape=box];"))
            .collect();

        let edges: Vec<String> = self
            .transitions
            .iter()
            .map(|((from, symbol), to)| {
                format!(
                    "    {} -> {} [label=\"{}\"];",
                    self.names[*from], self.names[*to], symbol
                )
            })
            .collect();

        format!(
            "digraph item_set_dfa {{\n{}\n\n{}\n}}",
            nodes.join("\n"),
            edges.join("\n")
        )
    }
}

fn closure_lr0(grammar: &Cfg, mut items: ItemSet) -> ItemSet {
    let mut changed = true;
    while changed {
        changed = false;
        let current = items.clone();
        for item in &current {
            if let Some(symbol) = item.symbol_after_dot() {
                if symbol.is_nonterminal() {
                    for production in grammar.productions_of(symbol) {
                        let candidate = Item::new(production.clone(), 0);
                        if items.insert(candidate) {
                            changed = true;
                        }
                    }
                    if grammar.is_nullable_symbol(symbol)
                        && items.insert(Item::new(Production::epsilon(symbol.clone()), 0))
                    {
                        changed = true;
                    }
                }
            }
        }
    }
    items
}

fn goto_lr0(grammar: &Cfg, items: &ItemSet, symbol: &Symbol) -> ItemSet {
    let moved: ItemSet = items
        .iter()
        .filter(|item| item.symbol_after_dot() == Some(symbol))
        .map(Item::advance)
        .collect();
    closure_lr0(grammar, moved)
}

/// Builds the canonical LR(0) item-set DFA, shared by the LR(0) and SLR(1)
/// table strategies.
pub fn build_lr0_dfa(grammar: &Cfg, start_item: Item) -> ItemSetDfa {
    let initial = closure_lr0(grammar, ItemSet::from([start_item]));
    build_worklist(grammar, initial, |grammar, items, symbol| {
        goto_lr0(grammar, items, symbol)
    })
}

fn closure_lr1(grammar: &Cfg, first_follow: &FirstFollow, mut items: ItemSet) -> ItemSet {
    let mut changed = true;
    while changed {
        changed = false;
        let current = items.clone();
        for item in &current {
            let Some(symbol) = item.symbol_after_dot() else {
                continue;
            };
            if !symbol.is_nonterminal() {
                continue;
            }
            let beta = &item.production.rhs[item.dot + 1..];
            let lookahead_symbol = item.lookahead.clone().unwrap_or_else(Symbol::end_marker);

            let mut lookaheads = first_follow.first_of_string(beta);
            if first_follow.is_nullable_string(beta) {
                lookaheads.insert(lookahead_symbol);
            }

            for production in grammar.productions_of(symbol) {
                for lookahead in &lookaheads {
                    let candidate =
                        Item::with_lookahead(production.clone(), 0, lookahead.clone());
                    if items.insert(candidate) {
                        changed = true;
                    }
                }
            }
            if grammar.is_nullable_symbol(symbol) {
                let eps = Production::epsilon(symbol.clone());
                for lookahead in &lookaheads {
                    let candidate = Item::with_lookahead(eps.clone(), 0, lookahead.clone());
                    if items.insert(candidate) {
                        changed = true;
                    }
                }
            }
        }
    }
    items
}

fn goto_lr1(
    grammar: &Cfg,
    first_follow: &FirstFollow,
    items: &ItemSet,
    symbol: &Symbol,
) -> ItemSet {
    let moved: ItemSet = items
        .iter()
        .filter(|item| item.symbol_after_dot() == Some(symbol))
        .map(Item::advance)
        .collect();
    closure_lr1(grammar, first_follow, moved)
}

/// Builds the canonical LR(1) item-set DFA, with lookahead propagation via
/// FIRST(βa) in closure.
pub fn build_lr1_dfa(grammar: &Cfg, first_follow: &FirstFollow, start_item: Item) -> ItemSetDfa {
    let initial = closure_lr1(grammar, first_follow, ItemSet::from([start_item]));
    build_worklist(grammar, initial, |grammar, items, symbol| {
        goto_lr1(grammar, first_follow, items, symbol)
    })
}

fn build_worklist(
    grammar: &Cfg,
    initial: ItemSet,
    goto: impl Fn(&Cfg, &ItemSet, &Symbol) -> ItemSet,
) -> ItemSetDfa {
    let mut states = vec![initial];
    let mut names = vec!["I0".to_string()];
    let mut transitions: BTreeMap<(usize, Symbol), usize> = BTreeMap::new();
    let mut worklist: VecDeque<usize> = VecDeque::from([0]);

    while let Some(state_id) = worklist.pop_front() {
        let mut symbols: Vec<Symbol> = states[state_id]
            .iter()
            .filter_map(Item::symbol_after_dot)
            .cloned()
            .collect();
        symbols.sort();
        symbols.dedup();

        for symbol in symbols {
            let next = goto(grammar, &states[state_id], &symbol);
            if next.is_empty() {
                continue;
            }
            let next_id = match states.iter().position(|s| s == &next) {
                Some(existing) => existing,
                None => {
                    let id = states.len();
                    states.push(next);
                    names.push(format!("I{id}"));
                    worklist.push_back(id);
                    id
                }
            };
            debug!("transition I{state_id} --{symbol}--> I{next_id}");
            transitions.insert((state_id, symbol), next_id);
        }
    }

    ItemSetDfa {
        states,
        names,
        transitions,
    }
}
