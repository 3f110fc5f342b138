//! Item-Set NFA Builder.
//!
//! `dfa_builder` fuses closure and goto into one worklist loop and never
//! materializes this graph when computing the canonical DFA. This module
//! builds the NFA explicitly anyway, because DOT emission and tests that
//! inspect the pre-subset-construction graph directly need its ε-edges on
//! their own.

use crate::grammar::{Cfg, Production};
use crate::item::Item;
use crate::symbol::Symbol;
use std::collections::BTreeSet;

fn epsilon_expansion(grammar: &Cfg, nonterminal: &Symbol) -> Vec<Production> {
    let mut expansions: Vec<Production> = grammar.productions_of(nonterminal).to_vec();
    if grammar.is_nullable_symbol(nonterminal) {
        expansions.push(Production::epsilon(nonterminal.clone()));
    }
    expansions
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum NfaEdge {
    /// Closure expansion: dot before nonterminal `B` to `B`'s "dot at left" item.
    Epsilon { from: Item, to: Item },
    /// Shift: dot before `symbol` to the item with the dot moved past it.
    Shift {
        from: Item,
        to: Item,
        symbol: Symbol,
    },
}

/// The item-set NFA: all items reachable from the augmented start item
/// via ε- or shift-edges, plus the two edge relations.
#[derive(Debug, Clone)]
pub struct ItemSetNfa {
    pub start: Item,
    pub nodes: BTreeSet<Item>,
    pub edges: Vec<NfaEdge>,
}

/// Builds the item-set NFA by a worklist over reachable items.
pub fn build_nfa(grammar: &Cfg, start: Item) -> ItemSetNfa {
    let mut nodes = BTreeSet::from([start.clone()]);
    let mut edges = Vec::new();
    let mut worklist = vec![start.clone()];

    while let Some(item) = worklist.pop() {
        let Some(symbol) = item.symbol_after_dot() else {
            continue;
        };

        if symbol.is_nonterminal() {
            for production in epsilon_expansion(grammar, symbol) {
                let target = Item::new(production, 0);
                edges.push(NfaEdge::Epsilon {
                    from: item.clone(),
                    to: target.clone(),
                });
                if nodes.insert(target.clone()) {
                    worklist.push(target);
                }
            }
        }

        let advanced = item.advance();
        edges.push(NfaEdge::Shift {
            from: item.clone(),
            to: advanced.clone(),
            symbol: symbol.clone(),
        });
        if nodes.insert(advanced.clone()) {
            worklist.push(advanced);
        }
    }

    ItemSetNfa {
        start,
        nodes,
        edges,
    }
}

impl ItemSetNfa {
    /// Renders the NFA to DOT: nodes are items rendered via `Display`,
    /// ε-edges are labeled `ε`, shift-edges are labeled by symbol name. Pure
    /// string building, no file I/O.
    pub fn to_dot(&self) -> String {
        let node_id = |item: &Item| -> usize {
            self.nodes.iter().position(|n| n == item).unwrap()
        };

        let nodes: Vec<String> = self
            .nodes
            .iter()
            .map(|item| {
                format!(
                    "    n{} [label=\"{}\"];",
                    node_id(item),
                    item.to_string().replace('"', "\\\"")
                )
            })
            .collect();

        let edges: Vec<String> = self
            .edges
            .iter()
            .map(|edge| match edge {
                NfaEdge::Epsilon { from, to } => {
                    format!("    n{} -> n{} [label=\"\u{03b5}\"];", node_id(from), node_id(to))
                }
                NfaEdge::Shift { from, to, symbol } => {
                    format!(
                        "    n{} -> n{} [label=\"{}\"];",
                        node_id(from),
                        node_id(to),
                        symbol
                    )
                }
            })
            .collect();

        format!(
            "digraph item_set_nfa {{\n{}\n\n{}\n}}",
            nodes.join("\n"),
            edges.join("\n")
        )
    }
}
