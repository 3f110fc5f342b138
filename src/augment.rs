//! Grammar augmentation: `augment(G) -> G'`.
//!
//! Uses an `_expanded` name suffix (retried on collision) rather than the
//! more common single prime mark, since names here are full strings, not
//! single characters.

use crate::error::{GrammarToolError, Result};
use crate::grammar::{Cfg, Production};
use crate::symbol::Symbol;
use log::debug;

/// The augmented grammar plus a pointer back to the symbol that used to be
/// the start symbol, since callers (the table builder, mainly) need to
/// recognize the accept item `S' -> S ·`.
pub struct Augmented {
    pub grammar: Cfg,
    pub original_start: Symbol,
}

pub fn augment(grammar: &Cfg) -> Result<Augmented> {
    let original_start = grammar.start().clone();

    let mut candidate_name = format!("{}_expanded", original_start.name());
    while grammar.nonterminals().iter().any(|s| s.name() == candidate_name)
        || grammar.terminals().iter().any(|s| s.name() == candidate_name)
    {
        debug!("augmented start name {candidate_name} collides, retrying");
        candidate_name = format!("{candidate_name}_expanded");
    }
    let new_start = Symbol::nonterminal(candidate_name);

    let mut nonterminals = grammar.nonterminals().clone();
    nonterminals.insert(new_start.clone());

    let mut terminals = grammar.terminals().clone();
    terminals.insert(Symbol::end_marker());

    let mut productions = grammar.all_productions().to_vec();
    productions.push(Production::new(new_start.clone(), vec![original_start.clone()]));

    let augmented = Cfg::new(
        terminals,
        nonterminals,
        new_start,
        productions,
        grammar.epsilon_nonterminals().clone(),
    )
    .map_err(|e| GrammarToolError::AugmentationFailure(e.to_string()))?;

    Ok(Augmented {
        grammar: augmented,
        original_start,
    })
}
