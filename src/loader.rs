//! `GrammarLoader` collaborator contract.
//!
//! The trait boundary between the out-of-scope YAML front end and the core:
//! the core never depends on a concrete parser, only on `fn load(...) -> Result<Cfg>`.
//! [`InMemoryLoader`] is the one concrete implementation shipped here, built
//! from an already-parsed [`Cfg`] and used by this crate's own test suite in
//! place of a YAML fixture.

use crate::error::Result;
use crate::grammar::Cfg;

/// Turns some external `source` representation into a validated [`Cfg`].
///
/// A YAML-backed implementation is a natural next increment for a thin CLI
/// driver; it is not part of this core.
pub trait GrammarLoader {
    fn load(&self, source: &str) -> Result<Cfg>;
}

/// A test-only loader that ignores `source` and returns a pre-built [`Cfg`].
/// Stands in for a YAML loader in tests that only care about what the core
/// does with a `Cfg`, not how one was parsed.
pub struct InMemoryLoader {
    grammar: Cfg,
}

impl InMemoryLoader {
    pub fn new(grammar: Cfg) -> Self {
        InMemoryLoader { grammar }
    }
}

impl GrammarLoader for InMemoryLoader {
    fn load(&self, _source: &str) -> Result<Cfg> {
        Ok(self.grammar.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Production;
    use crate::symbol::Symbol;
    use std::collections::BTreeSet;

    #[test]
    fn in_memory_loader_ignores_source_and_returns_the_grammar() {
        let grammar = Cfg::new(
            BTreeSet::from([Symbol::terminal("a")]),
            BTreeSet::from([Symbol::nonterminal("S")]),
            Symbol::nonterminal("S"),
            vec![Production::new(
                Symbol::nonterminal("S"),
                vec![Symbol::terminal("a")],
            )],
            BTreeSet::new(),
        )
        .unwrap();

        let loader = InMemoryLoader::new(grammar);
        let loaded = loader.load("unused-path.yaml").unwrap();
        assert_eq!(loaded.all_productions().len(), 1);
    }
}
