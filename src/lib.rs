//! LR parsing-table construction toolkit.
//!
//! Given a [`grammar::Cfg`], this crate augments it (`augment`), computes
//! FIRST/FOLLOW sets (`first_follow`), builds the canonical item-set DFA
//! (`dfa_builder`, with the item-set NFA available separately in `nfa` for
//! inspection/DOT emission), and fills an LR(0)/SLR(1)/LR(1) parsing table
//! (`table`) with conflicts recorded rather than resolved. A generic DFA
//! [`simulator::Simulator`] is included to validate automata independently
//! of the table-construction pipeline. Table construction is where this
//! crate stops -- it does not drive a parse over input tokens.

pub mod augment;
pub mod dfa_builder;
pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod item;
pub mod loader;
pub mod nfa;
pub mod simulator;
pub mod symbol;
pub mod table;

pub use augment::{augment, Augmented};
pub use error::{GrammarToolError, Result};
pub use first_follow::FirstFollow;
pub use grammar::{Cfg, Production};
pub use item::{Item, ItemSet};
pub use loader::{GrammarLoader, InMemoryLoader};
pub use simulator::{Dfa, Simulator};
pub use symbol::{Symbol, SymbolKind};
pub use table::{fill_table, ParsingTable, Strategy, TableKind};
