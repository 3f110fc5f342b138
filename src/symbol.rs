//! Symbol types for context-free grammars.
//!
//! A [`Symbol`] is a name tagged with a [`SymbolKind`]. Unlike a textbook
//! single-character encoding, names are full strings so grammars are not
//! limited to 26 nonterminals. There is deliberately no `Epsilon` kind here:
//! epsilon is tracked at the grammar level (see [`crate::grammar`]) as
//! membership in the nullable-production set, never as a symbol in a
//! right-hand side.

use std::cmp::Ordering;
use std::fmt;

/// What role a [`Symbol`] plays in a grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    Terminal,
    Nonterminal,
    /// The synthetic `$` end-of-input marker introduced by augmentation.
    EndMarker,
}

/// A grammar symbol: a name, a kind, and an optional opaque tag.
///
/// The tag is carried through but never interpreted by the core; it exists
/// so a collaborator (e.g. a loader) can stash provenance without the core
/// needing to know about it.
#[derive(Debug, Clone, Eq)]
pub struct Symbol {
    name: String,
    kind: SymbolKind,
    tag: Option<String>,
}

impl Symbol {
    pub fn terminal(name: impl Into<String>) -> Self {
        Symbol {
            name: name.into(),
            kind: SymbolKind::Terminal,
            tag: None,
        }
    }

    pub fn nonterminal(name: impl Into<String>) -> Self {
        Symbol {
            name: name.into(),
            kind: SymbolKind::Nonterminal,
            tag: None,
        }
    }

    pub fn end_marker() -> Self {
        Symbol {
            name: "$".to_string(),
            kind: SymbolKind::EndMarker,
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    #[inline]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, SymbolKind::Terminal)
    }

    #[inline]
    pub fn is_nonterminal(&self) -> bool {
        matches!(self.kind, SymbolKind::Nonterminal)
    }

    #[inline]
    pub fn is_end_marker(&self) -> bool {
        matches!(self.kind, SymbolKind::EndMarker)
    }
}

/// Equality and hashing are over `(name, kind)` only; the tag is metadata.
impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.kind == other.kind
    }
}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.kind.hash(state);
    }
}

/// Total order used for canonical output: kind first (terminal < nonterminal
/// < end-marker), then name. This is what makes DOT emission and table
/// printing reproducible across runs.
impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
