//! Generic DFA Simulator.
//!
//! A single type-parametric struct covers any alphabet type rather than
//! pairing a `char`-only simulator with a separately templated one.

use crate::error::{GrammarToolError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::hash::Hash;

/// A finite automaton over an arbitrary alphabet `T`.
#[derive(Debug, Clone)]
pub struct Dfa<T: Eq + Hash + Ord + Clone> {
    pub alphabet: BTreeSet<T>,
    pub states: BTreeSet<String>,
    pub initial_state: String,
    pub accepting_states: BTreeSet<String>,
    pub transitions: BTreeMap<(String, T), String>,
}

impl<T: Eq + Hash + Ord + Clone + Display> Dfa<T> {
    /// Validates the automaton's invariants: `initial ∈ states`;
    /// `accepting ⊆ states`; every transition's source, target ∈ states;
    /// every transition symbol ∈ alphabet.
    pub fn validate(&self) -> Result<()> {
        if !self.states.contains(&self.initial_state) {
            return Err(GrammarToolError::SimulatorConfigInvalid(format!(
                "initial state {} is not in the state set",
                self.initial_state
            )));
        }
        if !self.accepting_states.is_subset(&self.states) {
            return Err(GrammarToolError::SimulatorConfigInvalid(
                "accepting states are not a subset of the state set".to_string(),
            ));
        }
        for ((source, symbol), target) in &self.transitions {
            if !self.states.contains(source) {
                return Err(GrammarToolError::SimulatorConfigInvalid(format!(
                    "transition source {source} is not in the state set"
                )));
            }
            if !self.states.contains(target) {
                return Err(GrammarToolError::SimulatorConfigInvalid(format!(
                    "transition target {target} is not in the state set"
                )));
            }
            if !self.alphabet.contains(symbol) {
                return Err(GrammarToolError::SimulatorConfigInvalid(format!(
                    "transition symbol {symbol} is not in the alphabet"
                )));
            }
        }
        Ok(())
    }

    fn is_accepting(&self, state: &str) -> bool {
        self.accepting_states.contains(state)
    }

    fn step(&self, state: &str, symbol: &T) -> Option<&str> {
        self.transitions
            .get(&(state.to_string(), symbol.clone()))
            .map(String::as_str)
    }

    /// Renders the DFA to DOT: plain string building, no file I/O.
    pub fn to_dot(&self) -> String {
        let nodes: Vec<String> = self
            .states
            .iter()
            .map(|state| {
                let shape = if self.accepting_states.contains(state) {
                    "doublecircle"
                } else {
                    "circle"
                };
                format!("    {state} [shape={shape}];")
            })
            .collect();

        let edges: Vec<String> = self
            .transitions
            .iter()
            .map(|((from, symbol), to)| format!("    {from} -> {to} [label=\"{symbol}\"];"))
            .collect();

        format!(
            "digraph dfa {{\n{}\n\n{}\n}}",
            nodes.join("\n"),
            edges.join("\n")
        )
    }
}

/// Runs a validated [`Dfa`] over sequences, accumulating a trace as it goes.
///
/// The trace is built up by appending, never overwritten mid-simulation, so a
/// caller inspecting `last_trace` after `simulate` sees the complete path
/// taken, not just the final step.
pub struct Simulator<T: Eq + Hash + Ord + Clone> {
    dfa: Dfa<T>,
    last_trace: Vec<String>,
}

impl<T: Eq + Hash + Ord + Clone + Display> Simulator<T> {
    /// Installs `dfa` after validating it.
    pub fn update(dfa: Dfa<T>) -> Result<Self> {
        dfa.validate()?;
        Ok(Simulator {
            dfa,
            last_trace: Vec::new(),
        })
    }

    pub fn last_trace(&self) -> &[String] {
        &self.last_trace
    }

    /// Simulates `sequence` against the installed DFA. An empty sequence is
    /// rejected, not an error; an unknown state or a symbol missing from the
    /// current state's row is also a rejection, never an error.
    pub fn simulate(&mut self, sequence: &[T]) -> bool {
        self.last_trace.clear();
        if sequence.is_empty() {
            return false;
        }

        let mut current = self.dfa.initial_state.clone();
        self.last_trace.push(current.clone());

        for symbol in sequence {
            let Some(next) = self.dfa.step(&current, symbol) else {
                return false;
            };
            current = next.to_string();
            self.last_trace.push(current.clone());
        }

        self.dfa.is_accepting(&current)
    }

    /// DFS enumeration of every accepted sequence of length ≤ `max_len`.
    pub fn generate_accepted(&self, max_len: usize) -> BTreeSet<Vec<T>> {
        let mut accepted = BTreeSet::new();
        let mut path = Vec::new();
        self.generate_from(&self.dfa.initial_state, &mut path, max_len, &mut accepted);
        accepted
    }

    fn generate_from(
        &self,
        state: &str,
        path: &mut Vec<T>,
        max_len: usize,
        accepted: &mut BTreeSet<Vec<T>>,
    ) {
        if self.dfa.is_accepting(state) && !path.is_empty() {
            accepted.insert(path.clone());
        }
        if path.len() >= max_len {
            return;
        }
        for symbol in &self.dfa.alphabet {
            if let Some(next) = self.dfa.step(state, symbol) {
                let next = next.to_string();
                path.push(symbol.clone());
                self.generate_from(&next, path, max_len, accepted);
                path.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ab_dfa() -> Dfa<char> {
        Dfa {
            alphabet: BTreeSet::from(['a', 'b']),
            states: BTreeSet::from(["q0".to_string(), "q1".to_string()]),
            initial_state: "q0".to_string(),
            accepting_states: BTreeSet::from(["q1".to_string()]),
            transitions: BTreeMap::from([
                (("q0".to_string(), 'a'), "q1".to_string()),
                (("q0".to_string(), 'b'), "q0".to_string()),
                (("q1".to_string(), 'a'), "q1".to_string()),
                (("q1".to_string(), 'b'), "q0".to_string()),
            ]),
        }
    }

    // S5
    #[test]
    fn simulates_accept_reject_unknown_symbol_and_empty_input() {
        let mut sim = Simulator::update(ab_dfa()).unwrap();
        assert!(sim.simulate(&['a']));
        assert!(!sim.simulate(&['b']));
        assert!(!sim.simulate(&['c']));
        assert!(!sim.simulate(&[]));
    }

    #[test]
    fn trace_accumulates_every_visited_state() {
        let mut sim = Simulator::update(ab_dfa()).unwrap();
        sim.simulate(&['a', 'a', 'b']);
        assert_eq!(sim.last_trace(), &["q0", "q1", "q1", "q0"]);
    }

    #[test]
    fn rejects_dfa_with_initial_state_outside_state_set() {
        let mut dfa = ab_dfa();
        dfa.initial_state = "q99".to_string();
        assert!(Simulator::update(dfa).is_err());
    }

    #[test]
    fn generate_accepted_enumerates_up_to_max_len() {
        let sim = Simulator::update(ab_dfa()).unwrap();
        let accepted = sim.generate_accepted(2);
        assert!(accepted.contains(&vec!['a']));
        assert!(accepted.contains(&vec!['a', 'a']));
        assert!(!accepted.contains(&vec!['b']));
    }

    // S6: a tiny "real number" DFA over digit/'.' characters.
    fn real_number_dfa() -> Dfa<char> {
        let digits: Vec<char> = "0123456789".chars().collect();
        let mut transitions = BTreeMap::new();
        for &d in &digits {
            transitions.insert(("start".to_string(), d), "int_part".to_string());
            transitions.insert(("int_part".to_string(), d), "int_part".to_string());
            transitions.insert(("frac_part".to_string(), d), "frac_part".to_string());
        }
        transitions.insert(("int_part".to_string(), '.'), "frac_part".to_string());

        let mut alphabet: BTreeSet<char> = digits.into_iter().collect();
        alphabet.insert('.');

        Dfa {
            alphabet,
            states: BTreeSet::from([
                "start".to_string(),
                "int_part".to_string(),
                "frac_part".to_string(),
            ]),
            initial_state: "start".to_string(),
            accepting_states: BTreeSet::from(["frac_part".to_string()]),
            transitions,
        }
    }

    #[test]
    fn real_number_dfa_accepts_one_decimal_point() {
        let mut sim = Simulator::update(real_number_dfa()).unwrap();
        assert!(sim.simulate(&['3', '.', '4', '5', '6']));
    }

    #[test]
    fn real_number_dfa_rejects_multiple_decimal_points() {
        let mut sim = Simulator::update(real_number_dfa()).unwrap();
        let input: Vec<char> = "192.168.0.1".chars().collect();
        assert!(!sim.simulate(&input));
    }

    #[test]
    fn to_dot_marks_accepting_states_as_doublecircle() {
        let dot = ab_dfa().to_dot();
        assert!(dot.starts_with("digraph dfa {"));
        assert!(dot.contains("q1 [shape=doublecircle];"));
        assert!(dot.contains("q0 [shape=circle];"));
    }
}
