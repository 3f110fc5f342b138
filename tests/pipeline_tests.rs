//! End-to-end tests running the full augment -> FIRST/FOLLOW -> DFA -> table
//! pipeline against a handful of representative grammars (clean SLR(1),
//! epsilon productions, an SLR(1)/LR(1) divergence, and a start-symbol
//! collision during augmentation).

use lr_table_toolkit::augment::augment;
use lr_table_toolkit::dfa_builder::{build_lr0_dfa, build_lr1_dfa};
use lr_table_toolkit::first_follow::FirstFollow;
use lr_table_toolkit::grammar::{Cfg, Production};
use lr_table_toolkit::item::Item;
use lr_table_toolkit::symbol::Symbol;
use lr_table_toolkit::table::{fill_table, Strategy};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn nt(name: &str) -> Symbol {
    Symbol::nonterminal(name)
}
fn t(name: &str) -> Symbol {
    Symbol::terminal(name)
}

fn start_item_for(grammar: &Cfg) -> Item {
    let start_production = grammar
        .productions_of(grammar.start())
        .first()
        .expect("augmented grammar has exactly one start production")
        .clone();
    Item::new(start_production, 0)
}

// S -> a S b | a: SLR(1) is conflict-free, but LR(0) has a shift/reduce
// conflict on 'a', since LR(0) reduces S -> a on every terminal regardless
// of FOLLOW(S), while the same state also shifts on 'a'.
#[test]
fn slr1_is_clean_lr0_has_conflicts() {
    let grammar = Cfg::new(
        BTreeSet::from([t("a"), t("b")]),
        BTreeSet::from([nt("S")]),
        nt("S"),
        vec![
            Production::new(nt("S"), vec![t("a"), nt("S"), t("b")]),
            Production::new(nt("S"), vec![t("a")]),
        ],
        BTreeSet::new(),
    )
    .unwrap();

    let augmented = augment(&grammar).unwrap();
    let dfa = build_lr0_dfa(&augmented.grammar, start_item_for(&augmented.grammar));
    assert!(dfa.states.len() >= 5 && dfa.states.len() <= 8);

    let first_follow = FirstFollow::compute(&augmented.grammar);
    let slr1_table = fill_table(&augmented, &dfa, Strategy::Slr1(&first_follow));
    assert!(slr1_table.find_conflicts().is_empty());

    let lr0_table = fill_table(&augmented, &dfa, Strategy::Lr0);
    assert!(!lr0_table.find_conflicts().is_empty());
}

// S -> A b, A -> a | ε
#[test]
fn epsilon_reduce_only_under_follow_set() {
    let grammar = Cfg::new(
        BTreeSet::from([t("a"), t("b")]),
        BTreeSet::from([nt("S"), nt("A")]),
        nt("S"),
        vec![
            Production::new(nt("S"), vec![nt("A"), t("b")]),
            Production::new(nt("A"), vec![t("a")]),
        ],
        BTreeSet::from([nt("A")]),
    )
    .unwrap();

    let first_follow = FirstFollow::compute(&grammar);
    assert_eq!(
        first_follow.first_of(&nt("A")),
        BTreeSet::from([t("a")])
    );
    assert!(first_follow.is_nullable_symbol(&nt("A")));
    assert_eq!(
        first_follow.first_of(&nt("S")),
        BTreeSet::from([t("a"), t("b")])
    );
    assert_eq!(first_follow.follow_of(&nt("A")), BTreeSet::from([t("b")]));

    let augmented = augment(&grammar).unwrap();
    let dfa = build_lr0_dfa(&augmented.grammar, start_item_for(&augmented.grammar));
    let augmented_first_follow = FirstFollow::compute(&augmented.grammar);
    let table = fill_table(&augmented, &dfa, Strategy::Slr1(&augmented_first_follow));

    // Find the state holding [A -> ·] and confirm its only reduce target is 'b'.
    let state_with_epsilon_item = dfa
        .states
        .iter()
        .position(|state| {
            state
                .iter()
                .any(|item| item.production.lhs == nt("A") && item.production.rhs.is_empty())
        })
        .expect("some state must contain the synthetic [A -> ·] item");
    let state_name = dfa.name_of(state_with_epsilon_item);

    let epsilon_reduce = lr_table_toolkit::table::ActionEntry::Reduce(Production::new(
        nt("A"),
        vec![],
    ));
    let actions_on_b = table.get_actions(state_name, &t("b")).unwrap();
    assert!(actions_on_b.contains(&epsilon_reduce));

    // 'a' still shifts (the A -> a alternative), but never reduces A -> ε:
    // the epsilon reduce is only licensed by FOLLOW(A) = {b}.
    let actions_on_a = table.get_actions(state_name, &t("a"));
    if let Ok(actions_on_a) = actions_on_a {
        assert!(!actions_on_a.contains(&epsilon_reduce));
    }
}

// S -> L = R | R, L -> * R | id, R -> L
#[test]
fn slr1_conflict_lr1_clean() {
    let grammar = Cfg::new(
        BTreeSet::from([t("="), t("*"), t("id")]),
        BTreeSet::from([nt("S"), nt("L"), nt("R")]),
        nt("S"),
        vec![
            Production::new(nt("S"), vec![nt("L"), t("="), nt("R")]),
            Production::new(nt("S"), vec![nt("R")]),
            Production::new(nt("L"), vec![t("*"), nt("R")]),
            Production::new(nt("L"), vec![t("id")]),
            Production::new(nt("R"), vec![nt("L")]),
        ],
        BTreeSet::new(),
    )
    .unwrap();

    let augmented = augment(&grammar).unwrap();
    let first_follow = FirstFollow::compute(&augmented.grammar);

    let lr0_dfa = build_lr0_dfa(&augmented.grammar, start_item_for(&augmented.grammar));
    let slr1_table = fill_table(&augmented, &lr0_dfa, Strategy::Slr1(&first_follow));
    assert!(
        !slr1_table.find_conflicts().is_empty(),
        "classic S -> L=R | R is not SLR(1): FOLLOW(R) must include '='"
    );

    let lr1_start = Item::with_lookahead(
        augmented
            .grammar
            .productions_of(augmented.grammar.start())
            .first()
            .unwrap()
            .clone(),
        0,
        Symbol::end_marker(),
    );
    let lr1_dfa = build_lr1_dfa(&augmented.grammar, &first_follow, lr1_start);
    let lr1_table = fill_table(&augmented, &lr1_dfa, Strategy::Lr1);
    assert!(
        lr1_table.find_conflicts().is_empty(),
        "canonical LR(1) must resolve the SLR(1) conflict"
    );
}

// Start symbol S with an existing nonterminal named S_expanded already in the
// grammar: augmentation must retry past the collision.
#[test]
fn augmentation_retries_past_existing_collision() {
    let grammar = Cfg::new(
        BTreeSet::from([t("a")]),
        BTreeSet::from([nt("S"), nt("S_expanded")]),
        nt("S"),
        vec![
            Production::new(nt("S"), vec![t("a")]),
            Production::new(nt("S_expanded"), vec![t("a")]),
        ],
        BTreeSet::new(),
    )
    .unwrap();

    let augmented = augment(&grammar).unwrap();
    assert_eq!(augmented.grammar.start().name(), "S_expanded_expanded");
    let productions_of_new_start = augmented.grammar.productions_of(augmented.grammar.start());
    assert_eq!(productions_of_new_start.len(), 1);
    assert_eq!(productions_of_new_start[0].rhs, vec![nt("S")]);
}
