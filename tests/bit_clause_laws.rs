use clearcount::clause::{BitClause, BitWord, ClauseStore, Counter};
use clearcount::cnf::cnf::{Cnf, Lit};
use clearcount::width::Width;
use num_bigint::BigUint;
use proptest::collection::vec;
use proptest::prelude::*;

const N: u32 = 12;

fn literals() -> impl Strategy<Value = Vec<Lit>> {
    vec((1..=N, any::<bool>()), 0..=6).prop_map(|raw| {
        let mut lits = Vec::<Lit>::new();
        for (var, sign) in raw {
            if lits.iter().all(|l| l.var != var) {
                lits.push(Lit::new(var, sign));
            }
        }
        lits
    })
}

fn counter_value() -> impl Strategy<Value = u64> {
    0u64..(1u64 << N)
}

proptest! {
    #[test]
    fn negate_twice_is_identity(lits in literals()) {
        let c = BitClause::<u64>::from_literals(Width::new(N), &lits);
        let n = c.negate();
        prop_assert_eq!(n.negate(), c.clone());
        prop_assert_eq!(n.presence(), c.presence());
        prop_assert_eq!(n.polarity() & !c.presence(), 0);
    }

    #[test]
    fn counter_fast_path_agrees_with_general_subsumption(
        lits in literals(),
        value in counter_value(),
    ) {
        let w = Width::new(N);
        let c = BitClause::<u64>::from_literals(w, &lits);
        let counter = Counter::starting_at(w, value);
        prop_assert_eq!(c.subsumes_counter(&counter), c.subsumes(counter.as_clause()));
    }

    #[test]
    fn fixed_and_wide_clauses_agree(lits in literals(), value in counter_value()) {
        let w = Width::new(N);
        let narrow = BitClause::<u64>::from_literals(w, &lits);
        let wide = BitClause::<BigUint>::from_literals(w, &lits);
        prop_assert_eq!(narrow.to_string(), wide.to_string());
        prop_assert_eq!(narrow.trailing_free_bits(), wide.trailing_free_bits());
        let a = Counter::starting_at(w, value);
        let b = Counter::starting_at(w, BigUint::from(value));
        prop_assert_eq!(narrow.subsumes_counter(&a), wide.subsumes_counter(&b));
    }

    #[test]
    fn counter_blocking_means_assignment_violates_clause(
        lits in literals(),
        value in counter_value(),
    ) {
        let w = Width::new(N);
        let mut cnf = Cnf::new(N);
        cnf.add_clause(lits.clone());
        let store = ClauseStore::<u64>::from_cnf(&cnf).expect("store");
        let counter = Counter::starting_at(w, value);
        let blocked = store.find_blocking(&counter).count() == 1;
        let model = counter.solution().literals();
        prop_assert_eq!(blocked, !cnf.is_satisfied_by(&model));
    }

    #[test]
    fn jump_lands_past_every_blocked_assignment(lits in literals(), value in counter_value()) {
        let w = Width::new(N);
        let c = BitClause::<u64>::from_literals(w, &lits);
        let t = c.trailing_free_bits();
        let base = value >> t << t;
        let counter = Counter::starting_at(w, base);
        if c.subsumes_counter(&counter) {
            for offset in 0..(1u64 << t).min(64) {
                let probe = Counter::starting_at(w, base + offset);
                prop_assert!(c.subsumes_counter(&probe));
            }
        }
    }
}

#[test]
fn subsumers_of_uses_general_predicate() {
    let w = Width::new(3);
    let mut store = ClauseStore::<u64>::new(w);
    store.add(BitClause::from_literals(w, &[Lit::from_dimacs(1)]));
    store.add(BitClause::from_literals(w, &[Lit::from_dimacs(-1), Lit::from_dimacs(2)]));
    store.add(BitClause::from_literals(w, &[Lit::from_dimacs(2)]));
    // agrees on every shared variable but fails the numeric presence check
    store.add(BitClause::from_literals(
        w,
        &[Lit::from_dimacs(1), Lit::from_dimacs(2), Lit::from_dimacs(3)],
    ));
    let target = BitClause::from_literals(w, &[Lit::from_dimacs(1), Lit::from_dimacs(2)]);
    let hits = store.subsumers_of(&target).map(|c| c.to_string()).collect::<Vec<_>>();
    assert_eq!(hits, vec!["1 0".to_string(), "2 0".to_string()]);
}

#[test]
fn wide_words_carry_past_64_bits() {
    let w = Width::new(70);
    let mut counter = Counter::starting_at(w, <BigUint as BitWord>::low_ones(64));
    counter.advance(0);
    assert_eq!(*counter.value(), BigUint::from(1u64) << 64u32);
    assert!(!counter.is_exhausted());
}
