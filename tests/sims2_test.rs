// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Two-sided congruence enumeration.

mod common;

use common::{partition_monoid_p2, small_monoid};
use sims_search::propagation::is_two_sided;
use sims_search::{Presentation, Sims};

#[test]
fn test_free_commutative_semigroup_counts() {
    let p = Presentation::new(2).rule(&[0, 1], &[1, 0]);
    let sims = Sims::sims2().presentation(p);
    let counts: Vec<u64> = (1..=6)
        .map(|n| sims.number_of_congruences(n).unwrap())
        .collect();
    assert_eq!(counts, vec![1, 9, 37, 117, 301, 699]);
}

#[test]
fn test_partition_monoid_two_sided_congruences() {
    let sims = Sims::sims2().presentation(partition_monoid_p2());
    assert_eq!(sims.number_of_congruences(16), Ok(13));
}

#[test]
fn test_two_sided_solutions_are_right_congruences() {
    let p = small_monoid();
    let right: Vec<_> = Sims::sims1().presentation(p.clone()).iter(5).unwrap().collect();
    let two_sided: Vec<_> = Sims::sims2().presentation(p).iter(5).unwrap().collect();
    assert!(!two_sided.is_empty());
    assert!(two_sided.len() <= right.len());
    for graph in &two_sided {
        assert!(is_two_sided(graph));
        assert!(right.contains(graph));
    }
    for graph in right.iter().filter(|g| !two_sided.contains(g)) {
        assert!(!is_two_sided(graph));
    }
}

#[test]
fn test_two_sided_counts_are_thread_invariant() {
    let p = Presentation::new(2).rule(&[0, 1], &[1, 0]);
    let sims = Sims::sims2().presentation(p);
    for threads in [2, 4] {
        assert_eq!(
            sims.clone().number_of_threads(threads).number_of_congruences(4),
            Ok(117)
        );
    }
}
