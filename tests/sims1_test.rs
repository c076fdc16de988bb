// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Right congruence enumeration against known counts.

mod common;

use common::{inverse_semigroup_presentation, partition_monoid_p2, rows, small_monoid};
use sims_search::{ActionGraph, Presentation, Sims};

fn counts(sims: &Sims, bounds: impl IntoIterator<Item = usize>) -> Vec<u64> {
    bounds
        .into_iter()
        .map(|n| sims.number_of_congruences(n).unwrap())
        .collect()
}

#[test_log::test]
fn test_small_monoid_solutions_in_order() {
    let sims = Sims::sims1().presentation(small_monoid());
    let graphs: Vec<Vec<Vec<usize>>> = sims.iter(5).unwrap().map(|g| rows(&g)).collect();
    assert_eq!(
        graphs,
        vec![
            vec![vec![0, 0]],
            vec![vec![1, 0], vec![1, 1]],
            vec![vec![1, 1], vec![1, 1]],
            vec![vec![1, 2], vec![1, 1], vec![1, 2]],
            vec![vec![1, 2], vec![1, 1], vec![2, 2]],
            vec![vec![1, 2], vec![1, 1], vec![3, 2], vec![3, 3]],
        ]
    );
}

#[test]
fn test_small_monoid_counts() {
    let sims = Sims::sims1().presentation(small_monoid());
    assert_eq!(counts(&sims, 1..=5), vec![1, 3, 5, 6, 6]);
}

#[test]
fn test_left_congruences_via_reversed_presentation() {
    let sims = Sims::sims1().presentation(small_monoid().reversed());
    assert_eq!(sims.number_of_congruences(5), Ok(9));
}

#[test]
fn test_included_pair() {
    let sims = Sims::sims1().presentation(small_monoid()).include(&[0], &[1]);
    let graphs: Vec<ActionGraph> = sims.iter(5).unwrap().collect();
    assert_eq!(
        graphs,
        vec![
            ActionGraph::from_rows(2, &[[0, 0]]),
            ActionGraph::from_rows(2, &[[1, 1], [1, 1]]),
        ]
    );
}

#[test]
fn test_three_generator_monoid_counts() {
    let p = Presentation::new(3)
        .contains_empty_word(true)
        .rule(&[0, 1, 0], &[0, 0])
        .rule(&[2, 2], &[0, 0])
        .rule(&[0, 0, 0], &[0, 0])
        .rule(&[2, 1], &[1, 2])
        .rule(&[2, 0], &[0, 0])
        .rule(&[1, 1], &[1])
        .rule(&[0, 2], &[0, 0]);
    let sims = Sims::sims1().presentation(p);
    assert_eq!(
        counts(&sims, 1..=10),
        vec![1, 3, 13, 36, 82, 135, 166, 175, 176, 176]
    );
}

#[test]
fn test_long_rules_do_not_change_the_count() {
    let p = Presentation::new(4)
        .rule(&[1, 2, 1], &[1, 1])
        .rule(&[3, 3], &[1, 1])
        .rule(&[1, 1, 1], &[1, 1])
        .rule(&[3, 2], &[2, 3])
        .rule(&[3, 1], &[1, 1])
        .rule(&[2, 2], &[2])
        .rule(&[1, 3], &[1, 1]);
    let sims = Sims::sims1().presentation(p);
    assert_eq!(sims.number_of_congruences(2), Ok(67));
    assert_eq!(sims.clone().long_rule_length(4).number_of_congruences(2), Ok(67));
    assert_eq!(sims.long_rule_length(0).number_of_congruences(2), Ok(67));
}

#[test]
fn test_partition_monoid_counts() {
    let sims = Sims::sims1().presentation(partition_monoid_p2());
    assert_eq!(counts(&sims, 2..=7), vec![4, 7, 14, 23, 36, 51]);
}

#[test]
fn test_inverse_semigroup_count() {
    let sims = Sims::sims1().presentation(inverse_semigroup_presentation());
    assert_eq!(sims.number_of_congruences(3), Ok(14));
}

#[test]
fn test_counts_are_monotone_and_match_iter() {
    let sims = Sims::sims1().presentation(partition_monoid_p2());
    let mut previous = 0;
    for n in 1..=6 {
        let count = sims.number_of_congruences(n).unwrap();
        assert!(count >= previous);
        assert_eq!(sims.iter(n).unwrap().count() as u64, count);
        previous = count;
    }
}

#[test]
fn test_single_thread_order_is_deterministic() {
    let sims = Sims::sims1().presentation(partition_monoid_p2());
    let first: Vec<ActionGraph> = sims.iter(5).unwrap().collect();
    let second: Vec<ActionGraph> = sims.iter(5).unwrap().collect();
    assert_eq!(first, second);

    let mut visited = Vec::new();
    sims.for_each(5, |g| visited.push(g.clone())).unwrap();
    assert_eq!(visited, first);
}

#[test]
fn test_find_if_returns_first_match() {
    let sims = Sims::sims1().presentation(small_monoid());
    let found = sims.find_if(5, |g| g.number_of_nodes() == 3).unwrap();
    assert_eq!(
        found,
        Some(ActionGraph::from_rows(2, &[[1, 2], [1, 1], [1, 2]]))
    );
    assert_eq!(sims.find_if(5, |g| g.number_of_nodes() == 5), Ok(None));
}

#[test]
fn test_every_solution_satisfies_the_rules() {
    let p = partition_monoid_p2();
    let sims = Sims::sims1().presentation(p.clone());
    for graph in sims.iter(5).unwrap() {
        assert!(graph.is_complete());
        for node in 0..graph.number_of_nodes() {
            for (u, v) in p.rules() {
                assert_eq!(graph.follow(node, u), graph.follow(node, v));
            }
        }
        // The auxiliary root is never a target.
        assert!(graph.rows().all(|row| row.iter().all(|&t| t != 0)));
    }
}

#[test]
fn test_reconfiguring_does_not_affect_a_running_iterator() {
    let sims = Sims::sims1().presentation(small_monoid());
    let mut it = sims.iter(5).unwrap();
    let first = it.next();
    let sims = sims.presentation(Presentation::new(1).contains_empty_word(true));
    assert_eq!(sims.number_of_congruences(2), Ok(3));
    assert_eq!(first, Some(ActionGraph::from_rows(2, &[[0, 0]])));
    assert_eq!(it.count(), 5);
}
