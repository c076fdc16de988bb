// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Minimal faithful representations.

mod common;

use common::partition_monoid_p2;
use sims_search::orc::transformation_semigroup_size;
use sims_search::{ActionGraph, MinimalRepOrc, Presentation, SimsError};

#[test_log::test]
fn test_partition_monoid_acts_faithfully_on_seven_points() {
    let orc = MinimalRepOrc::new()
        .presentation(partition_monoid_p2())
        .target_size(15);
    let graph = orc.word_graph(15).unwrap().unwrap();
    assert_eq!(
        graph,
        ActionGraph::from_rows(
            4,
            &[
                [0, 0, 1, 2],
                [1, 1, 1, 1],
                [2, 2, 3, 2],
                [3, 4, 3, 2],
                [4, 3, 5, 2],
                [5, 5, 5, 6],
                [6, 6, 5, 6],
            ]
        )
    );
    assert_eq!(transformation_semigroup_size(&graph, 0, false, 100), Some(15));
}

#[test]
fn test_parallel_search_finds_the_same_degree() {
    let graph = MinimalRepOrc::new()
        .presentation(partition_monoid_p2())
        .target_size(15)
        .number_of_threads(4)
        .word_graph(15)
        .unwrap()
        .unwrap();
    assert_eq!(graph.number_of_nodes(), 7);
    assert_eq!(transformation_semigroup_size(&graph, 0, false, 100), Some(15));
}

#[test]
fn test_no_representation_within_the_bound() {
    let orc = MinimalRepOrc::new()
        .presentation(partition_monoid_p2())
        .target_size(15);
    assert_eq!(orc.word_graph(6), Ok(None));
}

#[test]
fn test_cyclic_group() {
    let p = Presentation::new(1)
        .contains_empty_word(true)
        .rule(&[0, 0, 0, 0, 0], &[]);
    let graph = MinimalRepOrc::new()
        .presentation(p)
        .target_size(5)
        .word_graph(10)
        .unwrap();
    assert_eq!(
        graph,
        Some(ActionGraph::from_rows(1, &[[1], [2], [3], [4], [0]]))
    );
}

#[test]
fn test_target_size_must_be_positive() {
    let orc = MinimalRepOrc::new().presentation(partition_monoid_p2());
    assert!(matches!(orc.word_graph(4), Err(SimsError::InvalidArgument(_))));
}
