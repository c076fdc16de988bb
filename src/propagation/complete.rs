// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Checks that only make sense once every edge is defined.

use crate::context::SearchContext;
use crate::graph::ActionGraph;
use crate::presentation::Word;

impl SearchContext {
    /// Whether every long rule holds at every node of the (complete) graph.
    pub fn long_rules_hold(&self) -> bool {
        let graph = self.graph();
        self.memo.long_rules.iter().all(|(lhs, rhs)| {
            (0..graph.number_of_nodes()).all(|node| graph.follow(node, lhs) == graph.follow(node, rhs))
        })
    }
}

/// Whether the right congruence described by a complete graph is two-sided.
///
/// With `rep(i)` the spanning-tree word of node `i`, left multiplication by a
/// letter `a` induces `f_a(i) = 0·(a·rep(i))`. The congruence is two-sided
/// exactly when every `f_a` is a graph endomorphism: `f_a(i·b) = f_a(i)·b`.
///
/// Returns `false` for incomplete graphs and for graphs with nodes
/// unreachable from the root.
pub fn is_two_sided(graph: &ActionGraph) -> bool {
    if !graph.is_complete() {
        return false;
    }
    let reps: Option<Vec<Word>> = graph.spanning_tree().into_iter().collect();
    let Some(reps) = reps else {
        return false;
    };
    let nodes = graph.number_of_nodes();
    let mut image = vec![0; nodes];
    for a in 0..graph.out_degree() {
        let Some(start) = graph.target(0, a) else {
            return false;
        };
        for (i, rep) in reps.iter().enumerate() {
            match graph.follow(start, rep) {
                Some(t) => image[i] = t,
                None => return false,
            }
        }
        for i in 0..nodes {
            for b in 0..graph.out_degree() {
                if graph.target(i, b).map(|t| image[t]) != graph.target(image[i], b) {
                    return false;
                }
            }
        }
    }
    true
}
