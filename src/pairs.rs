// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Generating pairs of the right congruence described by an action graph.
//!
//! Each node of a complete graph is named by its spanning-tree word. Every
//! edge off the tree gives a pair `(rep(s)·a, rep(t))` of words in the same
//! class, and these pairs together generate the congruence. Knowing the
//! presentation lets most of them be dropped: an edge the defining rules
//! already force adds nothing.

use std::sync::Arc;

use log::debug;

use crate::context::{MemoizedData, SearchContext, SearchSettings};
use crate::error::{Result, SimsError};
use crate::graph::ActionGraph;
use crate::presentation::{Presentation, Rule, Word};

/// Spanning-tree words, failing if a node is unreachable.
fn representatives(graph: &ActionGraph) -> Result<Vec<Word>> {
    graph
        .spanning_tree()
        .into_iter()
        .enumerate()
        .map(|(node, rep)| {
            rep.ok_or_else(|| {
                SimsError::InvalidArgument(format!("node {} is not reachable from the root", node))
            })
        })
        .collect()
}

fn check_complete(graph: &ActionGraph) -> Result<()> {
    if graph.number_of_nodes() == 0 || !graph.is_complete() {
        return Err(SimsError::InvalidArgument(
            "generating pairs need a complete, non-empty graph".into(),
        ));
    }
    Ok(())
}

fn is_tree_edge(reps: &[Word], node: usize, letter: usize, target: usize) -> bool {
    let parent = &reps[node];
    let child = &reps[target];
    child.len() == parent.len() + 1 && child.starts_with(parent) && child[parent.len()] == letter
}

/// One pair per edge outside the spanning tree, in node-then-letter order.
pub fn right_generating_pairs(graph: &ActionGraph) -> Result<Vec<Rule>> {
    check_complete(graph)?;
    let reps = representatives(graph)?;
    let mut pairs = Vec::new();
    for node in 0..graph.number_of_nodes() {
        for (letter, &target) in graph.row(node).iter().enumerate() {
            if !is_tree_edge(&reps, node, letter, target) {
                let mut word = reps[node].clone();
                word.push(letter);
                pairs.push((word, reps[target].clone()));
            }
        }
    }
    Ok(pairs)
}

/// The pairs of [`right_generating_pairs`] not already implied by the
/// rules of `presentation`.
///
/// Starting from the spanning tree, the rules are propagated to a fixpoint.
/// Each edge still undefined, taken in node-then-letter order, is recorded as
/// a pair and then defined, and the rules are propagated again.
pub fn right_generating_pairs_with(
    presentation: &Presentation,
    graph: &ActionGraph,
) -> Result<Vec<Rule>> {
    presentation.validate()?;
    check_complete(graph)?;
    if graph.out_degree() != presentation.alphabet_size() {
        return Err(SimsError::IncompatibleConfiguration(format!(
            "graph has {} letters, presentation has {}",
            graph.out_degree(),
            presentation.alphabet_size()
        )));
    }
    let reps = representatives(graph)?;
    let n = graph.number_of_nodes();

    let memo = MemoizedData::new(presentation.clone(), &SearchSettings::default(), n);
    let mut ctx = SearchContext::new(Arc::new(memo));
    let incompatible =
        || SimsError::IncompatibleConfiguration("graph does not satisfy the presentation".into());

    for _ in 0..n {
        ctx.activate_node();
    }
    for node in 0..n {
        for (letter, &target) in graph.row(node).iter().enumerate() {
            if is_tree_edge(&reps, node, letter, target) {
                ctx.define(node, letter, target);
            }
        }
    }
    ctx.process(0).map_err(|_| incompatible())?;

    let mut pairs = Vec::new();
    for node in 0..n {
        for (letter, &target) in graph.row(node).iter().enumerate() {
            match ctx.graph().target(node, letter) {
                Some(t) if t == target => {}
                Some(_) => return Err(incompatible()),
                None => {
                    let mut word = reps[node].clone();
                    word.push(letter);
                    pairs.push((word, reps[target].clone()));
                    ctx.try_define(node, letter, target)
                        .map_err(|_| incompatible())?;
                }
            }
        }
    }
    debug!(
        "{} generating pairs, {} deductions",
        pairs.len(),
        ctx.statistics.get(crate::state::Counters::Deductions)
    );
    Ok(pairs)
}
