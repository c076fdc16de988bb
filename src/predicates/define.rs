// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! DefineEdgePredicate - the branch point of the search.

use log::trace;

use crate::context::SearchContext;
use crate::engine::{Predicate, PredicateResult};
use crate::presentation::Letter;
use crate::state::Counters;

/// Picks the first undefined edge, in node-then-letter order, and branches
/// over its target: every existing non-root node in increasing order, then a
/// fresh node while the node bound allows one.
///
/// Each round defines one edge and propagates it. When no edge is undefined
/// the predicate succeeds and the graph moves on to acceptance.
///
/// Branching in this order is what makes every congruence appear exactly
/// once: nodes are created in the order their spanning-tree words are
/// first reached, so the graphs produced are in a canonical labelling.
#[derive(Debug, Default)]
pub struct DefineEdgePredicate {
    /// The edge branched on in each round so far.
    edges: Vec<(usize, Letter)>,
}

impl DefineEdgePredicate {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Predicate for DefineEdgePredicate {
    fn try_pred(&mut self, ctx: &mut SearchContext, round: usize) -> PredicateResult {
        self.edges.truncate(round);
        // Everything before the previous round's edge is already defined.
        let (node, letter) = self.edges.last().copied().unwrap_or((0, 0));
        match ctx.graph().next_undefined_from(node, letter) {
            None => PredicateResult::Success,
            Some(edge) => {
                self.edges.push(edge);
                PredicateResult::Choices(ctx.number_of_candidates())
            }
        }
    }

    fn retry_pred(&mut self, ctx: &mut SearchContext, round: usize, choice: usize) -> PredicateResult {
        let (node, letter) = self.edges[round];
        let target = ctx.candidate(choice);
        ctx.statistics.increment(Counters::Choices);

        if let Err(failure) = ctx.try_define(node, letter, target) {
            trace!("{} --{}--> {} failed: {}", node, letter, target, failure);
            ctx.statistics.record_failure(&failure);
            return PredicateResult::Failure;
        }
        if !ctx.pruners_accept() {
            return PredicateResult::Failure;
        }
        PredicateResult::SuccessSamePredicate
    }

    fn name(&self) -> &str {
        "DefineEdge"
    }
}
