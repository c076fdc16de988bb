// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! AcceptPredicate - final checks on a complete graph.

use log::trace;

use crate::context::SearchContext;
use crate::engine::{Predicate, PredicateResult};
use crate::propagation::is_two_sided;
use crate::sims::CongruenceKind;
use crate::state::Counters;

/// Runs the checks that are only decidable once every edge is defined:
/// the long rules at every node, then, for two-sided searches, compatibility
/// with left multiplication. The pruners get a last look at the complete
/// graph before it is counted as a solution.
#[derive(Debug)]
pub struct AcceptPredicate;

impl Predicate for AcceptPredicate {
    fn try_pred(&mut self, ctx: &mut SearchContext, _round: usize) -> PredicateResult {
        debug_assert!(ctx.graph().is_complete());
        if !ctx.long_rules_hold() {
            trace!("Long rules fail on {}", ctx.graph());
            ctx.statistics.increment(Counters::Rejected);
            return PredicateResult::Failure;
        }
        if ctx.memo.kind == CongruenceKind::TwoSided && !is_two_sided(ctx.graph()) {
            trace!("Not two-sided: {}", ctx.graph());
            ctx.statistics.increment(Counters::Rejected);
            return PredicateResult::Failure;
        }
        if !ctx.pruners_accept() {
            return PredicateResult::Failure;
        }
        ctx.statistics.increment(Counters::Solutions);
        PredicateResult::Success
    }

    fn name(&self) -> &str {
        "Accept"
    }
}
