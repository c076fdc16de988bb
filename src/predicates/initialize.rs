// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! InitializePredicate - activates and checks the root.

use log::trace;

use crate::context::SearchContext;
use crate::engine::{Predicate, PredicateResult};

/// InitializePredicate activates node 0 and propagates every rule and
/// included pair from it, then runs the pruners on the result.
///
/// This predicate is deterministic and runs exactly once (round=0 only).
/// On a context that is already initialized (a subtree handed over by the
/// scheduler) it succeeds without doing anything.
///
/// The trail is frozen afterwards: no backtracking past initialization.
#[derive(Debug)]
pub struct InitializePredicate;

impl Predicate for InitializePredicate {
    fn try_pred(&mut self, ctx: &mut SearchContext, round: usize) -> PredicateResult {
        assert_eq!(
            round, 0,
            "InitializePredicate must be called exactly once with round=0"
        );
        if ctx.is_initialized() {
            return PredicateResult::Success;
        }

        if let Err(failure) = ctx.initialize() {
            trace!("Root rejected: {}", failure);
            ctx.statistics.record_failure(&failure);
            return PredicateResult::Failure;
        }
        if !ctx.pruners_accept() {
            return PredicateResult::Failure;
        }
        ctx.trail.freeze();
        PredicateResult::Success
    }

    fn name(&self) -> &str {
        "Initialize"
    }
}
