// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The unit of a search program.
//!
//! # Example
//!
//! ```
//! use sims_search::engine::{Predicate, PredicateResult};
//! use sims_search::context::SearchContext;
//!
//! /// Succeeds twice, once per choice.
//! #[derive(Debug)]
//! struct Either;
//!
//! impl Predicate for Either {
//!     fn try_pred(&mut self, _ctx: &mut SearchContext, _round: usize) -> PredicateResult {
//!         PredicateResult::Choices(2)
//!     }
//!
//!     fn retry_pred(&mut self, _ctx: &mut SearchContext, _round: usize, _choice: usize) -> PredicateResult {
//!         PredicateResult::Success
//!     }
//! }
//! ```

use std::fmt::Debug;

use crate::context::SearchContext;

/// Outcome of one predicate call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateResult {
    /// Continue with the next predicate.
    Success,
    /// Call this predicate again with the next round.
    SuccessSamePredicate,
    /// Backtrack.
    Failure,
    /// Explore `retry_pred(round, c)` for each `c` in `0..n`, in order.
    Choices(usize),
    /// Hand the current state to the caller. Resuming backtracks.
    Suspend,
}

/// Marker for predicates that may end a program: they fail or suspend, and
/// never succeed. [`EngineBuilder::terminal`](super::EngineBuilder::terminal)
/// accepts only these.
pub trait TerminalPredicate: Predicate {}

/// A step of a search program.
///
/// Changes to the working graph go through [`SearchContext`], which records
/// them on the trail; the engine rewinds the trail before each `retry_pred`,
/// so a choice always starts from the state `try_pred` left behind.
///
/// `Send` lets a scheduler build an engine on one thread and run it on
/// another.
pub trait Predicate: Debug + Send {
    /// First call for `round`. Rounds count up from 0 while the predicate
    /// returns `SuccessSamePredicate`.
    fn try_pred(&mut self, ctx: &mut SearchContext, round: usize) -> PredicateResult;

    /// Explore one of the choices offered by `try_pred`. Returns `Success`,
    /// `SuccessSamePredicate` or `Failure`.
    #[allow(unused)]
    fn retry_pred(
        &mut self,
        ctx: &mut SearchContext,
        round: usize,
        choice: usize,
    ) -> PredicateResult {
        panic!("{}::retry_pred should never be called", self.name());
    }

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
