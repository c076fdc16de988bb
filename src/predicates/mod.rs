// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search predicates.
//!
//! The congruence search is the program
//!
//! ```text
//! Initialize, DefineEdge*, Accept, Suspend
//! ```
//!
//! run by the [engine](crate::engine). Each suspension is one accepted
//! graph; resuming backtracks into the most recent edge choice.
//!
//! # Organization
//!
//! - `initialize`: activate and check the root
//! - `define`: branch over the target of the first undefined edge
//! - `accept`: checks reserved for complete graphs
//! - Built-in predicates: `FailPredicate`, `SuspendPredicate`

pub mod accept;
pub mod define;
pub mod initialize;

pub use accept::AcceptPredicate;
pub use define::DefineEdgePredicate;
pub use initialize::InitializePredicate;

use crate::context::SearchContext;
use crate::engine::{Predicate, PredicateResult, TerminalPredicate};

/// Built-in fail predicate (Prolog's `fail.`).
///
/// This predicate always fails, forcing backtracking. Ending a program with
/// it explores every branch; counting happens in the predicates before it.
#[derive(Debug)]
pub struct FailPredicate;

impl Predicate for FailPredicate {
    fn try_pred(&mut self, _ctx: &mut SearchContext, _round: usize) -> PredicateResult {
        PredicateResult::Failure
    }

    fn name(&self) -> &str {
        "Fail"
    }
}

impl TerminalPredicate for FailPredicate {}

/// Built-in suspend predicate: hand the current state to the caller.
#[derive(Debug)]
pub struct SuspendPredicate;

impl Predicate for SuspendPredicate {
    fn try_pred(&mut self, _ctx: &mut SearchContext, _round: usize) -> PredicateResult {
        PredicateResult::Suspend
    }

    fn name(&self) -> &str {
        "Suspend"
    }
}

impl TerminalPredicate for SuspendPredicate {}
