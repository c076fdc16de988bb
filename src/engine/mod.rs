// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Backtracking engine for predicate programs.
//!
//! A program is a list of [`Predicate`]s ending in a [`TerminalPredicate`].
//! The engine keeps an explicit goal stack instead of recursing, so the depth
//! of the search is only bounded by memory.
//!
//! # Execution model
//!
//! Each stack entry is one call of a predicate in a given round, together
//! with the trail length at which it started. The top entry is executed:
//!
//! - a fresh entry calls `try_pred(round)`:
//!   - `Success` pushes the next predicate, round 0
//!   - `SuccessSamePredicate` pushes the same predicate, next round
//!   - `Choices(n)` turns the entry into a choice point over `0..n`
//!   - `Failure` pops the entry
//!   - `Suspend` returns control to the caller
//! - a choice point calls `retry_pred(round, choice)` for its next choice,
//!   and is popped once every choice has been tried.
//!
//! Before executing the top entry the trail is rewound to the entry's
//! checkpoint, which undoes whatever the abandoned branch did.
//!
//! Deterministic successes are never re-tried: backtracking into them pops
//! them. Resuming a suspended engine pops the suspending entry, so the next
//! call to [`SearchEngine::search`] continues with the next alternative.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use sims_search::context::{MemoizedData, SearchContext, SearchSettings};
//! use sims_search::engine::EngineBuilder;
//! use sims_search::predicates::{InitializePredicate, SuspendPredicate};
//! use sims_search::Presentation;
//!
//! let memo = MemoizedData::new(Presentation::new(1), &SearchSettings::default(), 1);
//! let mut ctx = SearchContext::new(Arc::new(memo));
//! let engine = EngineBuilder::new()
//!     .add(Box::new(InitializePredicate))
//!     .terminal(Box::new(SuspendPredicate))
//!     .build();
//!
//! // Engine is consumed, returns Some(engine) if suspended
//! let engine = engine.search(&mut ctx).expect("suspended once");
//! assert!(engine.search(&mut ctx).is_none());
//! ```

pub mod predicate;

pub use predicate::{Predicate, PredicateResult, TerminalPredicate};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::context::SearchContext;

/// Initial capacity of the goal stack.
const INITIAL_STACK_CAPACITY: usize = 256;

/// What the top of the stack does next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// `try_pred` has not been called yet.
    Fresh,
    /// A choice point; `next` is the next choice to retry.
    Choosing { next: usize, count: usize },
}

/// One call of a predicate.
#[derive(Debug)]
struct Goal {
    predicate: usize,
    round: usize,
    mode: Mode,
    /// Trail length to rewind to before running this goal.
    checkpoint: usize,
}

impl Goal {
    fn new(predicate: usize, round: usize, checkpoint: usize) -> Self {
        Self {
            predicate,
            round,
            mode: Mode::Fresh,
            checkpoint,
        }
    }

    /// A goal with nothing left to try.
    fn exhaust(&mut self) {
        self.mode = Mode::Choosing { next: 0, count: 0 };
    }
}

/// Runs a predicate program over a [`SearchContext`].
pub struct SearchEngine {
    predicates: Vec<Box<dyn Predicate>>,
    stack: Vec<Goal>,
    started: bool,
    /// Checked before every step; once set the search reports exhaustion.
    halt: Option<Arc<AtomicBool>>,
    tries: u64,
    retries: u64,
}

impl SearchEngine {
    /// Create a new search engine with the given predicates.
    ///
    /// Prefer [`EngineBuilder`], which guarantees a terminal predicate.
    pub fn new(predicates: Vec<Box<dyn Predicate>>) -> Self {
        Self {
            predicates,
            stack: Vec::with_capacity(INITIAL_STACK_CAPACITY),
            started: false,
            halt: None,
            tries: 0,
            retries: 0,
        }
    }

    /// Stop at the next step once `flag` is set.
    pub fn with_halt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.halt = Some(flag);
        self
    }

    fn halted(&self) -> bool {
        self.halt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Run the program until it suspends or runs out of alternatives.
    ///
    /// Returns the engine if it suspended, with `ctx` holding the state the
    /// suspending predicate saw. Returns `None` once the search is exhausted
    /// or halted.
    ///
    /// # Panics
    ///
    /// Panics if the program runs past its last predicate, or if
    /// `retry_pred` returns `Choices` or `Suspend`.
    pub fn search(mut self, ctx: &mut SearchContext) -> Option<Self> {
        if self.started {
            self.stack.pop();
        } else {
            self.started = true;
            if self.predicates.is_empty() {
                return None;
            }
            self.stack.push(Goal::new(0, 0, ctx.trail.len()));
        }

        while !self.halted() {
            let goal = self.stack.last_mut()?;
            ctx.rewind_to(goal.checkpoint);
            let (predicate, round) = (goal.predicate, goal.round);

            match goal.mode {
                Mode::Fresh => {
                    self.tries += 1;
                    match self.predicates[predicate].try_pred(ctx, round) {
                        PredicateResult::Success => {
                            goal.exhaust();
                            self.push(predicate + 1, 0, ctx);
                        }
                        PredicateResult::SuccessSamePredicate => {
                            goal.exhaust();
                            self.push(predicate, round + 1, ctx);
                        }
                        PredicateResult::Choices(count) => {
                            goal.mode = Mode::Choosing { next: 0, count };
                            goal.checkpoint = ctx.trail.len();
                        }
                        PredicateResult::Failure => {
                            self.stack.pop();
                        }
                        PredicateResult::Suspend => return Some(self),
                    }
                }
                Mode::Choosing { next, count } if next < count => {
                    goal.mode = Mode::Choosing {
                        next: next + 1,
                        count,
                    };
                    self.retries += 1;
                    match self.predicates[predicate].retry_pred(ctx, round, next) {
                        PredicateResult::Success => self.push(predicate + 1, 0, ctx),
                        PredicateResult::SuccessSamePredicate => {
                            self.push(predicate, round + 1, ctx)
                        }
                        PredicateResult::Failure => {}
                        result @ (PredicateResult::Choices(_) | PredicateResult::Suspend) => {
                            panic!("retry_pred returned invalid result: {:?}", result);
                        }
                    }
                }
                Mode::Choosing { .. } => {
                    self.stack.pop();
                }
            }
        }
        None
    }

    fn push(&mut self, predicate: usize, round: usize, ctx: &SearchContext) {
        assert!(
            predicate < self.predicates.len(),
            "Invalid predicate sequence: reached end without FAIL or SUSPEND"
        );
        self.stack.push(Goal::new(predicate, round, ctx.trail.len()));
    }

    /// Number of `try_pred` and `retry_pred` calls so far.
    pub fn statistics(&self) -> (u64, u64) {
        (self.tries, self.retries)
    }
}

/// Builds a [`SearchEngine`] whose program ends with a terminal predicate.
#[derive(Default)]
pub struct EngineBuilder {
    predicates: Vec<Box<dyn Predicate>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a predicate to the program.
    pub fn add(mut self, predicate: Box<dyn Predicate>) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Close the program with a FAIL or SUSPEND predicate.
    pub fn terminal<T: TerminalPredicate + 'static>(mut self, predicate: Box<T>) -> TerminatedProgram {
        self.predicates.push(predicate);
        TerminatedProgram {
            predicates: self.predicates,
        }
    }
}

/// A program ending with a terminal predicate, ready to build.
pub struct TerminatedProgram {
    predicates: Vec<Box<dyn Predicate>>,
}

impl TerminatedProgram {
    pub fn build(self) -> SearchEngine {
        SearchEngine::new(self.predicates)
    }
}
