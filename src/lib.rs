// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Low-index congruence search for finitely presented semigroups and monoids.
//!
//! Given a presentation and a bound `n`, [`Sims`] enumerates every right
//! congruence (Sims1) or two-sided congruence (Sims2) with at most `n`
//! classes. Each congruence is returned as the [`ActionGraph`] of the right
//! action of the generators on its classes.
//!
//! # Architecture
//!
//! The implementation uses a two-tier memory model:
//!
//! ## Tier 1: MEMO Data (Immutable)
//!
//! Precomputed once per enumeration and shared by every worker:
//! - The presentation, split into short rules (propagated) and long rules
//!   (checked on complete graphs)
//! - For each letter, where it occurs in the short rules
//! - The pruners and the pairs that must be included
//!
//! ## Tier 2: DYNAMIC Data (Mutable)
//!
//! Search state that changes during search, tracked on the trail:
//! - The working action graph
//! - Preimage lists used to find the rules affected by a new edge
//!
//! # Search Algorithm
//!
//! The search is the predicate program
//!
//! 1. **InitializePredicate**: activate the root and propagate the rules from it
//! 2. **DefineEdgePredicate**: branch over the target of the first undefined
//!    edge, propagating the rules after each choice
//! 3. **AcceptPredicate**: check the long rules, two-sidedness and pruners on
//!    the complete graph
//!
//! run by a stack-based [engine](crate::engine) that suspends at every
//! solution. Backtracking rewinds the trail.
//!
//! # Parallelization
//!
//! The [`scheduler`] expands the first few levels of the search tree
//! breadth-first and hands the resulting subtrees to worker threads. Counts
//! do not depend on the number of threads; with one thread solutions come in
//! a fixed order.
//!
//! # Example
//!
//! ```
//! use sims_search::{Presentation, Sims};
//!
//! // <a, b | a^3 = a, b^2 = b, abab = a> as a monoid.
//! let p = Presentation::new(2)
//!     .contains_empty_word(true)
//!     .rule(&[0, 0, 0], &[0])
//!     .rule(&[1, 1], &[1])
//!     .rule(&[0, 1, 0, 1], &[0]);
//! let counts: Vec<u64> = (1..=5)
//!     .map(|n| Sims::sims1().presentation(p.clone()).number_of_congruences(n).unwrap())
//!     .collect();
//! assert_eq!(counts, vec![1, 3, 5, 6, 6]);
//! ```

pub mod cayley;
pub mod context;
pub mod engine;
pub mod error;
pub mod graph;
pub mod orc;
pub mod pairs;
pub mod poset;
pub mod predicates;
pub mod presentation;
pub mod propagation;
pub mod pruners;
pub mod scheduler;
pub mod sims;
pub mod state;
pub mod trail;

// Re-export commonly used types
pub use cayley::CayleyGraph;
pub use context::SearchContext;
pub use engine::{Predicate, PredicateResult, SearchEngine};
pub use error::{Result, SimsError};
pub use graph::{ActionGraph, UNDEFINED};
pub use orc::MinimalRepOrc;
pub use pairs::{right_generating_pairs, right_generating_pairs_with};
pub use poset::{is_contained, poset};
pub use presentation::{Letter, Presentation, Rule, Word};
pub use pruners::{FaithfulPruner, FnPruner, IdealPruner, Pruner};
pub use sims::{CongruenceKind, Congruences, Sims};
pub use trail::Trail;
