// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Relation checking and deduction for the congruence search.
//!
//! # Algorithm Overview
//!
//! After every edge definition:
//! 1. Find every node `r` and short rule `u = v` such that the new edge lies
//!    on the path of `u` or `v` from `r`. These are found by walking
//!    backwards from the new edge through the preimage lists.
//! 2. Follow `u` and `v` from `r` up to their last letter. If both paths end
//!    at defined nodes, those nodes must be equal; otherwise the branch dies.
//! 3. If exactly one path is missing only its last edge, that edge is forced:
//!    define it to point at the other endpoint (a *deduction*).
//! 4. Deductions are definitions too, so they are processed the same way
//!    (CASCADE) until nothing new is learnt.
//!
//! A freshly activated node has every short rule checked from it, and the
//! included pairs are re-checked from the root until they stop producing
//! deductions.
//!
//! Pending work is not kept in a separate queue: the trail already lists
//! every definition in order, so processing walks the trail forward from the
//! first new entry.
//!
//! Rules classified as *long* are not propagated; [`long_rules_hold`]
//! checks them on complete graphs only.
//!
//! [`long_rules_hold`]: SearchContext::long_rules_hold

mod complete;
mod errors;

pub use complete::is_two_sided;
pub use errors::PropagationFailure;

use std::sync::Arc;

use crate::context::{MemoizedData, SearchContext};
use crate::graph::ActionGraph;
use crate::presentation::Letter;
use crate::state::Counters;
use crate::trail::TrailEntry;

/// Where following all but the last letter of a word leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    /// The whole word can be followed.
    Reached(usize),
    /// Everything but the final edge `source --letter-->` is defined.
    Missing { source: usize, letter: Letter },
    /// An earlier edge is undefined; nothing can be learnt yet.
    Blocked,
}

fn endpoint(graph: &ActionGraph, node: usize, word: &[Letter]) -> Endpoint {
    let Some((&last, prefix)) = word.split_last() else {
        return Endpoint::Reached(node);
    };
    match graph.follow(node, prefix) {
        None => Endpoint::Blocked,
        Some(source) => match graph.target(source, last) {
            Some(target) => Endpoint::Reached(target),
            None => Endpoint::Missing {
                source,
                letter: last,
            },
        },
    }
}

impl SearchContext {
    /// Activate the root and check every rule and included pair from it.
    ///
    /// Does nothing on a context that is already initialized.
    pub fn initialize(&mut self) -> Result<(), PropagationFailure> {
        if self.is_initialized() {
            return Ok(());
        }
        let start = self.trail.len();
        self.activate_node();
        self.process(start)?;
        self.mark_initialized();
        Ok(())
    }

    /// Define `node --letter--> target` and propagate its consequences.
    ///
    /// `target` may be the next unused node index, which activates it. On
    /// failure the context holds a partial propagation; the caller rewinds.
    pub fn try_define(
        &mut self,
        node: usize,
        letter: Letter,
        target: usize,
    ) -> Result<(), PropagationFailure> {
        let start = self.trail.len();
        if target == self.number_of_nodes() {
            self.activate_node();
        }
        self.define(node, letter, target);
        self.process(start)
    }

    /// Process every trail entry from `start` until a fixpoint or a conflict.
    pub(crate) fn process(&mut self, start: usize) -> Result<(), PropagationFailure> {
        let memo = Arc::clone(&self.memo);
        let mut next = start;
        loop {
            while let Some(entry) = self.trail.get(next) {
                next += 1;
                match entry {
                    TrailEntry::Edge { node, letter } => {
                        self.check_through_edge(&memo, node, letter)?
                    }
                    TrailEntry::Nodes { previous } => {
                        for rule in 0..memo.short_rules.len() {
                            self.check_rule(&memo, rule, previous)?;
                        }
                    }
                }
            }
            for (pair, (lhs, rhs)) in memo.included.iter().enumerate() {
                if !self.unify(0, lhs, rhs) {
                    return Err(PropagationFailure::IncludedPairConflict { pair });
                }
            }
            if self.trail.len() == next {
                return Ok(());
            }
        }
    }

    /// Re-check every rule whose path passes through `node --letter-->`.
    fn check_through_edge(
        &mut self,
        memo: &MemoizedData,
        node: usize,
        letter: Letter,
    ) -> Result<(), PropagationFailure> {
        let mut frontier = std::mem::take(&mut self.state.frontier);
        let mut scratch = std::mem::take(&mut self.state.next_frontier);
        let mut result = Ok(());

        'occurrences: for occurrence in memo.occurrences(letter) {
            let prefix = &memo.side(occurrence.rule, occurrence.side)[..occurrence.position];
            frontier.clear();
            frontier.push(node);
            for &b in prefix.iter().rev() {
                scratch.clear();
                for &y in &frontier {
                    scratch.extend_from_slice(self.state.sources(y, b));
                }
                std::mem::swap(&mut frontier, &mut scratch);
                if frontier.is_empty() {
                    break;
                }
            }
            for &start in &frontier {
                if let Err(failure) = self.check_rule(memo, occurrence.rule, start) {
                    result = Err(failure);
                    break 'occurrences;
                }
            }
        }

        self.state.frontier = frontier;
        self.state.next_frontier = scratch;
        result
    }

    fn check_rule(
        &mut self,
        memo: &MemoizedData,
        rule: usize,
        node: usize,
    ) -> Result<(), PropagationFailure> {
        let (lhs, rhs) = &memo.short_rules[rule];
        if self.unify(node, lhs, rhs) {
            Ok(())
        } else {
            Err(PropagationFailure::RelationConflict { rule, node })
        }
    }

    /// Check `node·lhs == node·rhs` as far as the graph allows.
    ///
    /// Returns `false` on a conflict. Defines the missing last edge when the
    /// other side is fully defined.
    fn unify(&mut self, node: usize, lhs: &[Letter], rhs: &[Letter]) -> bool {
        let graph = &self.state.graph;
        match (endpoint(graph, node, lhs), endpoint(graph, node, rhs)) {
            (Endpoint::Reached(x), Endpoint::Reached(y)) => x == y,
            (Endpoint::Missing { source, letter }, Endpoint::Reached(target))
            | (Endpoint::Reached(target), Endpoint::Missing { source, letter }) => {
                self.define(source, letter, target);
                self.statistics.increment(Counters::Deductions);
                true
            }
            _ => true,
        }
    }
}
