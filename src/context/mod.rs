// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search context combining MEMO and DYNAMIC state.
//!
//! The SearchContext is the core data structure that combines:
//! - Tier 1 (MEMO): Immutable precomputed data, shared behind an `Arc`
//! - Tier 2 (DYNAMIC): The working graph, with trail-based backtracking
//!
//! Cloning a context is how the scheduler hands a subtree of the search to
//! another thread: the clone shares the MEMO data and owns a copy of the
//! working graph and trail.

mod dynamic;
mod memoized;

pub use dynamic::DynamicState;
pub use memoized::{MemoizedData, Occurrence, SearchSettings, Side};

use std::sync::Arc;

use log::trace;

use crate::graph::ActionGraph;
use crate::presentation::Letter;
use crate::state::{Counters, Statistics};
use crate::trail::{Trail, TrailEntry};

/// Search context combining MEMO and DYNAMIC state.
///
/// # Memory Model
///
/// ```text
/// SearchContext {
///     memo: Arc<MemoizedData>,   // Tier 1: immutable, shared
///     trail: Trail,              // Tier 2: mutable, owned
///     state: DynamicState,       // Tier 2: mutable, owned
///     statistics: Statistics,    // owned, merged by the scheduler
/// }
/// ```
///
/// All changes to `state` go through [`define`](Self::define) and
/// [`activate_node`](Self::activate_node), which record them on the trail,
/// so [`rewind_to`](Self::rewind_to) can undo them.
#[derive(Debug, Clone)]
pub struct SearchContext {
    /// Immutable precomputed data (Tier 1)
    pub memo: Arc<MemoizedData>,
    /// Trail for backtracking (Tier 2)
    pub trail: Trail,
    /// Mutable search state (Tier 2)
    pub state: DynamicState,
    pub statistics: Statistics,
    initialized: bool,
}

impl SearchContext {
    /// Create a context with no active nodes.
    pub fn new(memo: Arc<MemoizedData>) -> Self {
        let state = DynamicState::new(&memo);
        let capacity = memo.max_nodes * (memo.out_degree() + 1);
        Self {
            memo,
            trail: Trail::with_capacity(capacity),
            state,
            statistics: Statistics::new(),
            initialized: false,
        }
    }

    /// Whether the root has been activated and checked.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub(crate) fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    pub fn graph(&self) -> &ActionGraph {
        &self.state.graph
    }

    pub fn number_of_nodes(&self) -> usize {
        self.state.graph.number_of_nodes()
    }

    /// An owned copy of the working graph.
    pub fn snapshot(&self) -> ActionGraph {
        self.state.graph.clone()
    }

    /// Add one node with undefined edges, returning its index.
    pub fn activate_node(&mut self) -> usize {
        let previous = self.number_of_nodes();
        self.trail.push(TrailEntry::Nodes { previous });
        self.state.graph.add_nodes(1);
        previous
    }

    /// Define the edge `node --letter--> target`, recording it on the trail.
    ///
    /// The edge must be undefined and both nodes active.
    pub fn define(&mut self, node: usize, letter: Letter, target: usize) {
        debug_assert!(self.state.graph.target(node, letter).is_none());
        debug_assert!(target < self.number_of_nodes());
        self.trail.push(TrailEntry::Edge { node, letter });
        self.state.link(node, letter, target);
    }

    /// Undo every change recorded after `position`.
    ///
    /// Never rewinds past a frozen trail.
    pub fn rewind_to(&mut self, position: usize) {
        while let Some(entry) = self.trail.pop_above(position) {
            match entry {
                TrailEntry::Edge { node, letter } => self.state.unlink(node, letter),
                TrailEntry::Nodes { previous } => self.state.graph.truncate_nodes(previous),
            }
        }
    }

    /// Number of targets offered at the next branch point.
    ///
    /// Targets are the existing non-root nodes in increasing order, then a
    /// fresh node while the bound allows one.
    pub fn number_of_candidates(&self) -> usize {
        let nodes = self.number_of_nodes();
        let existing = nodes.saturating_sub(self.memo.min_target);
        if nodes < self.memo.max_nodes {
            existing + 1
        } else {
            existing
        }
    }

    /// The target offered by branch `choice`.
    pub fn candidate(&self, choice: usize) -> usize {
        self.memo.min_target + choice
    }

    /// Run every pruner, in registration order, on the working graph.
    pub fn pruners_accept(&mut self) -> bool {
        let memo = Arc::clone(&self.memo);
        for pruner in &memo.pruners {
            if !pruner.accept(&self.state.graph) {
                trace!("{} rejected {}", pruner.name(), self.state.graph);
                self.statistics.increment(Counters::Pruned);
                return false;
            }
        }
        true
    }

    /// Number of classes of the congruence described by the working graph.
    pub fn number_of_classes(&self) -> usize {
        self.memo.classes(self.number_of_nodes())
    }
}
