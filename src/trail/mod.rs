// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Trail-based backtracking for the congruence search.
//!
//! Every change the search makes to its working graph is recorded here, in
//! order: each edge definition (chosen or deduced) and each node activation.
//! Backtracking pops entries back to a checkpoint and undoes them, so the cost
//! of a backtrack is proportional to the work being undone.
//!
//! The edge entries double as the queue of definitions still to be checked by
//! [`propagation`](crate::propagation): processing walks the trail forward from
//! the first new entry.

/// A single change to the working graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailEntry {
    /// The edge `node --letter-->` was defined.
    Edge { node: usize, letter: usize },
    /// The number of active nodes grew; the old count is recorded.
    Nodes { previous: usize },
}

/// Ordered log of changes to one working graph.
///
/// Owned by a single [`SearchContext`](crate::context::SearchContext). Holds
/// at most one entry per edge plus one per node, so `max_nodes * (out_degree
/// + 1)` entries is always enough.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    entries: Vec<TrailEntry>,
    /// Entries below this index belong to the subtree root and are kept.
    frozen: Option<usize>,
}

impl Trail {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            frozen: None,
        }
    }

    pub fn new() -> Self {
        Self::default()
    }

    /// Make the current state permanent. Subtrees handed to worker threads
    /// are frozen at their root so workers never undo the shared prefix.
    pub fn freeze(&mut self) {
        self.frozen = Some(self.entries.len());
    }

    /// The lowest position the trail may be rewound to.
    pub fn floor(&self) -> usize {
        self.frozen.unwrap_or(0)
    }

    pub(crate) fn push(&mut self, entry: TrailEntry) {
        self.entries.push(entry);
    }

    /// Pop the newest entry while the trail is longer than `position`,
    /// stopping at the frozen floor.
    pub(crate) fn pop_above(&mut self, position: usize) -> Option<TrailEntry> {
        if self.entries.len() > position.max(self.floor()) {
            self.entries.pop()
        } else {
            None
        }
    }

    pub(crate) fn get(&self, index: usize) -> Option<TrailEntry> {
        self.entries.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(node: usize, letter: usize) -> TrailEntry {
        TrailEntry::Edge { node, letter }
    }

    #[test]
    fn test_new_trail_is_empty() {
        let trail = Trail::new();
        assert!(trail.is_empty());
        assert_eq!(trail.floor(), 0);
    }

    #[test]
    fn test_pop_above_position() {
        let mut trail = Trail::new();
        trail.push(edge(0, 0));
        trail.push(TrailEntry::Nodes { previous: 1 });
        let mark = trail.len();
        trail.push(edge(1, 0));
        trail.push(edge(1, 1));

        assert_eq!(trail.pop_above(mark), Some(edge(1, 1)));
        assert_eq!(trail.pop_above(mark), Some(edge(1, 0)));
        assert_eq!(trail.pop_above(mark), None);
        assert_eq!(trail.len(), 2);
    }

    #[test]
    fn test_freeze() {
        let mut trail = Trail::new();
        trail.push(edge(0, 0));
        trail.push(edge(0, 1));
        trail.freeze();
        trail.push(edge(1, 0));

        assert_eq!(trail.pop_above(0), Some(edge(1, 0)));
        assert_eq!(trail.pop_above(0), None);
        assert_eq!(trail.len(), 2);
        assert_eq!(trail.floor(), 2);
    }

    #[test]
    fn test_get() {
        let mut trail = Trail::new();
        trail.push(TrailEntry::Nodes { previous: 0 });
        trail.push(edge(0, 1));
        assert_eq!(trail.get(1), Some(edge(0, 1)));
        assert_eq!(trail.get(2), None);
    }
}
