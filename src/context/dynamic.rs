// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Mutable search state (Tier 2: DYNAMIC).

use crate::graph::ActionGraph;
use crate::presentation::Letter;

use super::MemoizedData;

/// Mutable search state (Tier 2: DYNAMIC).
///
/// This data changes during search and every change is recorded on the
/// [`Trail`](crate::trail::Trail) for backtracking. Each
/// [`SearchContext`](super::SearchContext) owns its own copy.
///
/// # Memory Allocation
///
/// The graph and the preimage lists are allocated for `max_nodes` nodes up
/// front; activating a node only extends the table inside that capacity.
#[derive(Debug, Clone)]
pub struct DynamicState {
    /// The working graph. Holds exactly the active nodes.
    pub graph: ActionGraph,

    /// Preimages: `sources[target * out_degree + letter]` lists every node
    /// `s` with `s --letter--> target`, in definition order.
    ///
    /// Kept for all `max_nodes` nodes so that undoing a definition never
    /// reallocates.
    sources: Vec<Vec<usize>>,

    /// Scratch buffers for the backward walk in propagation.
    pub(crate) frontier: Vec<usize>,
    pub(crate) next_frontier: Vec<usize>,
}

impl DynamicState {
    /// Create the initial state: no active nodes yet.
    pub fn new(memo: &MemoizedData) -> Self {
        let out_degree = memo.out_degree();
        Self {
            graph: ActionGraph::with_capacity(out_degree, memo.max_nodes),
            sources: vec![Vec::new(); out_degree * memo.max_nodes],
            frontier: Vec::new(),
            next_frontier: Vec::new(),
        }
    }

    /// Every node with an edge labelled `letter` into `target`.
    pub fn sources(&self, target: usize, letter: Letter) -> &[usize] {
        &self.sources[target * self.graph.out_degree() + letter]
    }

    /// Set the edge `node --letter--> target` and index its preimage.
    pub(crate) fn link(&mut self, node: usize, letter: Letter, target: usize) {
        self.graph.set_target(node, letter, target);
        let index = target * self.graph.out_degree() + letter;
        self.sources[index].push(node);
    }

    /// Undo the most recent [`link`](Self::link) of `node --letter-->`.
    pub(crate) fn unlink(&mut self, node: usize, letter: Letter) {
        let target = self.graph.raw_target(node, letter);
        let index = target * self.graph.out_degree() + letter;
        let popped = self.sources[index].pop();
        debug_assert_eq!(popped, Some(node));
        self.graph.set_target(node, letter, crate::graph::UNDEFINED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SearchSettings;
    use crate::presentation::Presentation;

    #[test]
    fn test_link_and_unlink_keep_preimages() {
        let memo = MemoizedData::new(
            Presentation::new(2).contains_empty_word(true),
            &SearchSettings::default(),
            3,
        );
        let mut state = DynamicState::new(&memo);
        state.graph.add_nodes(2);
        state.link(0, 1, 1);
        state.link(1, 1, 1);
        assert_eq!(state.sources(1, 1), &[0, 1]);
        assert_eq!(state.graph.target(0, 1), Some(1));

        state.unlink(1, 1);
        assert_eq!(state.sources(1, 1), &[0]);
        assert_eq!(state.graph.target(1, 1), None);
    }
}
