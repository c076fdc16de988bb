// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Action graphs (coset tables).
//!
//! An [`ActionGraph`] is a deterministic transition table: nodes `0..n`, one
//! outgoing edge per letter, each edge either undefined or pointing at a node.
//! The search mutates one of these in place; callers receive snapshots.
//!
//! Equality is structural. Two isomorphic graphs with different node labels
//! are different graphs.

use std::fmt;

use crate::presentation::{Letter, Word};

/// Marker stored in the table for an edge that has not been defined.
pub const UNDEFINED: usize = usize::MAX;

/// Deterministic action of an alphabet on a finite set of nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionGraph {
    out_degree: usize,
    /// Row-major table: `targets[node * out_degree + letter]`.
    targets: Vec<usize>,
}

impl ActionGraph {
    /// A graph with `nodes` nodes and every edge undefined.
    pub fn new(out_degree: usize, nodes: usize) -> Self {
        Self {
            out_degree,
            targets: vec![UNDEFINED; out_degree * nodes],
        }
    }

    /// Build a graph from explicit rows, one row of targets per node.
    ///
    /// # Panics
    ///
    /// Panics if a row does not have exactly `out_degree` entries, or if a
    /// target is neither [`UNDEFINED`] nor a node of the graph.
    pub fn from_rows<R: AsRef<[usize]>>(out_degree: usize, rows: &[R]) -> Self {
        let nodes = rows.len();
        let mut targets = Vec::with_capacity(out_degree * nodes);
        for row in rows {
            let row = row.as_ref();
            assert_eq!(row.len(), out_degree, "row has the wrong number of targets");
            for &t in row {
                assert!(t == UNDEFINED || t < nodes, "target {} out of range", t);
                targets.push(t);
            }
        }
        Self { out_degree, targets }
    }

    /// Pre-allocate room for `nodes` nodes without activating them.
    pub(crate) fn with_capacity(out_degree: usize, nodes: usize) -> Self {
        Self {
            out_degree,
            targets: Vec::with_capacity(out_degree * nodes),
        }
    }

    pub fn out_degree(&self) -> usize {
        self.out_degree
    }

    pub fn number_of_nodes(&self) -> usize {
        if self.out_degree == 0 {
            0
        } else {
            self.targets.len() / self.out_degree
        }
    }

    /// Target of the edge `node --letter-->`, or `None` if undefined.
    pub fn target(&self, node: usize, letter: Letter) -> Option<usize> {
        match self.raw_target(node, letter) {
            UNDEFINED => None,
            t => Some(t),
        }
    }

    #[inline]
    pub(crate) fn raw_target(&self, node: usize, letter: Letter) -> usize {
        self.targets[node * self.out_degree + letter]
    }

    #[inline]
    pub(crate) fn set_target(&mut self, node: usize, letter: Letter, target: usize) {
        self.targets[node * self.out_degree + letter] = target;
    }

    /// Append `count` nodes with undefined edges.
    pub(crate) fn add_nodes(&mut self, count: usize) {
        let len = self.targets.len() + count * self.out_degree;
        self.targets.resize(len, UNDEFINED);
    }

    /// Drop every node from `nodes` onwards.
    pub(crate) fn truncate_nodes(&mut self, nodes: usize) {
        self.targets.truncate(nodes * self.out_degree);
    }

    /// Follow `word` from `node`; `None` as soon as an edge is undefined.
    pub fn follow(&self, node: usize, word: &[Letter]) -> Option<usize> {
        let mut current = node;
        for &a in word {
            current = self.target(current, a)?;
        }
        Some(current)
    }

    /// The targets of `node`, in letter order.
    pub fn row(&self, node: usize) -> &[usize] {
        let start = node * self.out_degree;
        &self.targets[start..start + self.out_degree]
    }

    /// Iterate over the rows of the table.
    pub fn rows(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.targets.chunks(self.out_degree.max(1))
    }

    /// Whether every edge of every node is defined.
    pub fn is_complete(&self) -> bool {
        self.targets.iter().all(|&t| t != UNDEFINED)
    }

    /// The first undefined edge at or after `(node, letter)` in node-then-letter order.
    pub(crate) fn next_undefined_from(&self, node: usize, letter: Letter) -> Option<(usize, Letter)> {
        let start = node * self.out_degree + letter;
        self.targets[start.min(self.targets.len())..]
            .iter()
            .position(|&t| t == UNDEFINED)
            .map(|offset| {
                let index = start + offset;
                (index / self.out_degree, index % self.out_degree)
            })
    }

    /// Representative words for the nodes reachable from node 0.
    ///
    /// The tree edge into a node is the first `(node, letter)` pair, in
    /// node-then-letter order, whose target is that node. For graphs produced
    /// by the search this is the order in which nodes were created, so every
    /// node's parent has a smaller index. Unreachable nodes get `None`.
    pub fn spanning_tree(&self) -> Vec<Option<Word>> {
        let n = self.number_of_nodes();
        let mut reps: Vec<Option<Word>> = vec![None; n];
        if n == 0 {
            return reps;
        }
        reps[0] = Some(Vec::new());
        // Breadth-first in node order; loops until no new node is reached so
        // that graphs whose nodes are not in creation order are also covered.
        let mut changed = true;
        while changed {
            changed = false;
            for s in 0..n {
                let Some(prefix) = reps[s].clone() else {
                    continue;
                };
                for a in 0..self.out_degree {
                    if let Some(t) = self.target(s, a) {
                        if reps[t].is_none() {
                            let mut w = prefix.clone();
                            w.push(a);
                            reps[t] = Some(w);
                            changed = true;
                        }
                    }
                }
            }
        }
        reps
    }

    /// The nodes `first..last`, relabelled `0..last - first`. Edges leaving
    /// the range become undefined.
    pub fn induced_subgraph(&self, first: usize, last: usize) -> ActionGraph {
        let last = last.min(self.number_of_nodes());
        let first = first.min(last);
        let mut sub = ActionGraph::new(self.out_degree, last - first);
        for node in first..last {
            for a in 0..self.out_degree {
                if let Some(t) = self.target(node, a).filter(|t| (first..last).contains(t)) {
                    sub.set_target(node - first, a, t - first);
                }
            }
        }
        sub
    }
}

impl fmt::Display for ActionGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for (j, &t) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                if t == UNDEFINED {
                    write!(f, "-")?;
                } else {
                    write!(f, "{}", t)?;
                }
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_graph_is_undefined() {
        let g = ActionGraph::new(2, 3);
        assert_eq!(g.number_of_nodes(), 3);
        assert_eq!(g.out_degree(), 2);
        assert_eq!(g.target(2, 1), None);
        assert!(!g.is_complete());
    }

    #[test]
    fn test_from_rows_and_follow() {
        let g = ActionGraph::from_rows(2, &[[1, 2], [1, 1], [3, 2], [3, 3]]);
        assert_eq!(g.number_of_nodes(), 4);
        assert!(g.is_complete());
        assert_eq!(g.follow(0, &[0, 1]), Some(1));
        assert_eq!(g.follow(0, &[1, 0]), Some(3));
        assert_eq!(g.follow(2, &[]), Some(2));
    }

    #[test]
    fn test_follow_stops_at_undefined() {
        let g = ActionGraph::from_rows(2, &[[1, UNDEFINED], [0, 0]]);
        assert_eq!(g.follow(0, &[0, 0]), Some(0));
        assert_eq!(g.follow(0, &[1, 0]), None);
    }

    #[test]
    fn test_induced_subgraph() {
        let g = ActionGraph::from_rows(2, &[[1, 2], [1, 0], [2, 1]]);
        assert_eq!(
            g.induced_subgraph(1, 3),
            ActionGraph::from_rows(2, &[[0, UNDEFINED], [1, 0]])
        );
        assert_eq!(g.induced_subgraph(0, 9), g);
        assert_eq!(g.induced_subgraph(3, 3).number_of_nodes(), 0);
    }

    #[test]
    fn test_structural_equality() {
        let a = ActionGraph::from_rows(1, &[[1], [0]]);
        let b = ActionGraph::from_rows(1, &[[1], [0]]);
        let c = ActionGraph::from_rows(1, &[[0], [1]]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_add_and_truncate_nodes() {
        let mut g = ActionGraph::with_capacity(2, 4);
        g.add_nodes(1);
        g.set_target(0, 0, 0);
        g.add_nodes(2);
        assert_eq!(g.number_of_nodes(), 3);
        assert_eq!(g.target(2, 0), None);
        g.truncate_nodes(1);
        assert_eq!(g.number_of_nodes(), 1);
        assert_eq!(g.target(0, 0), Some(0));
    }

    #[test]
    fn test_next_undefined_from() {
        let g = ActionGraph::from_rows(2, &[[1, 0], [UNDEFINED, 1], [0, UNDEFINED]]);
        assert_eq!(g.next_undefined_from(0, 0), Some((1, 0)));
        assert_eq!(g.next_undefined_from(1, 1), Some((2, 1)));
        let complete = ActionGraph::from_rows(1, &[[0]]);
        assert_eq!(complete.next_undefined_from(0, 0), None);
    }

    #[test]
    fn test_spanning_tree_words() {
        let g = ActionGraph::from_rows(2, &[[1, 2], [1, 1], [3, 2], [3, 3]]);
        let reps = g.spanning_tree();
        assert_eq!(reps[0], Some(vec![]));
        assert_eq!(reps[1], Some(vec![0]));
        assert_eq!(reps[2], Some(vec![1]));
        assert_eq!(reps[3], Some(vec![1, 0]));
    }

    #[test]
    fn test_display() {
        let g = ActionGraph::from_rows(2, &[[1, UNDEFINED], [1, 0]]);
        assert_eq!(g.to_string(), "[[1, -], [1, 0]]");
    }
}
