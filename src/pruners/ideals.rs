// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Restrict the search to Rees congruences.
//!
//! The Rees congruence of a non-empty right ideal `I` has `I` as one class
//! and every other element in a class of its own. Its action graph has
//! exactly one sink, the node of `I`, whose edges are all loops.
//!
//! A partial graph is checked through its generating pairs: each edge off
//! the spanning tree gives two words that every completion identifies. If
//! the words are different elements, their class is not a singleton and must
//! become the sink. Word equality is decided on the [`CayleyGraph`] of the
//! presentation, so the presented semigroup must be finite.

use std::fmt;

use crate::cayley::CayleyGraph;
use crate::error::{Result, SimsError};
use crate::graph::{ActionGraph, UNDEFINED};
use crate::presentation::Presentation;

use super::Pruner;

/// Accept only Rees congruences of non-empty (right) ideals.
///
/// With [`Sims::sims2`](crate::Sims::sims2) the survivors are the Rees
/// congruences of two-sided ideals.
#[derive(Clone)]
pub struct IdealPruner {
    cayley: CayleyGraph,
    alphabet_size: usize,
    /// First node standing for an element; node 0 of a semigroup search is
    /// the auxiliary root.
    first: usize,
}

impl IdealPruner {
    /// Enumerate the elements of `presentation`.
    ///
    /// Fails with [`SimsError::InvalidArgument`] if the presentation is not
    /// finite within [`cayley::DEFAULT_LIMIT`](crate::cayley::DEFAULT_LIMIT)
    /// nodes.
    pub fn new(presentation: &Presentation) -> Result<Self> {
        Ok(Self::from_cayley_graph(
            presentation,
            CayleyGraph::new(presentation)?,
        ))
    }

    /// Reuse an already enumerated Cayley graph of `presentation`.
    pub fn from_cayley_graph(presentation: &Presentation, cayley: CayleyGraph) -> Self {
        Self {
            cayley,
            alphabet_size: presentation.alphabet_size(),
            first: usize::from(!presentation.has_empty_word()),
        }
    }

    /// Number of elements of the presented semigroup.
    pub fn size(&self) -> usize {
        self.cayley.size()
    }

    fn is_loop_only(graph: &ActionGraph, node: usize) -> bool {
        graph.row(node).iter().all(|&t| t == UNDEFINED || t == node)
    }

    fn is_sink(graph: &ActionGraph, node: usize) -> bool {
        graph.row(node).iter().all(|&t| t == node)
    }
}

impl fmt::Debug for IdealPruner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdealPruner")
            .field("size", &self.size())
            .field("first", &self.first)
            .finish()
    }
}

impl Pruner for IdealPruner {
    fn accept(&self, graph: &ActionGraph) -> bool {
        let nodes = graph.number_of_nodes();
        let mut sinks = (self.first..nodes).filter(|&n| Self::is_sink(graph, n));
        let mut sink = sinks.next();
        if sinks.next().is_some() {
            return false;
        }

        let reps = graph.spanning_tree();
        for (source, rep) in reps.iter().enumerate() {
            let Some(rep) = rep else {
                continue;
            };
            for (letter, &target) in graph.row(source).iter().enumerate() {
                if target == UNDEFINED {
                    continue;
                }
                let Some(target_rep) = &reps[target] else {
                    continue;
                };
                let is_tree_edge = target_rep.len() == rep.len() + 1
                    && target_rep.starts_with(rep)
                    && target_rep.last() == Some(&letter);
                if is_tree_edge {
                    continue;
                }
                let mut word = rep.clone();
                word.push(letter);
                if self.cayley.equal(&word, target_rep) {
                    continue;
                }
                match sink {
                    Some(s) if s != target => return false,
                    Some(_) => {}
                    None if !Self::is_loop_only(graph, target) => return false,
                    None => sink = Some(target),
                }
            }
        }

        // A complete graph without a sink is a trivial congruence that is
        // not the Rees congruence of any ideal.
        !graph.is_complete() || sink.is_some_and(|s| Self::is_sink(graph, s))
    }

    fn name(&self) -> &str {
        "ideal"
    }

    fn check_compatible(&self, presentation: &Presentation) -> Result<()> {
        if presentation.alphabet_size() != self.alphabet_size
            || usize::from(!presentation.has_empty_word()) != self.first
        {
            return Err(SimsError::IncompatibleConfiguration(
                "the ideal pruner was built for a different presentation".into(),
            ));
        }
        match presentation
            .rules()
            .iter()
            .find(|(lhs, rhs)| !self.cayley.equal(lhs, rhs))
        {
            Some((lhs, rhs)) => Err(SimsError::IncompatibleConfiguration(format!(
                "rule {:?} = {:?} does not hold in the ideal pruner's semigroup",
                lhs, rhs
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `a^5 = a^3`: elements 1, a, a², a³, a⁴ with a group {a³, a⁴}.
    fn cyclic() -> Presentation {
        Presentation::new(1)
            .contains_empty_word(true)
            .rule(&[0, 0, 0, 0, 0], &[0, 0, 0])
    }

    #[test]
    fn test_accept_complete_graphs() {
        let pruner = IdealPruner::new(&cyclic()).unwrap();
        assert_eq!(pruner.size(), 5);
        // Ideals {a³, a⁴}, {a², ...}, {a, ...} and the whole monoid.
        assert!(pruner.accept(&ActionGraph::from_rows(1, &[[1], [2], [3], [3]])));
        assert!(pruner.accept(&ActionGraph::from_rows(1, &[[1], [2], [2]])));
        assert!(pruner.accept(&ActionGraph::from_rows(1, &[[1], [1]])));
        assert!(pruner.accept(&ActionGraph::from_rows(1, &[[0]])));
        // The trivial congruence has no sink.
        assert!(!pruner.accept(&ActionGraph::from_rows(1, &[[1], [2], [3], [4], [3]])));
        // a² = 1 merges two classes, neither a sink.
        assert!(!pruner.accept(&ActionGraph::from_rows(1, &[[1], [0]])));
        // a³ = a: the class of a is not a sink.
        assert!(!pruner.accept(&ActionGraph::from_rows(1, &[[1], [2], [1]])));
    }

    #[test]
    fn test_accept_partial_graphs() {
        let pruner = IdealPruner::new(&cyclic()).unwrap();
        assert!(pruner.accept(&ActionGraph::from_rows(1, &[[1], [UNDEFINED]])));
        assert!(pruner.accept(&ActionGraph::from_rows(1, &[[1], [2], [UNDEFINED]])));
        assert!(pruner.accept(&ActionGraph::from_rows(1, &[[1], [2], [3], [4], [UNDEFINED]])));
    }

    #[test]
    fn test_semigroup_root_is_never_the_sink() {
        // a³ = a²: elements a and a², node 0 is the auxiliary root.
        let p = Presentation::new(1).rule(&[0, 0, 0], &[0, 0]);
        let pruner = IdealPruner::new(&p).unwrap();
        assert_eq!(pruner.size(), 2);
        assert!(pruner.accept(&ActionGraph::from_rows(1, &[[1], [2], [2]])));
        assert!(pruner.accept(&ActionGraph::from_rows(1, &[[1], [1]])));
    }

    #[test]
    fn test_check_compatible() {
        let pruner = IdealPruner::new(&cyclic()).unwrap();
        assert!(pruner.check_compatible(&cyclic()).is_ok());
        assert!(pruner.check_compatible(&Presentation::new(2)).is_err());
        let semigroup = Presentation::new(1).rule(&[0, 0, 0, 0, 0], &[0, 0, 0]);
        assert!(pruner.check_compatible(&semigroup).is_err());
        let other = Presentation::new(1)
            .contains_empty_word(true)
            .rule(&[0, 0], &[0]);
        assert!(matches!(
            pruner.check_compatible(&other),
            Err(SimsError::IncompatibleConfiguration(_))
        ));
    }
}
