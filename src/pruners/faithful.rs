// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Keep forbidden pairs of words apart.

use crate::error::{Result, SimsError};
use crate::graph::ActionGraph;
use crate::presentation::{Presentation, Rule};

use super::Pruner;

/// Where a forbidden pair must be separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaithfulScope {
    /// In the congruence itself: the pair may not lie in one class.
    Root,
    /// In the action on the classes: some node must tell the two words apart.
    Action,
}

/// Reject graphs that identify a forbidden pair.
///
/// With [`FaithfulScope::Root`] a graph is rejected as soon as both words
/// reach the same node from the root, which is final for every completion.
/// With [`FaithfulScope::Action`] only complete graphs are judged: they are
/// rejected when every node maps both words of some pair to the same node.
#[derive(Debug, Clone)]
pub struct FaithfulPruner {
    scope: FaithfulScope,
    forbidden: Vec<Rule>,
}

impl FaithfulPruner {
    pub fn at_root(forbidden: Vec<Rule>) -> Self {
        Self {
            scope: FaithfulScope::Root,
            forbidden,
        }
    }

    pub fn of_action(forbidden: Vec<Rule>) -> Self {
        Self {
            scope: FaithfulScope::Action,
            forbidden,
        }
    }

    pub fn scope(&self) -> FaithfulScope {
        self.scope
    }

    pub fn forbidden(&self) -> &[Rule] {
        &self.forbidden
    }

    fn identifies_at(graph: &ActionGraph, node: usize, (lhs, rhs): &Rule) -> bool {
        match (graph.follow(node, lhs), graph.follow(node, rhs)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }
}

impl Pruner for FaithfulPruner {
    fn accept(&self, graph: &ActionGraph) -> bool {
        match self.scope {
            FaithfulScope::Root => {
                graph.number_of_nodes() == 0
                    || !self.forbidden.iter().any(|pair| Self::identifies_at(graph, 0, pair))
            }
            FaithfulScope::Action => {
                !graph.is_complete()
                    || !self.forbidden.iter().any(|pair| {
                        (0..graph.number_of_nodes()).all(|node| Self::identifies_at(graph, node, pair))
                    })
            }
        }
    }

    fn name(&self) -> &str {
        match self.scope {
            FaithfulScope::Root => "faithful at root",
            FaithfulScope::Action => "faithful action",
        }
    }

    fn check_compatible(&self, presentation: &Presentation) -> Result<()> {
        for (lhs, rhs) in &self.forbidden {
            presentation.validate_word(lhs)?;
            presentation.validate_word(rhs)?;
            if !presentation.has_empty_word() && (lhs.is_empty() || rhs.is_empty()) {
                return Err(SimsError::IncompatibleConfiguration(
                    "the empty word is not an element of a semigroup".into(),
                ));
            }
        }
        Ok(())
    }
}
