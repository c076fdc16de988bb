// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Reasons a branch of the search is dead.

use std::fmt;

/// Why propagation rejected a definition.
///
/// These never reach the caller; they are counted in
/// [`Statistics`](crate::state::Statistics) and logged at trace level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropagationFailure {
    /// Both sides of a rule were followed from `node` and reached different nodes.
    RelationConflict { rule: usize, node: usize },

    /// The two words of an included pair reached different nodes from the root.
    IncludedPairConflict { pair: usize },
}

impl PropagationFailure {
    /// Number of variants, for statistics tables.
    pub const COUNT: usize = 2;

    pub(crate) fn index(&self) -> usize {
        match self {
            PropagationFailure::RelationConflict { .. } => 0,
            PropagationFailure::IncludedPairConflict { .. } => 1,
        }
    }
}

impl fmt::Display for PropagationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropagationFailure::RelationConflict { rule, node } => {
                write!(f, "Rule {} does not hold at node {}", rule, node)
            }
            PropagationFailure::IncludedPairConflict { pair } => {
                write!(f, "Included pair {} is separated at the root", pair)
            }
        }
    }
}
