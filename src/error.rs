// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Errors surfaced to callers of the congruence search.
//!
//! Configuration problems are detected when an enumeration starts, before any
//! search work is done. Dead branches inside the search are not errors; they
//! are [`PropagationFailure`](crate::propagation::PropagationFailure) values
//! that never leave the engine.

use thiserror::Error;

/// Errors reported by [`Sims`](crate::Sims) and friends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimsError {
    /// A numeric argument is out of range (node bound 0, thread count 0, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An enumeration was requested before a presentation was attached.
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// The presentation, pruners, included pairs and congruence kind do not fit together.
    #[error("incompatible configuration: {0}")]
    IncompatibleConfiguration(String),

    /// An invariant of the search was violated. Always a bug.
    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_kind() {
        let err = SimsError::InvalidArgument("node bound must be at least 1".into());
        assert_eq!(err.to_string(), "invalid argument: node bound must be at least 1");

        let err = SimsError::NotConfigured("no presentation".into());
        assert!(err.to_string().starts_with("not configured"));
    }
}
