// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Pluggable pruners.
//!
//! A pruner is an extra, sound rejection test applied to the partial graph
//! after every successful definition, in registration order, stopping at the
//! first rejection. Soundness means: if a pruner rejects a partial graph, it
//! would also reject every completion of it. The search relies on this to cut
//! whole subtrees.
//!
//! Pruners are shared read-only between worker threads, hence `Send + Sync`.
//!
//! # Provided pruners
//!
//! - [`IdealPruner`]: Rees congruences only.
//! - [`FaithfulPruner`]: forbidden pairs stay separated.
//! - [`FnPruner`]: wraps a closure.

pub mod faithful;
pub mod ideals;

pub use faithful::{FaithfulPruner, FaithfulScope};
pub use ideals::IdealPruner;

use std::fmt;

use crate::error::Result;
use crate::graph::ActionGraph;
use crate::presentation::Presentation;
use crate::sims::CongruenceKind;

/// A sound rejection test over partial action graphs.
pub trait Pruner: fmt::Debug + Send + Sync {
    /// Return `false` to cut the branch rooted at `graph`.
    ///
    /// `graph` holds exactly the active nodes; some edges may be undefined.
    fn accept(&self, graph: &ActionGraph) -> bool;

    /// Name used in log messages.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Reject presentations this pruner cannot be used with.
    #[allow(unused)]
    fn check_compatible(&self, presentation: &Presentation) -> Result<()> {
        Ok(())
    }

    /// The only congruence kind this pruner is meaningful for, if any.
    fn required_kind(&self) -> Option<CongruenceKind> {
        None
    }
}

/// A pruner built from a closure.
pub struct FnPruner<F> {
    name: String,
    kind: Option<CongruenceKind>,
    test: F,
}

impl<F> FnPruner<F>
where
    F: Fn(&ActionGraph) -> bool + Send + Sync,
{
    pub fn new(name: &str, test: F) -> Self {
        Self {
            name: String::from(name),
            kind: None,
            test,
        }
    }

    /// Restrict this pruner to searches of the given kind.
    pub fn only_for(mut self, kind: CongruenceKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

impl<F> fmt::Debug for FnPruner<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPruner")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl<F> Pruner for FnPruner<F>
where
    F: Fn(&ActionGraph) -> bool + Send + Sync,
{
    fn accept(&self, graph: &ActionGraph) -> bool {
        (self.test)(graph)
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn required_kind(&self) -> Option<CongruenceKind> {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_pruner() {
        let pruner = FnPruner::new("small", |g: &ActionGraph| g.number_of_nodes() <= 2);
        assert_eq!(pruner.name(), "small");
        assert_eq!(pruner.required_kind(), None);
        assert!(pruner.accept(&ActionGraph::new(1, 2)));
        assert!(!pruner.accept(&ActionGraph::new(1, 3)));

        let pruner = pruner.only_for(CongruenceKind::TwoSided);
        assert_eq!(pruner.required_kind(), Some(CongruenceKind::TwoSided));
        assert!(pruner.check_compatible(&Presentation::new(1)).is_ok());
    }
}
