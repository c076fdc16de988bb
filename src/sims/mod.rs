// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The low-index congruence search.
//!
//! [`Sims`] enumerates the right congruences (Sims1) or two-sided
//! congruences (Sims2) of a finitely presented semigroup or monoid that have
//! at most `n` classes. Each congruence is delivered as the [`ActionGraph`]
//! of the right action on its classes, in a canonical labelling, so every
//! congruence appears exactly once.
//!
//! # Example
//!
//! ```
//! use sims_search::{Presentation, Sims};
//!
//! let p = Presentation::new(2)
//!     .contains_empty_word(true)
//!     .rule(&[0, 0, 0], &[0])
//!     .rule(&[1, 1], &[1])
//!     .rule(&[0, 1, 0, 1], &[0]);
//! let sims = Sims::sims1().presentation(p);
//! assert_eq!(sims.number_of_congruences(5), Ok(6));
//! ```
//!
//! Configuration is copied into each enumeration when it starts, so changing
//! a `Sims` afterwards never affects an iterator already handed out.

use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

use log::debug;

use crate::context::{MemoizedData, SearchContext, SearchSettings};
use crate::engine::SearchEngine;
use crate::error::{Result, SimsError};
use crate::graph::ActionGraph;
use crate::presentation::{Letter, Presentation};
use crate::pruners::Pruner;
use crate::scheduler::{self, Stream, WorkScheduler};

/// Which congruences to enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CongruenceKind {
    /// Right congruences (Sims1).
    OneSided,
    /// Two-sided congruences (Sims2).
    TwoSided,
}

impl fmt::Display for CongruenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CongruenceKind::OneSided => write!(f, "one-sided"),
            CongruenceKind::TwoSided => write!(f, "two-sided"),
        }
    }
}

/// Configuration of a congruence enumeration.
///
/// Built with consuming setters; checked when an enumeration starts.
#[derive(Debug, Clone)]
pub struct Sims {
    presentation: Option<Presentation>,
    settings: SearchSettings,
    threads: usize,
}

impl Sims {
    pub fn new(kind: CongruenceKind) -> Self {
        Self {
            presentation: None,
            settings: SearchSettings {
                kind,
                ..SearchSettings::default()
            },
            threads: 1,
        }
    }

    /// Enumerate right congruences.
    pub fn sims1() -> Self {
        Self::new(CongruenceKind::OneSided)
    }

    /// Enumerate two-sided congruences.
    pub fn sims2() -> Self {
        Self::new(CongruenceKind::TwoSided)
    }

    pub fn presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = Some(presentation);
        self
    }

    /// Number of worker threads; 0 is rejected when an enumeration starts.
    pub fn number_of_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Append a pruner; pruners run in the order they were added.
    pub fn add_pruner(mut self, pruner: Arc<dyn Pruner>) -> Self {
        self.settings.pruners.push(pruner);
        self
    }

    /// Only enumerate congruences containing the pair `(u, v)`.
    pub fn include(mut self, u: &[Letter], v: &[Letter]) -> Self {
        self.settings.included.push((u.to_vec(), v.to_vec()));
        self
    }

    /// Check rules with `|u| + |v| >= length` on complete graphs only.
    pub fn long_rule_length(mut self, length: usize) -> Self {
        self.settings.long_rule_length = Some(length);
        self
    }

    pub fn kind(&self) -> CongruenceKind {
        self.settings.kind
    }

    pub fn get_presentation(&self) -> Option<&Presentation> {
        self.presentation.as_ref()
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn pruners(&self) -> &[Arc<dyn Pruner>] {
        &self.settings.pruners
    }

    /// Number of classes of the congruence represented by `graph`.
    ///
    /// Discounts the auxiliary root of semigroup presentations.
    pub fn number_of_classes(&self, graph: &ActionGraph) -> usize {
        match &self.presentation {
            Some(p) if !p.has_empty_word() => graph.number_of_nodes().saturating_sub(1),
            _ => graph.number_of_nodes(),
        }
    }

    /// Validate the configuration and precompute the rule index for `bound`.
    fn prepare(&self, bound: usize) -> Result<WorkScheduler> {
        if bound == 0 {
            return Err(SimsError::InvalidArgument(
                "the number of classes must be at least 1".into(),
            ));
        }
        if self.threads == 0 {
            return Err(SimsError::InvalidArgument(
                "the number of threads must be at least 1".into(),
            ));
        }
        let presentation = self
            .presentation
            .as_ref()
            .ok_or_else(|| SimsError::NotConfigured("no presentation has been set".into()))?;
        presentation.validate()?;

        for pruner in &self.settings.pruners {
            pruner.check_compatible(presentation)?;
            if let Some(kind) = pruner.required_kind() {
                if kind != self.settings.kind {
                    return Err(SimsError::IncompatibleConfiguration(format!(
                        "pruner {} only applies to {} congruences",
                        pruner.name(),
                        kind
                    )));
                }
            }
        }
        for (u, v) in &self.settings.included {
            presentation.validate_word(u)?;
            presentation.validate_word(v)?;
            if !presentation.has_empty_word() && (u.is_empty() || v.is_empty()) {
                return Err(SimsError::IncompatibleConfiguration(
                    "an included pair uses the empty word of a semigroup".into(),
                ));
            }
        }

        debug!(
            "Sims ({}) over {} letters with {} rules, at most {} classes, {} threads",
            self.settings.kind,
            presentation.alphabet_size(),
            presentation.rules().len(),
            bound,
            self.threads
        );
        let memo = MemoizedData::new(presentation.clone(), &self.settings, bound);
        Ok(WorkScheduler::new(Arc::new(memo), self.threads))
    }

    /// Number of congruences with at most `n` classes.
    pub fn number_of_congruences(&self, n: usize) -> Result<u64> {
        self.prepare(n)?.count()
    }

    /// Lazily enumerate the congruences with at most `n` classes.
    ///
    /// With one thread the search runs on the calling thread, one solution
    /// per call to `next`, in a deterministic order.
    pub fn iter(&self, n: usize) -> Result<Congruences> {
        let scheduler = self.prepare(n)?;
        let inner = if scheduler.threads() == 1 {
            Inner::Sequential {
                ctx: Box::new(scheduler.root()),
                engine: Some(scheduler::suspending_program()),
            }
        } else {
            Inner::Parallel(scheduler.stream())
        };
        Ok(Congruences { inner })
    }

    /// Call `visitor` on every congruence with at most `n` classes.
    ///
    /// The visitor always runs on the calling thread.
    pub fn for_each<F>(&self, n: usize, visitor: F) -> Result<()>
    where
        F: FnMut(&ActionGraph),
    {
        self.prepare(n)?.for_each(visitor)
    }

    /// Some congruence with at most `n` classes satisfying `predicate`.
    ///
    /// With one thread it is the first in enumeration order.
    pub fn find_if<F>(&self, n: usize, predicate: F) -> Result<Option<ActionGraph>>
    where
        F: Fn(&ActionGraph) -> bool + Sync,
    {
        self.prepare(n)?.find_first(predicate)
    }
}

enum Inner {
    Sequential {
        ctx: Box<SearchContext>,
        engine: Option<SearchEngine>,
    },
    Parallel(Stream),
}

/// Iterator returned by [`Sims::iter`].
pub struct Congruences {
    inner: Inner,
}

impl Iterator for Congruences {
    type Item = ActionGraph;

    fn next(&mut self) -> Option<ActionGraph> {
        match &mut self.inner {
            Inner::Sequential { ctx, engine } => {
                let current = engine.take()?;
                match current.search(ctx) {
                    Some(suspended) => {
                        *engine = Some(suspended);
                        Some(ctx.snapshot())
                    }
                    None => {
                        debug!("Search finished: {}", ctx.statistics);
                        None
                    }
                }
            }
            Inner::Parallel(stream) => stream.next(),
        }
    }
}

impl FusedIterator for Congruences {}
