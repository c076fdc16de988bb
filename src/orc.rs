// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Smallest faithful right representations of a given size.
//!
//! [`MinimalRepOrc`] looks for the action graph with the fewest classes
//! whose letters generate a transformation semigroup of a given size. When
//! the size is that of the presented semigroup, the result is a faithful
//! representation on as few points as possible.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use log::debug;

use crate::error::{Result, SimsError};
use crate::graph::ActionGraph;
use crate::presentation::Presentation;
use crate::pruners::Pruner;
use crate::sims::Sims;

/// Size of the transformation semigroup generated by the letters of `graph`
/// acting on the nodes `first..n`, giving up once it exceeds `limit`.
///
/// The identity transformation is counted when `with_identity` is set.
/// Returns `None` if the size exceeds `limit` or an edge leaves the nodes.
pub fn transformation_semigroup_size(
    graph: &ActionGraph,
    first: usize,
    with_identity: bool,
    limit: usize,
) -> Option<usize> {
    let n = graph.number_of_nodes();
    let points = n.saturating_sub(first);
    let mut generators = Vec::with_capacity(graph.out_degree());
    for a in 0..graph.out_degree() {
        let mut image = Vec::with_capacity(points);
        for node in first..n {
            let t = graph.target(node, a)?;
            if t < first {
                return None;
            }
            image.push(t - first);
        }
        generators.push(image);
    }

    let mut elements: HashSet<Vec<usize>> = HashSet::new();
    let mut queue: VecDeque<Vec<usize>> = VecDeque::new();
    for g in &generators {
        if elements.insert(g.clone()) {
            queue.push_back(g.clone());
        }
    }
    while let Some(x) = queue.pop_front() {
        for g in &generators {
            let y: Vec<usize> = x.iter().map(|&i| g[i]).collect();
            if elements.insert(y.clone()) {
                if elements.len() > limit {
                    return None;
                }
                queue.push_back(y);
            }
        }
    }
    if with_identity {
        elements.insert((0..points).collect());
    }
    (elements.len() <= limit).then_some(elements.len())
}

/// Search for a minimum-degree representation of a given size.
///
/// ```
/// use sims_search::{MinimalRepOrc, Presentation};
///
/// // The cyclic group of order 3 acts faithfully on 3 points.
/// let p = Presentation::new(1).contains_empty_word(true).rule(&[0, 0, 0], &[]);
/// let graph = MinimalRepOrc::new()
///     .presentation(p)
///     .target_size(3)
///     .word_graph(5)
///     .unwrap()
///     .unwrap();
/// assert_eq!(graph.number_of_nodes(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MinimalRepOrc {
    presentation: Option<Presentation>,
    target_size: usize,
    threads: Option<usize>,
    pruners: Vec<Arc<dyn Pruner>>,
}

impl MinimalRepOrc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = Some(presentation);
        self
    }

    /// Required size of the generated transformation semigroup.
    pub fn target_size(mut self, size: usize) -> Self {
        self.target_size = size;
        self
    }

    pub fn number_of_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Restrict candidate graphs further; applied before the size check.
    pub fn add_pruner(mut self, pruner: Arc<dyn Pruner>) -> Self {
        self.pruners.push(pruner);
        self
    }

    /// The representation with the fewest classes, at most `max_nodes`.
    ///
    /// Class counts are tried in increasing order; `Ok(None)` when none
    /// qualifies. The graph has one node per class: for a semigroup
    /// presentation the auxiliary root is dropped and the classes are
    /// renumbered from 0.
    pub fn word_graph(&self, max_nodes: usize) -> Result<Option<ActionGraph>> {
        if self.target_size == 0 {
            return Err(SimsError::InvalidArgument(
                "the target size must be at least 1".into(),
            ));
        }
        if max_nodes == 0 {
            return Err(SimsError::InvalidArgument(
                "the number of classes must be at least 1".into(),
            ));
        }
        let presentation = self
            .presentation
            .clone()
            .ok_or_else(|| SimsError::NotConfigured("no presentation has been set".into()))?;
        let first = usize::from(!presentation.has_empty_word());
        let with_identity = presentation.has_empty_word();

        let mut sims = Sims::sims1()
            .presentation(presentation)
            .number_of_threads(self.threads.unwrap_or(1));
        for pruner in &self.pruners {
            sims = sims.add_pruner(Arc::clone(pruner));
        }

        for classes in 1..=max_nodes {
            let target = self.target_size;
            let found = sims.find_if(classes, |graph| {
                graph.number_of_nodes() == classes + first
                    && transformation_semigroup_size(graph, first, with_identity, target)
                        == Some(target)
            })?;
            if let Some(graph) = found {
                debug!("Minimal representation of size {} on {} points", target, classes);
                return Ok(Some(graph.induced_subgraph(first, graph.number_of_nodes())));
            }
        }
        Ok(None)
    }
}
