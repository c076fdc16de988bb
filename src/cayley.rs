// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Right Cayley graphs of finite presentations.
//!
//! Coset enumeration (HLT order) over the adjoined identity: node 0 is the
//! empty word, every rule is applied at every node, and nodes found equal are
//! merged through a union-find forest. The finished table is the right
//! regular action of the monoid, so two words are equal exactly when they
//! lead from node 0 to the same node.
//!
//! Enumeration only terminates for finite semigroups, so it stops with an
//! error once more than `limit` nodes have been defined.

use log::debug;

use crate::error::{Result, SimsError};
use crate::graph::{ActionGraph, UNDEFINED};
use crate::presentation::{Letter, Presentation};

/// Default bound on the nodes defined while enumerating.
pub const DEFAULT_LIMIT: usize = 1 << 20;

/// The right regular action of a finite monoid, or of a finite semigroup with
/// an identity adjoined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CayleyGraph {
    graph: ActionGraph,
    contains_empty_word: bool,
}

impl CayleyGraph {
    pub fn new(presentation: &Presentation) -> Result<Self> {
        Self::with_limit(presentation, DEFAULT_LIMIT)
    }

    /// Enumerate, giving up after `limit` node definitions.
    pub fn with_limit(presentation: &Presentation, limit: usize) -> Result<Self> {
        presentation.validate()?;
        let mut table = CosetTable::new(presentation.alphabet_size(), limit);
        let mut current = 0;
        while current < table.len() {
            for (lhs, rhs) in presentation.rules() {
                if !table.is_live(current) {
                    break;
                }
                let x = table.trace(current, lhs)?;
                let y = table.trace(current, rhs)?;
                table.coincide(x, y);
            }
            if table.is_live(current) {
                table.fill(current)?;
            }
            current += 1;
        }
        let graph = table.compact();
        debug!(
            "Enumerated {} elements from {} definitions",
            graph.number_of_nodes(),
            table.len()
        );
        Ok(Self {
            graph,
            contains_empty_word: presentation.has_empty_word(),
        })
    }

    /// Number of elements of the presented semigroup or monoid.
    pub fn size(&self) -> usize {
        let nodes = self.graph.number_of_nodes();
        if self.contains_empty_word {
            nodes
        } else {
            nodes - 1
        }
    }

    /// Whether `u` and `v` represent the same element.
    pub fn equal(&self, u: &[Letter], v: &[Letter]) -> bool {
        self.graph.follow(0, u) == self.graph.follow(0, v)
    }

    /// The action itself, node 0 being the identity.
    pub fn graph(&self) -> &ActionGraph {
        &self.graph
    }
}

/// Partial table with lazy coincidences: stale targets are resolved with
/// [`find`](CosetTable::find) on every read.
struct CosetTable {
    degree: usize,
    rows: Vec<Vec<usize>>,
    parent: Vec<usize>,
    limit: usize,
}

impl CosetTable {
    fn new(degree: usize, limit: usize) -> Self {
        Self {
            degree,
            rows: vec![vec![UNDEFINED; degree]],
            parent: vec![0],
            limit,
        }
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            let grandparent = self.parent[self.parent[node]];
            self.parent[node] = grandparent;
            node = grandparent;
        }
        node
    }

    fn is_live(&self, node: usize) -> bool {
        self.parent[node] == node
    }

    fn define(&mut self, node: usize, letter: Letter) -> Result<usize> {
        if self.rows.len() >= self.limit {
            return Err(SimsError::InvalidArgument(format!(
                "presentation is not finite within {} nodes",
                self.limit
            )));
        }
        let fresh = self.rows.len();
        self.rows.push(vec![UNDEFINED; self.degree]);
        self.parent.push(fresh);
        self.rows[node][letter] = fresh;
        Ok(fresh)
    }

    /// Follow `word` from `node`, defining missing edges on the way.
    fn trace(&mut self, node: usize, word: &[Letter]) -> Result<usize> {
        let mut current = self.find(node);
        for &a in word {
            current = match self.rows[current][a] {
                UNDEFINED => self.define(current, a)?,
                t => self.find(t),
            };
        }
        Ok(current)
    }

    fn fill(&mut self, node: usize) -> Result<()> {
        for a in 0..self.degree {
            if self.rows[node][a] == UNDEFINED {
                self.define(node, a)?;
            }
        }
        Ok(())
    }

    /// Merge `x` and `y` and everything their equality forces.
    fn coincide(&mut self, x: usize, y: usize) {
        let mut pending = vec![(x, y)];
        while let Some((x, y)) = pending.pop() {
            let (x, y) = (self.find(x), self.find(y));
            if x == y {
                continue;
            }
            let (keep, lose) = if x < y { (x, y) } else { (y, x) };
            self.parent[lose] = keep;
            for a in 0..self.degree {
                let moved = self.rows[lose][a];
                if moved == UNDEFINED {
                    continue;
                }
                match self.rows[keep][a] {
                    UNDEFINED => self.rows[keep][a] = moved,
                    existing => pending.push((existing, moved)),
                }
            }
        }
    }

    /// Live nodes, renumbered in order of definition.
    fn compact(&mut self) -> ActionGraph {
        let live: Vec<usize> = (0..self.rows.len()).filter(|&n| self.is_live(n)).collect();
        let mut index = vec![UNDEFINED; self.rows.len()];
        for (i, &node) in live.iter().enumerate() {
            index[node] = i;
        }
        let mut graph = ActionGraph::new(self.degree, live.len());
        for (i, &node) in live.iter().enumerate() {
            for a in 0..self.degree {
                let target = self.rows[node][a];
                let target = self.find(target);
                graph.set_target(i, a, index[target]);
            }
        }
        graph
    }
}
