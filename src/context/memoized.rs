// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Immutable precomputed data (Tier 1: MEMO).

use std::sync::Arc;

use crate::presentation::{Letter, Presentation, Rule};
use crate::pruners::Pruner;
use crate::sims::CongruenceKind;

/// Which side of a rule a letter occurrence belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Lhs,
    Rhs,
}

/// Position of a letter inside one side of a short rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub rule: usize,
    pub side: Side,
    pub position: usize,
}

/// Search configuration chosen by the caller, before the node bound is known.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub kind: CongruenceKind,
    pub pruners: Vec<Arc<dyn Pruner>>,
    /// Pairs that must belong to the right congruence.
    pub included: Vec<Rule>,
    /// Rules with `|u| + |v|` at least this long are checked on complete graphs only.
    pub long_rule_length: Option<usize>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            kind: CongruenceKind::OneSided,
            pruners: Vec::new(),
            included: Vec::new(),
            long_rule_length: None,
        }
    }
}

/// Immutable precomputed data (Tier 1: MEMO).
///
/// Built once per enumeration call and shared, behind an `Arc`, by every
/// [`SearchContext`](super::SearchContext) of that call, including those on
/// worker threads.
///
/// # Contents
///
/// - the presentation and settings the enumeration was started with
/// - the rules split into *short* rules (propagated after every definition)
///   and *long* rules (checked once a graph is complete)
/// - for each letter, every position at which it occurs in a short rule;
///   propagation uses this to re-check only the rules that pass through a new
///   edge
#[derive(Debug)]
pub struct MemoizedData {
    pub presentation: Presentation,
    pub kind: CongruenceKind,
    /// Hard ceiling on the number of nodes, including the auxiliary root of
    /// semigroup searches.
    pub max_nodes: usize,
    /// Smallest node an edge may point at: 1 when node 0 is the auxiliary root.
    pub min_target: usize,
    pub short_rules: Vec<Rule>,
    pub long_rules: Vec<Rule>,
    pub included: Vec<Rule>,
    pub pruners: Vec<Arc<dyn Pruner>>,
    occurrences: Vec<Vec<Occurrence>>,
}

impl MemoizedData {
    /// Precompute the rule index for a search with at most `bound` classes.
    ///
    /// Closure rules contributed by pruners are appended to the short rules.
    pub fn new(presentation: Presentation, settings: &SearchSettings, bound: usize) -> Self {
        let (max_nodes, min_target) = if presentation.has_empty_word() {
            (bound, 0)
        } else {
            (bound + 1, 1)
        };

        let mut short_rules = Vec::new();
        let mut long_rules = Vec::new();
        for rule in presentation.rules() {
            let length = rule.0.len() + rule.1.len();
            match settings.long_rule_length {
                Some(threshold) if length >= threshold => long_rules.push(rule.clone()),
                _ => short_rules.push(rule.clone()),
            }
        }

        let mut occurrences = vec![Vec::new(); presentation.alphabet_size()];
        for (index, (lhs, rhs)) in short_rules.iter().enumerate() {
            for (side, word) in [(Side::Lhs, lhs), (Side::Rhs, rhs)] {
                for (position, &letter) in word.iter().enumerate() {
                    occurrences[letter].push(Occurrence {
                        rule: index,
                        side,
                        position,
                    });
                }
            }
        }

        Self {
            presentation,
            kind: settings.kind,
            max_nodes,
            min_target,
            short_rules,
            long_rules,
            included: settings.included.clone(),
            pruners: settings.pruners.clone(),
            occurrences,
        }
    }

    pub fn out_degree(&self) -> usize {
        self.presentation.alphabet_size()
    }

    /// Every position at which `letter` occurs in a short rule.
    pub fn occurrences(&self, letter: Letter) -> &[Occurrence] {
        &self.occurrences[letter]
    }

    /// The word on `side` of short rule `rule`.
    pub fn side(&self, rule: usize, side: Side) -> &[Letter] {
        match side {
            Side::Lhs => &self.short_rules[rule].0,
            Side::Rhs => &self.short_rules[rule].1,
        }
    }

    /// Number of classes represented by a graph with `nodes` nodes.
    pub fn classes(&self, nodes: usize) -> usize {
        nodes.saturating_sub(self.min_target)
    }
}
