// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use sims_search::context::SearchContext;
use sims_search::{ActionGraph, Letter, Predicate, PredicateResult, Presentation};

/// `<a, b | a^3 = a, b^2 = b, abab = a>` as a monoid.
pub fn small_monoid() -> Presentation {
    Presentation::new(2)
        .contains_empty_word(true)
        .rule(&[0, 0, 0], &[0])
        .rule(&[1, 1], &[1])
        .rule(&[0, 1, 0, 1], &[0])
}

/// Make `e` a two-sided identity: `ee = e`, then `ae = a` and `ea = a`.
pub fn add_identity_rules(p: &mut Presentation, e: Letter) {
    p.add_rule(&[e, e], &[e]);
    for a in (0..p.alphabet_size()).filter(|&a| a != e) {
        p.add_rule(&[a, e], &[a]);
        p.add_rule(&[e, a], &[a]);
    }
}

/// `a · inverses[a] = e` for every letter other than `e`.
pub fn add_inverse_rules(p: &mut Presentation, inverses: &[Letter], e: Letter) {
    for (a, &b) in inverses.iter().enumerate().filter(|&(a, _)| a != e) {
        p.add_rule(&[a, b], &[e]);
    }
}

/// The partition monoid P₂ as a semigroup, letter 0 being its identity.
pub fn partition_monoid_p2() -> Presentation {
    let mut p = Presentation::new(4);
    add_identity_rules(&mut p, 0);
    p.rule(&[1, 1], &[0])
        .rule(&[1, 3], &[3])
        .rule(&[2, 2], &[2])
        .rule(&[3, 1], &[3])
        .rule(&[3, 3], &[3])
        .rule(&[2, 3, 2], &[2])
        .rule(&[3, 2, 3], &[3])
        .rule(&[1, 2, 1, 2], &[2, 1, 2])
        .rule(&[2, 1, 2, 1], &[2, 1, 2])
}

/// P₂ again, as a monoid on three letters.
pub fn partition_monoid_p2_as_monoid() -> Presentation {
    Presentation::new(3)
        .contains_empty_word(true)
        .rule(&[0, 0], &[])
        .rule(&[0, 2], &[2])
        .rule(&[1, 1], &[1])
        .rule(&[2, 0], &[2])
        .rule(&[2, 2], &[2])
        .rule(&[1, 2, 1], &[1])
        .rule(&[2, 1, 2], &[2])
        .rule(&[0, 1, 0, 1], &[1, 0, 1])
        .rule(&[1, 0, 1, 0], &[1, 0, 1])
}

/// A semigroup presentation with identity letter 6 and three inverse pairs,
/// plus three longer relations.
pub fn inverse_semigroup_presentation() -> Presentation {
    let mut p = Presentation::new(7);
    p.add_rule(&[6, 6], &[6]);
    for a in 0..6 {
        p.add_rule(&[a, 6], &[a]);
    }
    for a in 0..6 {
        p.add_rule(&[6, a], &[a]);
    }
    add_inverse_rules(&mut p, &[1, 0, 3, 2, 5, 4, 6], 6);
    p.rule(&[0, 0, 5, 0, 4], &[6])
        .rule(&[0, 4, 2, 2, 1, 5, 2], &[6])
        .rule(&[1, 3, 0, 2, 4, 4, 4], &[6])
}

pub fn rows(graph: &ActionGraph) -> Vec<Vec<usize>> {
    graph.rows().map(|row| row.to_vec()).collect()
}

/// A predicate that records the working graph and succeeds.
///
/// Placed before `FailPredicate` it collects every solution of a program.
#[derive(Debug, Clone, Default)]
pub struct CollectPredicate(pub Arc<Mutex<Vec<ActionGraph>>>);

impl Predicate for CollectPredicate {
    fn try_pred(&mut self, ctx: &mut SearchContext, _round: usize) -> PredicateResult {
        if let Ok(mut graphs) = self.0.lock() {
            graphs.push(ctx.snapshot());
        }
        PredicateResult::Success
    }

    fn name(&self) -> &str {
        "Collect"
    }
}
