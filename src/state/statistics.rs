// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Statistics
//!
//! Statistics are stored in the context, incremented by the predicates and by
//! propagation, and merged across worker threads when a search finishes.

use std::fmt;

use crate::propagation::PropagationFailure;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Counters {
    /// Edges chosen at a branch point.
    Choices,
    /// Edges forced by a relation or an included pair.
    Deductions,
    /// Branches rejected by a pruner.
    Pruned,
    /// Complete graphs rejected by the completion checks.
    Rejected,
    /// Complete graphs accepted.
    Solutions,
}

const NUMBER_OF_COUNTERS: usize = 5;
const COUNT: usize = NUMBER_OF_COUNTERS + PropagationFailure::COUNT;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Statistics {
    stats: [u64; COUNT],
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    /// Increment the specified counter by 1.
    pub fn increment(&mut self, counter: Counters) {
        self.stats[counter as usize] += 1;
    }

    /// Increment the specified counter by `by`.
    pub fn add(&mut self, counter: Counters, by: u64) {
        self.stats[counter as usize] += by;
    }

    /// Record a dead branch found by propagation.
    pub fn record_failure(&mut self, failure: &PropagationFailure) {
        self.stats[NUMBER_OF_COUNTERS + failure.index()] += 1;
    }

    /// Get the current value of the specified counter.
    pub fn get(&self, counter: Counters) -> u64 {
        self.stats[counter as usize]
    }

    /// Number of dead branches of the same kind as `failure`.
    pub fn failures(&self, failure: &PropagationFailure) -> u64 {
        self.stats[NUMBER_OF_COUNTERS + failure.index()]
    }

    /// Add every counter of `other` into `self`.
    pub fn absorb(&mut self, other: &Statistics) {
        for (mine, theirs) in self.stats.iter_mut().zip(other.stats.iter()) {
            *mine += theirs;
        }
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let conflicts: u64 = self.stats[NUMBER_OF_COUNTERS..].iter().sum();
        write!(
            f,
            "{} choices, {} deductions, {} conflicts, {} pruned, {} rejected, {} solutions",
            self.get(Counters::Choices),
            self.get(Counters::Deductions),
            conflicts,
            self.get(Counters::Pruned),
            self.get(Counters::Rejected),
            self.get(Counters::Solutions),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_absorb() {
        let mut a = Statistics::new();
        a.increment(Counters::Choices);
        a.add(Counters::Deductions, 3);
        let failure = PropagationFailure::RelationConflict { rule: 0, node: 1 };
        a.record_failure(&failure);

        let mut b = Statistics::new();
        b.increment(Counters::Choices);
        b.increment(Counters::Solutions);
        b.absorb(&a);

        assert_eq!(b.get(Counters::Choices), 2);
        assert_eq!(b.get(Counters::Deductions), 3);
        assert_eq!(b.get(Counters::Solutions), 1);
        assert_eq!(b.failures(&failure), 1);
        assert_eq!(
            b.to_string(),
            "2 choices, 3 deductions, 1 conflicts, 0 pruned, 0 rejected, 1 solutions"
        );
    }
}
