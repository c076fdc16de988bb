// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Finite presentations consumed by the search.
//!
//! A presentation is an alphabet `0..alphabet_size`, an ordered list of rules
//! `u = v` over that alphabet, and a flag saying whether the empty word
//! denotes an element (monoid) or not (semigroup). The search treats it as an
//! immutable value; building and simplifying presentations happens elsewhere.

use crate::error::{Result, SimsError};

/// A generator index.
pub type Letter = usize;

/// A word over the alphabet.
pub type Word = Vec<Letter>;

/// A defining relation `u = v`.
pub type Rule = (Word, Word);

/// Alphabet, rules and empty-word flag of a semigroup or monoid presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    alphabet_size: usize,
    rules: Vec<Rule>,
    contains_empty_word: bool,
}

impl Presentation {
    /// Create a semigroup presentation over `alphabet_size` letters with no rules.
    pub fn new(alphabet_size: usize) -> Self {
        Self {
            alphabet_size,
            rules: Vec::new(),
            contains_empty_word: false,
        }
    }

    /// Set whether the empty word represents an element (monoid presentations).
    pub fn contains_empty_word(mut self, value: bool) -> Self {
        self.contains_empty_word = value;
        self
    }

    /// Append the rule `lhs = rhs`.
    pub fn rule(mut self, lhs: &[Letter], rhs: &[Letter]) -> Self {
        self.add_rule(lhs, rhs);
        self
    }

    /// Append the rule `lhs = rhs` in place.
    pub fn add_rule(&mut self, lhs: &[Letter], rhs: &[Letter]) {
        self.rules.push((lhs.to_vec(), rhs.to_vec()));
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn has_empty_word(&self) -> bool {
        self.contains_empty_word
    }

    /// The presentation with every rule reversed.
    ///
    /// Right congruences of the reversed presentation are the left
    /// congruences of this one.
    pub fn reversed(&self) -> Self {
        let rules = self
            .rules
            .iter()
            .map(|(u, v)| (u.iter().rev().copied().collect(), v.iter().rev().copied().collect()))
            .collect();
        Self {
            alphabet_size: self.alphabet_size,
            rules,
            contains_empty_word: self.contains_empty_word,
        }
    }

    /// Check that `word` only uses letters of the alphabet.
    pub fn validate_word(&self, word: &[Letter]) -> Result<()> {
        match word.iter().find(|&&a| a >= self.alphabet_size) {
            Some(a) => Err(SimsError::IncompatibleConfiguration(format!(
                "letter {} is not in the alphabet of size {}",
                a, self.alphabet_size
            ))),
            None => Ok(()),
        }
    }

    /// Check the invariants the search relies on.
    ///
    /// The alphabet must be non-empty and every letter in every rule must be
    /// in range. A rule with two empty sides is only meaningful for monoids.
    pub fn validate(&self) -> Result<()> {
        if self.alphabet_size == 0 {
            return Err(SimsError::IncompatibleConfiguration(
                "the alphabet must contain at least one letter".into(),
            ));
        }
        for (lhs, rhs) in &self.rules {
            self.validate_word(lhs)?;
            self.validate_word(rhs)?;
            if !self.contains_empty_word && (lhs.is_empty() || rhs.is_empty()) {
                return Err(SimsError::IncompatibleConfiguration(
                    "a semigroup presentation cannot contain the empty word in a rule".into(),
                ));
            }
        }
        Ok(())
    }
}
