//! Order-stable vote counting.
//!
//! Candidates are remembered in the order they were first cited. The winner
//! is the candidate with the highest count; among equal counts, the one
//! cited first. No map iteration order ever leaks into the result.

use std::collections::HashMap;

/// Running count of votes per candidate.
#[derive(Debug, Clone, Default)]
pub struct Tally<'a> {
    /// (candidate, votes) in first-cited order
    counts: Vec<(&'a str, usize)>,
    /// candidate -> position in `counts`
    slots: HashMap<&'a str, usize>,
    total: usize,
}

impl<'a> Tally<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one vote for `candidate`.
    pub fn cast(&mut self, candidate: &'a str) {
        self.total += 1;
        match self.slots.get(candidate) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.slots.insert(candidate, self.counts.len());
                self.counts.push((candidate, 1));
            }
        }
    }

    /// Votes recorded for `candidate`.
    pub fn votes_for(&self, candidate: &str) -> usize {
        self.slots
            .get(candidate)
            .map(|&slot| self.counts[slot].1)
            .unwrap_or(0)
    }

    /// Total votes cast.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct candidates.
    pub fn candidates(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Highest-count candidate, earliest-cited on ties.
    pub fn winner(&self) -> Option<Winner<'a>> {
        let mut best: Option<Winner<'a>> = None;
        for &(candidate, votes) in &self.counts {
            // Strict comparison keeps the earlier candidate on a tie.
            if best.map_or(true, |b| votes > b.votes) {
                best = Some(Winner { candidate, votes });
            }
        }
        best
    }
}

impl<'a> FromIterator<&'a str> for Tally<'a> {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for candidate in iter {
            tally.cast(candidate);
        }
        tally
    }
}

/// The outcome of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Winner<'a> {
    pub candidate: &'a str,
    pub votes: usize,
}
