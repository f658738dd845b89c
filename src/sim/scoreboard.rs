//! Score and lives sinks

use serde::{Deserialize, Serialize};

/// Running score for one game
///
/// Signed so a ball-loss penalty can take it below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    score: i64,
}

impl Scoreboard {
    pub fn increase(&mut self, points: u32) {
        self.score += i64::from(points);
    }

    pub fn decrease(&mut self, points: u32) {
        self.score -= i64::from(points);
    }

    #[inline]
    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn reset(&mut self) {
        self.score = 0;
    }
}

/// Remaining lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lives {
    count: u32,
    starting: u32,
}

impl Lives {
    pub fn new(starting: u32) -> Self {
        Self {
            count: starting,
            starting,
        }
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Take one life; returns what is left
    pub fn decrement(&mut self) -> u32 {
        self.count = self.count.saturating_sub(1);
        self.count
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.count == 0
    }

    pub fn reset(&mut self) {
        self.count = self.starting;
    }
}
