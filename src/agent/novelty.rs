//! Per-pair novelty tracking for the exploration bonus

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Action, State};

/// Configuration for the exploration bonus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusConfig {
    /// Amount subtracted from a pair's novelty each time it is acted on
    pub reduction: f64,
    /// Blend rate for seeding initial Q-values from novelty
    pub init_rate: f64,
    /// Upper bound on novelty (fully novel)
    pub max: f64,
}

impl BonusConfig {
    /// Bonus with the given per-visit reduction and default seeding.
    pub fn new(reduction: f64) -> Self {
        Self {
            reduction,
            init_rate: 0.2,
            max: 1.0,
        }
    }

    /// Override the Q-initialization blend rate.
    pub fn with_init_rate(mut self, init_rate: f64) -> Self {
        self.init_rate = init_rate;
        self
    }
}

/// Bounded novelty scalar per (state, action) pair.
///
/// A pair starts fully novel (at the configured maximum) and decays by a
/// fixed reduction every time the action is taken, floored at zero. Novelty
/// never re-grows. It shapes behavior twice: unseen pairs get their initial
/// Q-value seeded to `novelty * init_rate`, and temporal-difference updates
/// add the previous pair's residual novelty to the observed reward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoveltyTracker {
    novelty: HashMap<(State, Action), f64>,
    reduction: f64,
    init_rate: f64,
    max: f64,
}

impl NoveltyTracker {
    pub fn new(config: &BonusConfig) -> Self {
        Self {
            novelty: HashMap::new(),
            reduction: config.reduction,
            init_rate: config.init_rate,
            max: config.max,
        }
    }

    /// Current novelty of a pair; unvisited pairs are fully novel.
    pub fn value(&mut self, state: State, action: Action) -> f64 {
        let max = self.max;
        *self.novelty.entry((state, action)).or_insert(max)
    }

    /// Q-value seed for a freshly referenced pair.
    pub fn initial_q(&mut self, state: State, action: Action) -> f64 {
        self.value(state, action) * self.init_rate
    }

    /// Decay a pair's novelty after its action was taken.
    pub fn reduce(&mut self, state: State, action: Action) {
        let max = self.max;
        let entry = self.novelty.entry((state, action)).or_insert(max);
        *entry = (*entry - self.reduction).max(0.0);
    }

    /// Residual novelty of a pair without creating an entry.
    pub fn peek(&self, state: State, action: Action) -> Option<f64> {
        self.novelty.get(&(state, action)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unvisited_pair_is_fully_novel() {
        let mut tracker = NoveltyTracker::new(&BonusConfig::new(0.3));
        assert_eq!(tracker.value(State(0), Action(0)), 1.0);
        assert!((tracker.initial_q(State(0), Action(0)) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_reduction_floors_at_zero() {
        let mut tracker = NoveltyTracker::new(&BonusConfig::new(0.4));
        for _ in 0..10 {
            tracker.reduce(State(1), Action(0));
            let n = tracker.value(State(1), Action(0));
            assert!(n >= 0.0);
            assert!(n <= 1.0);
        }
        assert_eq!(tracker.value(State(1), Action(0)), 0.0);
    }

    #[test]
    fn test_monotonic_decay() {
        let mut tracker = NoveltyTracker::new(&BonusConfig::new(0.25));
        let mut prev = tracker.value(State(2), Action(1));
        for _ in 0..6 {
            tracker.reduce(State(2), Action(1));
            let curr = tracker.value(State(2), Action(1));
            assert!(curr <= prev);
            prev = curr;
        }
    }
}
