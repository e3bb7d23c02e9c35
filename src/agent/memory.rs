//! Episode memory and return averaging
//!
//! TD(λ) walks the current episode's trace on every step; Monte Carlo
//! consumes the full trace at termination. Both read from the same memory
//! structure.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Action, State};

/// One step of an episode: the state entered, the reward observed on entry,
/// and the action taken from it. The terminal record has no action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub state: State,
    pub reward: f64,
    pub action: Option<Action>,
}

/// Ordered per-episode sequence of step records.
///
/// Cleared at episode start, appended to every step. The record for the
/// current step is pushed action-less before the value update runs and
/// patched once the step's action is chosen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpisodeMemory {
    records: Vec<StepRecord>,
}

impl EpisodeMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record for the state just entered.
    pub fn push(&mut self, state: State, reward: f64) {
        self.records.push(StepRecord {
            state,
            reward,
            action: None,
        });
    }

    /// Attach the chosen action to the most recent record.
    pub fn set_last_action(&mut self, action: Action) {
        if let Some(last) = self.records.last_mut() {
            last.action = Some(action);
        }
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drain the episode trace, leaving the memory empty for the next episode.
    pub fn take(&mut self) -> Vec<StepRecord> {
        std::mem::take(&mut self.records)
    }
}

/// Incremental every-visit return averages for Monte Carlo control.
///
/// Each (state, action) pair keeps a running mean over every discounted
/// return ever observed for it, across episodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReturnAverages {
    stats: HashMap<(State, Action), ReturnStats>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ReturnStats {
    count: u64,
    mean: f64,
}

impl ReturnAverages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observed return into the pair's mean; returns the new mean.
    pub fn record(&mut self, state: State, action: Action, observed_return: f64) -> f64 {
        let stats = self
            .stats
            .entry((state, action))
            .or_insert(ReturnStats { count: 0, mean: 0.0 });
        stats.count += 1;
        stats.mean += (observed_return - stats.mean) / stats.count as f64;
        stats.mean
    }

    /// Mean of all returns observed for the pair, if any.
    pub fn mean(&self, state: State, action: Action) -> Option<f64> {
        self.stats.get(&(state, action)).map(|s| s.mean)
    }

    /// Number of returns observed for the pair.
    pub fn count(&self, state: State, action: Action) -> u64 {
        self.stats.get(&(state, action)).map_or(0, |s| s.count)
    }
}
