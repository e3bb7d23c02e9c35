//! Learned transition model for Dyna-style planning

use std::collections::HashMap;

use rand::{Rng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::types::{Action, State};

/// Sparse deterministic transition model.
///
/// Stores, per (state, action) pair, the single most recently observed
/// (reward, next state) sample. Samples are overwritten, not averaged; the
/// environment is assumed deterministic. Planning draws keys uniformly from
/// everything ever recorded, so keys are kept in first-insertion order next
/// to the map to make seeded runs reproducible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitionModel {
    transitions: HashMap<(State, Action), (f64, State)>,
    keys: Vec<(State, Action)>,
}

impl TransitionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a real transition, overwriting any prior sample for the pair.
    pub fn record(&mut self, state: State, action: Action, reward: f64, next_state: State) {
        if self
            .transitions
            .insert((state, action), (reward, next_state))
            .is_none()
        {
            self.keys.push((state, action));
        }
    }

    /// Stored sample for a pair, if one exists.
    pub fn get(&self, state: State, action: Action) -> Option<(f64, State)> {
        self.transitions.get(&(state, action)).copied()
    }

    /// Draw a recorded (state, action) pair uniformly at random.
    pub fn sample(&self, rng: &mut StdRng) -> Option<(State, Action)> {
        if self.keys.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..self.keys.len());
        Some(self.keys[idx])
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn size(&self) -> usize {
        self.keys.len()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_latest_sample_wins() {
        let mut model = TransitionModel::new();
        model.record(State(0), Action(1), 0.0, State(1));
        model.record(State(0), Action(1), 1.0, State(2));

        assert_eq!(model.get(State(0), Action(1)), Some((1.0, State(2))));
        assert_eq!(model.size(), 1);
    }

    #[test]
    fn test_sample_empty_model_is_none() {
        let model = TransitionModel::new();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(model.sample(&mut rng), None);
    }

    #[test]
    fn test_sample_only_returns_recorded_keys() {
        let mut model = TransitionModel::new();
        model.record(State(0), Action(0), 0.0, State(1));
        model.record(State(1), Action(1), 1.0, State(2));

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let key = model.sample(&mut rng).unwrap();
            assert!(model.get(key.0, key.1).is_some());
        }
    }
}
