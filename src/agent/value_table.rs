//! Sparse action-value table

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    types::{Action, State},
};

/// Sparse mapping from (state, action) pairs to Q-value estimates.
///
/// Entries are created lazily, the first time the environment offers an
/// action for a state. Every action ever offered for a state has an entry
/// before it is read for action selection; reads of never-initialized pairs
/// are programming-contract violations and surface as
/// [`Error::UninitializedValue`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValueTable {
    values: HashMap<(State, Action), f64>,
}

impl ValueTable {
    /// Create an empty value table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the Q-value for a state-action pair, if initialized.
    pub fn get(&self, state: State, action: Action) -> Option<f64> {
        self.values.get(&(state, action)).copied()
    }

    /// Get the Q-value for a pair that must already be initialized.
    pub fn try_get(&self, state: State, action: Action) -> Result<f64> {
        self.get(state, action)
            .ok_or(Error::UninitializedValue { state, action })
    }

    /// Set the Q-value for a state-action pair.
    pub fn set(&mut self, state: State, action: Action, value: f64) {
        self.values.insert((state, action), value);
    }

    /// Insert `seed` for the pair unless an entry already exists.
    ///
    /// Returns true when a new entry was created.
    pub fn ensure(&mut self, state: State, action: Action, seed: f64) -> bool {
        let mut created = false;
        self.values.entry((state, action)).or_insert_with(|| {
            created = true;
            seed
        });
        created
    }

    /// Whether the pair has been initialized.
    pub fn contains(&self, state: State, action: Action) -> bool {
        self.values.contains_key(&(state, action))
    }

    /// Maximum Q-value over the supplied legal actions, in their given order.
    ///
    /// Ties resolve to the first-seen action by strict comparison; callers
    /// that need the winning action use [`ValueTable::greedy_over`]. All
    /// supplied actions must be initialized.
    pub fn max_over(&self, state: State, actions: &[Action]) -> Result<f64> {
        let mut best: Option<f64> = None;
        for &action in actions {
            let value = self.try_get(state, action)?;
            if best.is_none_or(|b| value > b) {
                best = Some(value);
            }
        }
        best.ok_or(Error::EmptyActionSpace { state })
    }

    /// Greedy action over the supplied legal actions (first-seen tie-break).
    pub fn greedy_over(&self, state: State, actions: &[Action]) -> Result<Action> {
        let mut best: Option<(Action, f64)> = None;
        for &action in actions {
            let value = self.try_get(state, action)?;
            if best.is_none_or(|(_, b)| value > b) {
                best = Some((action, value));
            }
        }
        best.map(|(action, _)| action)
            .ok_or(Error::EmptyActionSpace { state })
    }

    /// Number of initialized state-action pairs.
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Iterate over all initialized pairs and their values.
    pub fn iter(&self) -> impl Iterator<Item = (State, Action, f64)> + '_ {
        self.values.iter().map(|(&(s, a), &v)| (s, a, v))
    }
}
