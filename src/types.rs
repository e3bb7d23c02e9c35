//! Domain identifier and observation types.
//!
//! States and actions are opaque identifiers assigned by the environment;
//! the agent attaches no structure to them beyond equality and hashing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for an environment state.
///
/// The environment owns state identity; the agent only ever compares and
/// hashes these values.
///
/// # Examples
///
/// ```
/// use mazelearn::types::State;
///
/// let state = State(3);
/// assert_eq!(state.to_string(), "3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct State(pub u32);

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for State {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Identifier for an action within a state's legal action set.
///
/// The legal action set is supplied fresh by the environment on every
/// observation and may differ in content and cardinality between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Action(pub usize);

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for Action {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// One observation delivered by the environment, once per step and once at
/// episode start.
///
/// `action_space` is ordered and non-empty unless `terminated` is true.
/// `reward` is the reward received upon arriving in `state`. `terminated`
/// may be true on the very first observation of an episode if the start
/// state is itself terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Legal actions in `state`, in the environment's iteration order
    pub action_space: Vec<Action>,
    /// Current environment state
    pub state: State,
    /// Reward observed on entering `state`
    pub reward: f64,
    /// Whether `state` ends the episode
    pub terminated: bool,
}

impl Observation {
    /// Create a non-terminal observation.
    pub fn new(action_space: Vec<Action>, state: State, reward: f64) -> Self {
        Self {
            action_space,
            state,
            reward,
            terminated: false,
        }
    }

    /// Create a terminal observation. The action space may be empty.
    pub fn terminal(action_space: Vec<Action>, state: State, reward: f64) -> Self {
        Self {
            action_space,
            state,
            reward,
            terminated: true,
        }
    }
}
