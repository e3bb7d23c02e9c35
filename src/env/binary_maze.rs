//! Binary-tree maze environment
//!
//! A maze shaped as a full binary tree: the agent starts at the root and
//! descends one level per action, with an optional third action reversing
//! to the parent. Rewards sit at configured (level, position) nodes and
//! end the episode when reached.

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    ports::Environment,
    types::{Action, Observation, State},
};

/// Left/right descent actions; reversal, when allowed, is action 2.
const ACTION_LEFT: Action = Action(0);
const ACTION_RIGHT: Action = Action(1);
const ACTION_BACK: Action = Action(2);

/// Full binary-tree maze with `2^levels - 1` states numbered level-order
/// (the root is state 0, state `s` has children `2s + 1` and `2s + 2`).
///
/// Actions 0 and 1 descend to the left and right child; leaves self-loop on
/// both. With `allow_reversals`, action 2 moves back to the parent (the
/// root reverses onto itself). Every state offers the same action set, so
/// the action space is uniform here; agents must not rely on that, other
/// environments may vary it per state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryMaze {
    levels: usize,
    allow_reversals: bool,
    rewards: Vec<f64>,
    terminal: Vec<bool>,
    current: State,
}

impl BinaryMaze {
    /// Build a maze with rewards placed at `(level, position) -> value`
    /// entries. Positions index left-to-right within a level, from zero.
    ///
    /// # Errors
    ///
    /// Fails when `levels < 2` or a reward coordinate falls outside the
    /// tree.
    pub fn new(
        levels: usize,
        reward_locations: &[((usize, usize), f64)],
        allow_reversals: bool,
    ) -> Result<Self> {
        if levels < 2 {
            return Err(Error::InvalidMazeLevels { levels });
        }
        let nb_states = (1 << levels) - 1;
        let mut rewards = vec![0.0; nb_states];
        let mut terminal = vec![false; nb_states];
        for &((level, position), value) in reward_locations {
            if level >= levels || position >= (1 << level) {
                return Err(Error::RewardLocationOutOfBounds {
                    level,
                    position,
                    levels,
                });
            }
            let state = (1 << level) - 1 + position;
            rewards[state] = value;
            terminal[state] = value != 0.0;
        }
        Ok(Self {
            levels,
            allow_reversals,
            rewards,
            terminal,
            current: State(0),
        })
    }

    /// Number of states in the maze.
    pub fn nb_states(&self) -> usize {
        (1 << self.levels) - 1
    }

    /// Legal actions, identical for every state in this maze.
    pub fn action_space(&self) -> Vec<Action> {
        if self.allow_reversals {
            vec![ACTION_LEFT, ACTION_RIGHT, ACTION_BACK]
        } else {
            vec![ACTION_LEFT, ACTION_RIGHT]
        }
    }

    /// Reward observed on entering a state.
    pub fn reward(&self, state: State) -> f64 {
        self.rewards[state.0 as usize]
    }

    /// Whether a state ends the episode.
    pub fn is_terminal(&self, state: State) -> bool {
        self.terminal[state.0 as usize]
    }

    /// Deterministic successor of a state under an action.
    pub fn transition(&self, state: State, action: Action) -> State {
        let s = state.0 as usize;
        let first_leaf = (1 << (self.levels - 1)) - 1;
        match action {
            ACTION_LEFT | ACTION_RIGHT => {
                if s >= first_leaf {
                    // Leaves self-loop on the descent actions.
                    state
                } else {
                    State((2 * s + 1 + action.0) as u32)
                }
            }
            ACTION_BACK if self.allow_reversals => {
                if s == 0 {
                    State(0)
                } else {
                    State(((s - 1) / 2) as u32)
                }
            }
            _ => state,
        }
    }

    fn observe(&self) -> Observation {
        Observation {
            action_space: self.action_space(),
            state: self.current,
            reward: self.reward(self.current),
            terminated: self.is_terminal(self.current),
        }
    }
}

impl Environment for BinaryMaze {
    fn begin_episode(&mut self) -> Observation {
        self.current = State(0);
        self.observe()
    }

    fn advance(&mut self, action: Action) -> Observation {
        self.current = self.transition(self.current, action);
        self.observe()
    }
}
