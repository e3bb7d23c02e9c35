//! Tabular reinforcement learning in discrete maze environments
//!
//! This crate provides:
//! - A tabular learning agent with interchangeable value-update algorithms
//!   (one-step TD, TD(λ) with eligibility traces, Monte Carlo return
//!   averaging) and exploration policies (random, ε-greedy, softmax)
//! - Optional Dyna-style planning over a learned transition model
//! - An optional per-pair novelty signal shaping initialization and reward
//! - A binary-tree maze environment and a trial runner with composable
//!   observers

pub mod agent;
pub mod env;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod types;

pub use agent::{
    Agent, AgentConfig, BonusConfig, ExplorationPolicy, PlanningConfig, StatePerception,
    ValueUpdate,
};
pub use env::BinaryMaze;
pub use error::{Error, Result};
pub use pipeline::{TrialConfig, TrialResult, TrialRunner};
pub use ports::{Environment, TrialObserver};
pub use types::{Action, Observation, State};
