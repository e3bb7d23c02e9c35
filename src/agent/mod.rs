//! Tabular learning agents for discrete maze environments
//!
//! This module implements the decision/learning engine: a sparse
//! action-value table updated under interchangeable value-update algorithms,
//! action selection under interchangeable exploration policies, and the
//! optional planning and novelty machinery layered on top.
//!
//! ## Value-update algorithms
//!
//! | Algorithm | Update timing | Memory |
//! |-----------|---------------|--------|
//! | TD(0) | Every step | None |
//! | TD(λ), λ > 0 | Every step, backward over the trace | Episode trace |
//! | Monte Carlo | Episode end | Episode trace + return averages |
//!
//! Dyna-style planning adds simulated backups after each real update when a
//! transition model is enabled.
//!
//! ## Usage Example
//!
//! ```no_run
//! use mazelearn::agent::{Agent, AgentConfig, ExplorationPolicy, ValueUpdate};
//! use mazelearn::types::{Action, Observation, State};
//!
//! let config = AgentConfig::new(
//!     ValueUpdate::Td { lambda: 0.0 },
//!     ExplorationPolicy::EpsilonGreedy { epsilon: 0.1 },
//! )
//! .with_discount_rate(0.9)
//! .with_seed(42);
//!
//! let mut agent = Agent::new(config).unwrap();
//! let obs = Observation::new(vec![Action(0), Action(1)], State(0), 0.0);
//! let action = agent.step(&obs).unwrap();
//! ```

pub mod config;
pub mod core;
pub mod memory;
pub mod model;
pub mod novelty;
pub mod policy;
pub mod value_table;

// Public re-exports
pub use config::{AgentConfig, PlanningConfig, StatePerception, ValueUpdate};
pub use core::Agent;
pub use memory::{EpisodeMemory, ReturnAverages, StepRecord};
pub use model::TransitionModel;
pub use novelty::{BonusConfig, NoveltyTracker};
pub use policy::{ExplorationPolicy, softmax_probabilities};
pub use value_table::ValueTable;
