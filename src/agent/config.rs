//! Agent configuration types.

use serde::{Deserialize, Serialize};

use crate::{
    agent::{novelty::BonusConfig, policy::ExplorationPolicy},
    error::{Error, Result},
};

/// Value-update algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ValueUpdate {
    /// Temporal-difference learning. `lambda = 0` is one-step TD; values in
    /// `(0, 1]` enable eligibility traces over the episode memory.
    Td { lambda: f64 },
    /// Every-visit Monte Carlo return averaging, deferred to episode end
    MonteCarlo,
}

/// How the agent perceives the environment's state signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StatePerception {
    /// The observed state is used as-is
    Exact,
    /// With the given probability, the true state is replaced by one drawn
    /// uniformly from the states the agent has ever taken an action in.
    /// Models partial or noisy self-localization.
    Noisy { probability: f64 },
}

/// Dyna-style planning parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// Simulated backups performed after each real step
    pub steps: usize,
    /// Size of the action set assumed when evaluating simulated successors
    pub action_count: usize,
}

impl PlanningConfig {
    pub fn new(steps: usize) -> Self {
        Self {
            steps,
            action_count: 4,
        }
    }

    pub fn with_action_count(mut self, action_count: usize) -> Self {
        self.action_count = action_count;
        self
    }
}

/// Configuration for creating an [`Agent`](crate::agent::Agent).
///
/// Builder-style API; validation happens once, at agent construction, and
/// fails with [`Error::InvalidConfiguration`] on any out-of-range parameter.
///
/// # Examples
///
/// ```
/// use mazelearn::agent::{AgentConfig, ExplorationPolicy, ValueUpdate};
///
/// let config = AgentConfig::new(
///     ValueUpdate::Td { lambda: 0.0 },
///     ExplorationPolicy::EpsilonGreedy { epsilon: 0.1 },
/// )
/// .with_learning_rate(0.5)
/// .with_discount_rate(0.9)
/// .with_seed(42);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Step size α applied to every value update
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount_rate: f64,
    /// Value-update algorithm
    pub value_update: ValueUpdate,
    /// Exploration policy for action selection
    pub exploration: ExplorationPolicy,
    /// State-perception mode
    pub perception: StatePerception,
    /// Dyna-style planning, when enabled
    pub planning: Option<PlanningConfig>,
    /// Exploration bonus / novelty tracking, when enabled
    pub bonus: Option<BonusConfig>,
    /// Cap on archived episode traces; `None` keeps everything
    pub history_limit: Option<usize>,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Create a configuration with the given learning mode and exploration
    /// policy.
    ///
    /// Defaults for the rest: learning rate 0.1, discount rate 0.8, exact
    /// perception, no planning, no exploration bonus, unbounded history,
    /// non-deterministic seed.
    pub fn new(value_update: ValueUpdate, exploration: ExplorationPolicy) -> Self {
        Self {
            learning_rate: 0.1,
            discount_rate: 0.8,
            value_update,
            exploration,
            perception: StatePerception::Exact,
            planning: None,
            bonus: None,
            history_limit: None,
            seed: None,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_rate(mut self, discount_rate: f64) -> Self {
        self.discount_rate = discount_rate;
        self
    }

    pub fn with_perception(mut self, perception: StatePerception) -> Self {
        self.perception = perception;
        self
    }

    pub fn with_planning(mut self, planning: PlanningConfig) -> Self {
        self.planning = Some(planning);
        self
    }

    pub fn with_bonus(mut self, bonus: BonusConfig) -> Self {
        self.bonus = Some(bonus);
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every parameter against its documented range.
    pub(crate) fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::config(format!(
                "learning rate must be > 0, got {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.discount_rate) {
            return Err(Error::config(format!(
                "discount rate must be in [0, 1], got {}",
                self.discount_rate
            )));
        }
        if let ValueUpdate::Td { lambda } = self.value_update
            && !(0.0..=1.0).contains(&lambda)
        {
            return Err(Error::config(format!(
                "TD lambda must be in [0, 1], got {lambda}"
            )));
        }
        if let ExplorationPolicy::EpsilonGreedy { epsilon } = self.exploration
            && !(0.0..=1.0).contains(&epsilon)
        {
            return Err(Error::config(format!(
                "epsilon must be in [0, 1], got {epsilon}"
            )));
        }
        if let StatePerception::Noisy { probability } = self.perception
            && !(0.0..=1.0).contains(&probability)
        {
            return Err(Error::config(format!(
                "perception noise probability must be in [0, 1], got {probability}"
            )));
        }
        if let Some(planning) = &self.planning {
            if planning.steps == 0 {
                return Err(Error::config("planning steps must be > 0"));
            }
            if planning.action_count == 0 {
                return Err(Error::config("planning action count must be > 0"));
            }
        }
        if let Some(bonus) = &self.bonus {
            if !bonus.reduction.is_finite() || bonus.reduction <= 0.0 {
                return Err(Error::config(format!(
                    "bonus reduction must be > 0, got {}",
                    bonus.reduction
                )));
            }
            if !bonus.init_rate.is_finite() || bonus.init_rate < 0.0 {
                return Err(Error::config(format!(
                    "bonus init rate must be >= 0, got {}",
                    bonus.init_rate
                )));
            }
            if !bonus.max.is_finite() || bonus.max <= 0.0 {
                return Err(Error::config(format!(
                    "bonus maximum must be > 0, got {}",
                    bonus.max
                )));
            }
        }
        Ok(())
    }
}
