//! The tabular learning agent
//!
//! All interaction with an agent goes through [`Agent::step`]: the
//! environment hands over an observation, the agent updates its internal
//! tables and answers with an action (or `None` on terminal observations).

use std::collections::HashSet;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    agent::{
        config::{AgentConfig, PlanningConfig, StatePerception, ValueUpdate},
        memory::{EpisodeMemory, ReturnAverages, StepRecord},
        model::TransitionModel,
        novelty::NoveltyTracker,
        policy::ExplorationPolicy,
        value_table::ValueTable,
    },
    error::{Error, Result},
    types::{Action, Observation, State},
};

/// Soft cap after which unbounded episode archival logs a warning.
const HISTORY_WARN_THRESHOLD: usize = 10_000;

/// Update dispatch resolved once at construction. `Td { lambda: 0 }` takes
/// the dedicated one-step path; positive lambda walks the episode trace.
#[derive(Debug, Clone, Copy, PartialEq)]
enum UpdateRule {
    TdZero,
    TdLambda(f64),
    MonteCarlo,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Tabular reinforcement-learning agent.
///
/// Owns every mutable learning structure exclusively: the action-value
/// table, the optional novelty tracker, the per-episode memory, the
/// optional transition model, and its RNG. The environment never reads any
/// of them; the agent never reads environment internals.
///
/// One call to [`Agent::step`] performs, in fixed order: novelty
/// bookkeeping for the previous step, memory append, exactly one value
/// update of the configured kind, optional model update plus simulated
/// planning backups, and action selection bookkeeping.
#[derive(Debug, Clone)]
pub struct Agent {
    learning_rate: f64,
    discount_rate: f64,
    update_rule: UpdateRule,
    exploration: ExplorationPolicy,
    perception: StatePerception,
    planning: Option<PlanningConfig>,
    history_limit: Option<usize>,

    values: ValueTable,
    novelty: Option<NoveltyTracker>,
    memory: EpisodeMemory,
    returns: ReturnAverages,
    model: TransitionModel,
    history: Vec<Vec<StepRecord>>,

    /// States the agent has taken at least one action in, first-seen order
    visited: Vec<State>,
    visited_set: HashSet<State>,

    prev: Option<(State, Action)>,
    rng: StdRng,
}

impl Agent {
    /// Construct an agent from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when a parameter is out of
    /// its documented range.
    pub fn new(config: AgentConfig) -> Result<Self> {
        config.validate()?;

        let update_rule = match config.value_update {
            ValueUpdate::Td { lambda } if lambda == 0.0 => UpdateRule::TdZero,
            ValueUpdate::Td { lambda } => UpdateRule::TdLambda(lambda),
            ValueUpdate::MonteCarlo => UpdateRule::MonteCarlo,
        };

        tracing::debug!(?config, "constructing agent");

        Ok(Self {
            learning_rate: config.learning_rate,
            discount_rate: config.discount_rate,
            update_rule,
            exploration: config.exploration,
            perception: config.perception,
            planning: config.planning,
            history_limit: config.history_limit,
            values: ValueTable::new(),
            novelty: config.bonus.as_ref().map(NoveltyTracker::new),
            memory: EpisodeMemory::new(),
            returns: ReturnAverages::new(),
            model: TransitionModel::new(),
            history: Vec::new(),
            visited: Vec::new(),
            visited_set: HashSet::new(),
            prev: None,
            rng: build_rng(config.seed),
        })
    }

    /// Advance the agent by one environment step.
    ///
    /// Returns the chosen action, or `None` when the observation is
    /// terminal. Terminal observations still perform terminal bookkeeping:
    /// the final value update (Monte Carlo consumes the whole episode
    /// trace), episode archival, and the per-episode reset of
    /// `prev` state/action and memory.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyActionSpace`] when a non-terminal observation carries
    /// no legal actions; [`Error::UninitializedValue`] when an update path
    /// references a pair that was never initialized (a contract violation,
    /// not a recoverable condition).
    pub fn step(&mut self, obs: &Observation) -> Result<Option<Action>> {
        if !obs.terminated && obs.action_space.is_empty() {
            return Err(Error::EmptyActionSpace { state: obs.state });
        }

        let state = self.perceive(obs.state);
        let reward = obs.reward;
        let had_prev = self.prev;

        // (a) Novelty bookkeeping for the previous pair. The residual
        // novelty is captured before the decay so the TD reward term reads
        // pre-decay state.
        let prev_bonus = match (&mut self.novelty, had_prev) {
            (Some(novelty), Some((ps, pa))) => {
                let residual = novelty.value(ps, pa);
                novelty.reduce(ps, pa);
                Some(residual)
            }
            _ => None,
        };

        // (b) Episode memory, for the modes that need it.
        if self.uses_memory() {
            self.memory.push(state, reward);
        }

        // (c) Exactly one real value update of the configured kind.
        match self.update_rule {
            UpdateRule::TdZero => {
                if let Some((ps, pa)) = had_prev {
                    self.td_zero_update(ps, pa, reward, prev_bonus, state, obs)?;
                }
            }
            UpdateRule::TdLambda(lambda) => {
                self.td_lambda_update(lambda, reward, prev_bonus, state, obs)?;
            }
            UpdateRule::MonteCarlo => {
                // Deferred entirely to episode termination, handled below.
            }
        }

        // Action selection.
        let action = if obs.terminated {
            None
        } else {
            self.ensure_initialized(state, &obs.action_space);
            let values: Vec<f64> = obs
                .action_space
                .iter()
                .map(|&a| self.values.try_get(state, a))
                .collect::<Result<_>>()?;
            let chosen = self
                .exploration
                .choose(&mut self.rng, state, &obs.action_space, &values)?;
            if self.uses_memory() {
                self.memory.set_last_action(chosen);
            }
            Some(chosen)
        };

        // (d) Model update and simulated planning backups.
        if self.planning.is_some()
            && let Some((ps, pa)) = had_prev
        {
            self.model.record(ps, pa, reward, state);
            self.plan()?;
        }

        // (e) Advance previous state/action for the next step.
        if let Some(chosen) = action {
            if self.visited_set.insert(state) {
                self.visited.push(state);
            }
            self.prev = Some((state, chosen));
        }

        // (f) Terminal bookkeeping and episode reset.
        if obs.terminated {
            if self.uses_memory() {
                let trace = self.memory.take();
                if self.update_rule == UpdateRule::MonteCarlo {
                    self.monte_carlo_update(&trace);
                }
                self.archive_episode(trace);
            }
            self.prev = None;
        }

        Ok(action)
    }

    /// One-step TD backup:
    /// `Q(prev) += α (r + γ max_a' Q(curr, a') − Q(prev))`.
    ///
    /// The max ranges over the current legal action set only, lazily
    /// initialized, with ties resolved to first-seen order. Terminal
    /// transitions are not special-cased; a terminal state's pairs keep
    /// whatever value they were last assigned.
    fn td_zero_update(
        &mut self,
        prev_state: State,
        prev_action: Action,
        reward: f64,
        prev_bonus: Option<f64>,
        curr_state: State,
        obs: &Observation,
    ) -> Result<()> {
        let max_next = if obs.action_space.is_empty() {
            0.0
        } else {
            self.ensure_initialized(curr_state, &obs.action_space);
            self.values.max_over(curr_state, &obs.action_space)?
        };
        let shaped_reward = reward + prev_bonus.unwrap_or(0.0);
        let q = self.values.try_get(prev_state, prev_action)?;
        let target = shaped_reward + self.discount_rate * max_next;
        self.values.set(
            prev_state,
            prev_action,
            q + self.learning_rate * (target - q),
        );
        Ok(())
    }

    /// TD(λ) backup over the retained episode trace.
    ///
    /// A single scalar error is computed from the two most recent records
    /// and propagated backward with exponentially decaying eligibility
    /// `(γλ)^k`. The trace is re-walked on every step rather than keeping
    /// amortized trace weights; behavior stays simple and auditable. The
    /// value of a pending-terminal current state is taken as 0.
    fn td_lambda_update(
        &mut self,
        lambda: f64,
        reward: f64,
        prev_bonus: Option<f64>,
        curr_state: State,
        obs: &Observation,
    ) -> Result<()> {
        if self.memory.len() < 2 {
            return Ok(());
        }

        let (prev_state, prev_action) = {
            let records = self.memory.records();
            let record = &records[records.len() - 2];
            match record.action {
                Some(action) => (record.state, action),
                None => return Ok(()),
            }
        };

        // Offered actions get entries even at terminal observations, so the
        // trace path and the dedicated TD(0) path build identical tables.
        if !obs.action_space.is_empty() {
            self.ensure_initialized(curr_state, &obs.action_space);
        }
        let v_curr = if obs.terminated || obs.action_space.is_empty() {
            0.0
        } else {
            self.values.max_over(curr_state, &obs.action_space)?
        };
        let v_prev = self.values.try_get(prev_state, prev_action)?;
        let shaped_reward = reward + prev_bonus.unwrap_or(0.0);
        let delta = shaped_reward + self.discount_rate * v_curr - v_prev;

        // Offset 0 is the previous record; the action-less current record
        // is excluded from credit assignment.
        let decay = self.discount_rate * lambda;
        let mut weight = 1.0;
        let updates: Vec<(State, Action, f64)> = self.memory.records()
            [..self.memory.len() - 1]
            .iter()
            .rev()
            .filter_map(|record| {
                record.action.map(|action| {
                    let w = weight;
                    weight *= decay;
                    (record.state, action, w)
                })
            })
            .collect();
        for (state, action, w) in updates {
            let q = self.values.try_get(state, action)?;
            self.values
                .set(state, action, q + self.learning_rate * w * delta);
        }
        Ok(())
    }

    /// Every-visit Monte Carlo pass over the completed episode trace.
    ///
    /// Walks backward accumulating the discounted return and sets each
    /// visited pair's value to the mean of all returns ever observed for
    /// it, across episodes.
    fn monte_carlo_update(&mut self, records: &[StepRecord]) {
        if records.len() < 2 {
            return;
        }
        let mut g = 0.0;
        for t in (0..records.len() - 1).rev() {
            g = g * self.discount_rate + records[t + 1].reward;
            if let Some(action) = records[t].action {
                let mean = self.returns.record(records[t].state, action, g);
                self.values.set(records[t].state, action, mean);
            }
        }
    }

    /// Dyna-style simulated backups from the learned transition model.
    ///
    /// Each backup draws a recorded pair uniformly, looks up its stored
    /// sample, and applies the one-step TD rule against a fixed-size
    /// successor action set (`planning.action_count`, default 4). Successor
    /// pairs without a value entry contribute 0. A no-op while the model
    /// is empty.
    fn plan(&mut self) -> Result<()> {
        let Some(planning) = self.planning else {
            return Ok(());
        };
        if self.model.is_empty() {
            return Ok(());
        }
        for _ in 0..planning.steps {
            let Some((state, action)) = self.model.sample(&mut self.rng) else {
                return Ok(());
            };
            let Some((reward, next_state)) = self.model.get(state, action) else {
                continue;
            };
            let mut best: Option<f64> = None;
            for a in 0..planning.action_count {
                if let Some(v) = self.values.get(next_state, Action(a)) {
                    best = Some(best.map_or(v, |b: f64| b.max(v)));
                }
            }
            // Successors with no value entries contribute 0.
            let max_next = best.unwrap_or(0.0);
            let q = self.values.try_get(state, action)?;
            let target = reward + self.discount_rate * max_next;
            self.values
                .set(state, action, q + self.learning_rate * (target - q));
        }
        Ok(())
    }

    /// Lazily create value entries for every offered action, seeded from
    /// residual novelty when the exploration bonus is enabled and 0
    /// otherwise.
    fn ensure_initialized(&mut self, state: State, actions: &[Action]) {
        for &action in actions {
            if !self.values.contains(state, action) {
                let seed = match &mut self.novelty {
                    Some(novelty) => novelty.initial_q(state, action),
                    None => 0.0,
                };
                self.values.ensure(state, action, seed);
            }
        }
    }

    /// Apply the configured perception mode to the true state.
    fn perceive(&mut self, true_state: State) -> State {
        match self.perception {
            StatePerception::Exact => true_state,
            StatePerception::Noisy { probability } => {
                if !self.visited.is_empty() && self.rng.random::<f64>() < probability {
                    self.visited[self.rng.random_range(0..self.visited.len())]
                } else {
                    true_state
                }
            }
        }
    }

    fn uses_memory(&self) -> bool {
        matches!(
            self.update_rule,
            UpdateRule::TdLambda(_) | UpdateRule::MonteCarlo
        )
    }

    fn archive_episode(&mut self, trace: Vec<StepRecord>) {
        match self.history_limit {
            Some(0) => return,
            Some(limit) => {
                if self.history.len() == limit {
                    self.history.remove(0);
                }
            }
            None => {
                if self.history.len() == HISTORY_WARN_THRESHOLD {
                    tracing::warn!(
                        episodes = self.history.len(),
                        "episode history is unbounded and still growing; \
                         consider setting a history limit"
                    );
                }
            }
        }
        self.history.push(trace);
    }

    /// Learned Q-value for a pair, if initialized.
    pub fn q_value(&self, state: State, action: Action) -> Option<f64> {
        self.values.get(state, action)
    }

    /// Number of initialized state-action pairs.
    pub fn table_size(&self) -> usize {
        self.values.size()
    }

    /// Snapshot iterator over the full value table.
    pub fn q_values(&self) -> impl Iterator<Item = (State, Action, f64)> + '_ {
        self.values.iter()
    }

    /// Residual novelty for a pair, if the bonus is enabled and the pair
    /// has been referenced.
    pub fn novelty(&self, state: State, action: Action) -> Option<f64> {
        self.novelty.as_ref().and_then(|n| n.peek(state, action))
    }

    /// Archived episode traces, oldest first.
    pub fn history(&self) -> &[Vec<StepRecord>] {
        &self.history
    }

    /// Number of transitions stored in the planning model.
    pub fn model_size(&self) -> usize {
        self.model.size()
    }

    /// Number of Monte Carlo returns observed for a pair.
    pub fn return_count(&self, state: State, action: Action) -> u64 {
        self.returns.count(state, action)
    }
}
