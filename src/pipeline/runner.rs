//! Trial and episode orchestration

use serde::{Deserialize, Serialize};

use crate::{
    agent::{Agent, AgentConfig},
    error::{Error, Result},
    ports::{Environment, TrialObserver},
};

/// Trial configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialConfig {
    /// Episodes per trial
    pub episodes: usize,

    /// Optional per-episode step budget; exceeding it closes the episode
    /// with a synthetic terminal observation
    pub max_steps: Option<usize>,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            episodes: 100,
            max_steps: None,
        }
    }
}

/// Result of one trial: per-episode totals, in episode order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialResult {
    /// Total reward collected per episode
    pub episode_rewards: Vec<f64>,
    /// Actions taken per episode
    pub episode_steps: Vec<usize>,
}

impl TrialResult {
    /// Running sum of episode rewards.
    pub fn cumulative_rewards(&self) -> Vec<f64> {
        self.episode_rewards
            .iter()
            .scan(0.0, |acc, &r| {
                *acc += r;
                Some(*acc)
            })
            .collect()
    }

    /// First episode that collected any reward, if one did.
    pub fn first_rewarded_episode(&self) -> Option<usize> {
        self.episode_rewards.iter().position(|&r| r != 0.0)
    }

    /// Render the result as pretty-printed JSON for external analysis.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Episode loop driving one agent against one environment.
///
/// Each episode begins with `begin_episode`, then alternates `agent.step`
/// and `env.advance` until the environment terminates the episode. One
/// continuously-learning agent spans all episodes of a trial; trials get
/// fresh agents.
pub struct TrialRunner {
    config: TrialConfig,
    observers: Vec<Box<dyn TrialObserver>>,
}

impl TrialRunner {
    /// Create a new trial runner
    pub fn new(config: TrialConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the runner
    pub fn with_observer(mut self, observer: Box<dyn TrialObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run one trial with an existing agent.
    pub fn run(&mut self, agent: &mut Agent, env: &mut dyn Environment) -> Result<TrialResult> {
        for observer in &mut self.observers {
            observer.on_trial_start(self.config.episodes)?;
        }

        let mut episode_rewards = Vec::with_capacity(self.config.episodes);
        let mut episode_steps = Vec::with_capacity(self.config.episodes);

        for episode in 0..self.config.episodes {
            let (steps, reward) = self.run_episode(agent, env)?;
            tracing::info!(episode, steps, reward, "episode complete");

            for observer in &mut self.observers {
                observer.on_episode_end(episode, steps, reward)?;
            }
            episode_rewards.push(reward);
            episode_steps.push(steps);
        }

        for observer in &mut self.observers {
            observer.on_trial_end()?;
        }

        Ok(TrialResult {
            episode_rewards,
            episode_steps,
        })
    }

    /// Run several trials, each with a freshly constructed agent.
    ///
    /// Partial learning state never crosses trials. When the agent config
    /// carries a seed, each trial gets a distinct derived seed.
    pub fn run_trials(
        &mut self,
        agent_config: &AgentConfig,
        env: &mut dyn Environment,
        trials: usize,
    ) -> Result<Vec<TrialResult>> {
        let mut results = Vec::with_capacity(trials);
        for trial in 0..trials {
            let mut config = agent_config.clone();
            if let Some(seed) = config.seed {
                config.seed = Some(seed.wrapping_add(trial as u64));
            }
            let mut agent = Agent::new(config)?;
            results.push(self.run(&mut agent, env)?);
        }
        Ok(results)
    }

    fn run_episode(
        &mut self,
        agent: &mut Agent,
        env: &mut dyn Environment,
    ) -> Result<(usize, f64)> {
        let mut obs = env.begin_episode();
        let mut reward = obs.reward;
        let mut steps = 0usize;
        let mut action = agent.step(&obs)?;

        while !obs.terminated {
            let Some(chosen) = action else {
                return Err(Error::MissingAction { state: obs.state });
            };
            obs = env.advance(chosen);
            steps += 1;
            reward += obs.reward;

            // Step-budget truncation closes the episode for the agent too,
            // so its per-episode memory is reset.
            if !obs.terminated && self.config.max_steps.is_some_and(|max| steps >= max) {
                obs.terminated = true;
            }
            action = agent.step(&obs)?;
        }

        Ok((steps, reward))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        agent::{ExplorationPolicy, ValueUpdate},
        env::BinaryMaze,
    };

    fn runner(episodes: usize, max_steps: Option<usize>) -> TrialRunner {
        TrialRunner::new(TrialConfig {
            episodes,
            max_steps,
        })
    }

    #[test]
    fn test_trial_collects_one_result_per_episode() {
        let config = AgentConfig::new(
            ValueUpdate::Td { lambda: 0.0 },
            ExplorationPolicy::Random,
        )
        .with_seed(21);
        let mut agent = Agent::new(config).unwrap();
        let mut maze = BinaryMaze::new(3, &[((2, 0), 1.0)], false).unwrap();

        let result = runner(10, Some(100)).run(&mut agent, &mut maze).unwrap();
        assert_eq!(result.episode_rewards.len(), 10);
        assert_eq!(result.episode_steps.len(), 10);
        // Without reversals every episode descends straight to a leaf.
        assert!(result.episode_steps.iter().all(|&s| s <= 100));
    }

    #[test]
    fn test_max_steps_truncates_episodes() {
        let config = AgentConfig::new(
            ValueUpdate::Td { lambda: 0.0 },
            ExplorationPolicy::Random,
        )
        .with_seed(3);
        let mut agent = Agent::new(config).unwrap();
        // Reward buried at a leaf; reversals let the agent wander.
        let mut maze = BinaryMaze::new(4, &[((3, 7), 1.0)], true).unwrap();

        let result = runner(5, Some(8)).run(&mut agent, &mut maze).unwrap();
        assert!(result.episode_steps.iter().all(|&s| s <= 8));
    }

    #[test]
    fn test_runner_drives_attached_observers() {
        let config = AgentConfig::new(
            ValueUpdate::Td { lambda: 0.0 },
            ExplorationPolicy::Random,
        )
        .with_seed(8);
        let mut agent = Agent::new(config).unwrap();
        let mut maze = BinaryMaze::new(3, &[((2, 0), 1.0)], false).unwrap();

        let result = runner(3, Some(50))
            .with_observer(Box::new(crate::pipeline::ProgressObserver::new()))
            .run(&mut agent, &mut maze)
            .unwrap();
        assert_eq!(result.episode_rewards.len(), 3);
    }

    #[test]
    fn test_run_trials_uses_fresh_agents() {
        let config = AgentConfig::new(
            ValueUpdate::Td { lambda: 0.0 },
            ExplorationPolicy::Random,
        )
        .with_seed(17);
        let mut maze = BinaryMaze::new(3, &[((2, 0), 1.0)], false).unwrap();

        let results = runner(5, Some(50))
            .run_trials(&config, &mut maze, 3)
            .unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_cumulative_rewards() {
        let result = TrialResult {
            episode_rewards: vec![0.0, 1.0, 0.0, 1.0],
            episode_steps: vec![2, 2, 2, 2],
        };
        assert_eq!(result.cumulative_rewards(), vec![0.0, 1.0, 1.0, 2.0]);
        assert_eq!(result.first_rewarded_episode(), Some(1));
    }

    #[test]
    fn test_result_json_round_trip() {
        let result = TrialResult {
            episode_rewards: vec![0.0, 1.0],
            episode_steps: vec![3, 1],
        };
        let json = result.to_json().unwrap();
        let parsed: TrialResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.episode_rewards, result.episode_rewards);
        assert_eq!(parsed.episode_steps, result.episode_steps);
    }
}
