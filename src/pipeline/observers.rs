//! Trial observers
//!
//! Observers allow composable data collection during trials without
//! coupling the episode loop to specific output formats.

use indicatif::{ProgressBar, ProgressStyle};

use crate::{Result, ports::TrialObserver};

/// Progress bar observer - shows trial progress on the terminal
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    rewarded: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            rewarded: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl TrialObserver for ProgressObserver {
    fn on_trial_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (rewarded: {msg})",
                )
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        self.rewarded = 0;
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, _steps: usize, reward: f64) -> Result<()> {
        if reward != 0.0 {
            self.rewarded += 1;
        }
        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.rewarded.to_string());
        }
        Ok(())
    }

    fn on_trial_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.rewarded.to_string());
        }
        Ok(())
    }
}

/// Metrics observer - accumulates per-episode learning-curve data
#[derive(Debug, Default)]
pub struct MetricsObserver {
    episode_rewards: Vec<f64>,
    episode_steps: Vec<usize>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewards collected per episode, in episode order.
    pub fn episode_rewards(&self) -> &[f64] {
        &self.episode_rewards
    }

    /// Actions taken per episode, in episode order.
    pub fn episode_steps(&self) -> &[usize] {
        &self.episode_steps
    }

    /// Mean steps over the final `window` episodes, a crude convergence
    /// signal.
    pub fn mean_final_steps(&self, window: usize) -> Option<f64> {
        if self.episode_steps.is_empty() || window == 0 {
            return None;
        }
        let tail = &self.episode_steps[self.episode_steps.len().saturating_sub(window)..];
        Some(tail.iter().sum::<usize>() as f64 / tail.len() as f64)
    }
}

impl TrialObserver for MetricsObserver {
    fn on_trial_start(&mut self, _total_episodes: usize) -> Result<()> {
        self.episode_rewards.clear();
        self.episode_steps.clear();
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, steps: usize, reward: f64) -> Result<()> {
        self.episode_rewards.push(reward);
        self.episode_steps.push(steps);
        Ok(())
    }
}
