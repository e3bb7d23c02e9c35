//! Trial observer port - composable data collection during trials

use crate::error::Result;

/// Observer trait for monitoring trial progress.
///
/// Observers can be composed to collect different kinds of data while a
/// trial runs, without coupling the episode loop to any output format.
///
/// # Event Sequence
///
/// 1. `on_trial_start(total_episodes)` - once per trial
/// 2. `on_episode_end(episode, steps, reward)` - once per episode
/// 3. `on_trial_end()` - once per trial
///
/// All methods default to no-ops so observers only implement the events
/// they care about.
pub trait TrialObserver {
    /// Called when a trial starts, with the number of episodes it will run.
    fn on_trial_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode ends.
    ///
    /// `steps` is the number of agent actions taken; `reward` is the total
    /// reward collected over the episode.
    fn on_episode_end(&mut self, _episode: usize, _steps: usize, _reward: f64) -> Result<()> {
        Ok(())
    }

    /// Called when the trial completes.
    fn on_trial_end(&mut self) -> Result<()> {
        Ok(())
    }
}
