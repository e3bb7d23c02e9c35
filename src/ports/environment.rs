//! Environment port - abstraction over discrete-state environments
//!
//! The environment owns state and action identity and all transition
//! semantics; the agent never reads environment internals and the
//! environment never reads agent state.

use crate::types::{Action, Observation};

/// Environment trait - the agent-facing interface of any discrete
/// environment.
///
/// The contract is observation-driven: the environment produces an
/// [`Observation`] at episode start and after every action, and the
/// observation's `action_space` is the complete legal action set for its
/// state. Action spaces may differ in content and cardinality between
/// states.
///
/// # Examples
///
/// ```no_run
/// use mazelearn::ports::Environment;
/// use mazelearn::types::{Action, Observation, State};
///
/// struct TwoArm {
///     done: bool,
/// }
///
/// impl Environment for TwoArm {
///     fn begin_episode(&mut self) -> Observation {
///         self.done = false;
///         Observation::new(vec![Action(0), Action(1)], State(0), 0.0)
///     }
///
///     fn advance(&mut self, action: Action) -> Observation {
///         self.done = true;
///         let reward = if action == Action(1) { 1.0 } else { 0.0 };
///         Observation::terminal(vec![], State(1 + action.0 as u32), reward)
///     }
/// }
/// ```
pub trait Environment {
    /// Reset to the start state and return the first observation of a new
    /// episode.
    ///
    /// The returned observation may already be terminal if the start state
    /// is itself terminal.
    fn begin_episode(&mut self) -> Observation;

    /// Apply an action and return the resulting observation.
    fn advance(&mut self, action: Action) -> Observation;
}
