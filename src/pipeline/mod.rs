//! Trial orchestration
//!
//! This module provides the episode/trial loop that drives an agent
//! against an environment, plus composable observers for collecting
//! learning-curve data while it runs.

pub mod observers;
pub mod runner;

// Re-export observer implementations (adapters)
pub use observers::{MetricsObserver, ProgressObserver};
pub use runner::{TrialConfig, TrialResult, TrialRunner};

pub use crate::ports::{Environment, TrialObserver};
