//! Ports (trait boundaries) for external collaborators.
//!
//! The agent core owns these interfaces; environments and trial observers
//! are adapters implementing them.

pub mod environment;
pub mod observer;

pub use environment::Environment;
pub use observer::TrialObserver;
