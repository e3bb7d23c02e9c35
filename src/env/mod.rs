//! Discrete maze environments
//!
//! Environments own state and action identity and all transition semantics.
//! Nothing in here is mutated by learning; agents only see observations.

pub mod binary_maze;

pub use binary_maze::BinaryMaze;
