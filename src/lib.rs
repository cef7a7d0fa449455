//! # Sparse Connect Four
//!
//! Connect Four with a tabular Q-learning agent. The agent stores action
//! values only for board positions it has actually visited, keyed by a
//! compact string encoding of the grid and the player to move.
//!
//! ## Modules
//!
//! - [`game`]: Core game logic: board, player, state snapshots
//! - [`ai`]: Agent trait, random opponent, sparse Q-table, Q-learning agent
//! - [`training`]: Episode loop, rolling metrics, board rendering
//! - [`checkpoint`]: Model file plus metadata sidecar
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod game;
pub mod training;
