//! Agents: the shared [`Agent`] trait, the uniform-random opponent, and the
//! tabular Q-learning agent with its sparse action-value table.

mod agent;
pub mod q_learning;
pub mod q_table;
mod random;

pub use agent::Agent;
pub use q_learning::{AgentConfig, QLearningAgent};
pub use q_table::{SparseQTable, StateKey};
pub use random::RandomAgent;
