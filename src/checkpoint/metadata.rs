use serde::{Deserialize, Serialize};

use crate::ai::AgentConfig;

/// Rolling metrics snapshot at checkpoint time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckpointMetrics {
    pub win_rate: f32,
    pub draw_rate: f32,
    pub average_game_length: f32,
}

/// Training state written next to the model file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    pub episode: usize,
    pub timestamp: u64,
    pub epsilon: f64,
    pub table_entries: usize,
    pub metrics: CheckpointMetrics,
    pub hyperparameters: AgentConfig,
}
