//! Training infrastructure: the episode loop against a random opponent,
//! rolling metrics, and optional board rendering.

pub mod metrics;
pub mod render;
pub mod trainer;

pub use metrics::{EpisodeResult, TrainingMetrics};
pub use render::{Renderer, TextRenderer};
pub use trainer::{derive_seed, Trainer, TrainingConfig, TrainingSummary};
