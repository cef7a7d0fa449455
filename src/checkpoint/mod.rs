mod manager;
mod metadata;

pub use manager::CheckpointManager;
pub use metadata::{CheckpointMetadata, CheckpointMetrics};
