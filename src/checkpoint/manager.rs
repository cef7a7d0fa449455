use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::ai::q_table::write_atomic;
use crate::ai::QLearningAgent;
use crate::checkpoint::metadata::{CheckpointMetadata, CheckpointMetrics};
use crate::error::PersistenceError;

/// Saves and restores an agent at a fixed model path.
///
/// The Q-table goes to the model path itself; epsilon, the episode counter
/// and a metrics snapshot go to a `<model>.meta.json` sidecar.
pub struct CheckpointManager {
    model_path: PathBuf,
}

impl CheckpointManager {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        CheckpointManager {
            model_path: model_path.into(),
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn metadata_path(&self) -> PathBuf {
        let mut name = OsString::from(self.model_path.as_os_str());
        name.push(".meta.json");
        PathBuf::from(name)
    }

    /// Write the agent's table and training state. Creates the parent
    /// directory if needed.
    pub fn save(
        &self,
        agent: &QLearningAgent,
        metrics: &CheckpointMetrics,
        episode: usize,
    ) -> Result<PathBuf, PersistenceError> {
        if let Some(parent) = self.model_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| PersistenceError::Write {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        agent.save(&self.model_path)?;

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let metadata = CheckpointMetadata {
            episode,
            timestamp,
            epsilon: agent.epsilon(),
            table_entries: agent.q_table().len(),
            metrics: metrics.clone(),
            hyperparameters: agent.config().clone(),
        };
        let meta_path = self.metadata_path();
        let meta_json = serde_json::to_string_pretty(&metadata)?;
        write_atomic(&meta_path, meta_json)?;

        Ok(self.model_path.clone())
    }

    pub fn load_metadata(&self) -> Result<CheckpointMetadata, PersistenceError> {
        let meta_path = self.metadata_path();
        let meta_json = fs::read_to_string(&meta_path).map_err(|e| PersistenceError::Read {
            path: meta_path.clone(),
            source: e,
        })?;
        serde_json::from_str(&meta_json).map_err(|e| PersistenceError::Parse {
            path: meta_path,
            source: e,
        })
    }

    /// Load the table into `agent`, then restore epsilon and the episode
    /// counter from the sidecar when one exists. A bare model file without
    /// a sidecar restores only the table.
    pub fn restore(
        &self,
        agent: &mut QLearningAgent,
    ) -> Result<Option<CheckpointMetadata>, PersistenceError> {
        agent.load(&self.model_path)?;

        if !self.metadata_path().exists() {
            return Ok(None);
        }
        let metadata = self.load_metadata()?;
        agent.set_epsilon(metadata.epsilon);
        agent.set_episode_count(metadata.episode);
        Ok(Some(metadata))
    }
}
