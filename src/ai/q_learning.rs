use std::path::Path;

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::ai::agent::Agent;
use crate::ai::q_table::SparseQTable;
use crate::error::{ConfigError, PersistenceError};
use crate::game::GameState;

/// Q-learning hyperparameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub initial_epsilon: f64,
    pub epsilon_decay: f64,
    pub min_epsilon: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            learning_rate: 0.1,
            discount_factor: 0.95,
            initial_epsilon: 1.0,
            epsilon_decay: 0.995,
            min_epsilon: 0.01,
        }
    }
}

impl AgentConfig {
    /// Build a validated config.
    pub fn new(
        learning_rate: f64,
        discount_factor: f64,
        initial_epsilon: f64,
        epsilon_decay: f64,
        min_epsilon: f64,
    ) -> Result<Self, ConfigError> {
        let config = AgentConfig {
            learning_rate,
            discount_factor,
            initial_epsilon,
            epsilon_decay,
            min_epsilon,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.learning_rate) {
            return Err(ConfigError::Validation(
                "agent.learning_rate must be in [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(ConfigError::Validation(
                "agent.discount_factor must be in [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.initial_epsilon) {
            return Err(ConfigError::Validation(
                "agent.initial_epsilon must be in [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_epsilon) {
            return Err(ConfigError::Validation(
                "agent.min_epsilon must be in [0, 1]".into(),
            ));
        }
        if self.min_epsilon > self.initial_epsilon {
            return Err(ConfigError::Validation(
                "agent.min_epsilon must be <= agent.initial_epsilon".into(),
            ));
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(ConfigError::Validation(
                "agent.epsilon_decay must be in (0, 1]".into(),
            ));
        }
        Ok(())
    }
}

/// Tabular Q-learning agent with an epsilon-greedy policy.
pub struct QLearningAgent {
    config: AgentConfig,
    q_table: SparseQTable,
    epsilon: f64,
    episode_count: usize,
    rng: StdRng,
}

impl QLearningAgent {
    pub fn new(config: AgentConfig, num_actions: usize) -> Result<Self, ConfigError> {
        Self::with_rng(config, num_actions, StdRng::from_os_rng())
    }

    pub fn with_seed(
        config: AgentConfig,
        num_actions: usize,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(config, num_actions, StdRng::seed_from_u64(seed))
    }

    /// Build an agent drawing exploration decisions from `rng`.
    pub fn with_rng(
        config: AgentConfig,
        num_actions: usize,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if num_actions == 0 {
            return Err(ConfigError::Validation(
                "agent needs at least one action".into(),
            ));
        }
        let epsilon = config.initial_epsilon;
        Ok(QLearningAgent {
            config,
            q_table: SparseQTable::new(num_actions),
            epsilon,
            episode_count: 0,
            rng,
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn q_table(&self) -> &SparseQTable {
        &self.q_table
    }

    pub fn q_table_mut(&mut self) -> &mut SparseQTable {
        &mut self.q_table
    }

    pub fn num_actions(&self) -> usize {
        self.q_table.num_actions()
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    /// Completed training episodes, carried across checkpoints.
    pub fn episode_count(&self) -> usize {
        self.episode_count
    }

    pub fn set_episode_count(&mut self, episode_count: usize) {
        self.episode_count = episode_count;
    }

    pub fn record_episode(&mut self) {
        self.episode_count += 1;
    }

    /// Epsilon-greedy action for training.
    pub fn choose_action(&mut self, state: &GameState) -> usize {
        self.pick_action(state, true)
    }

    fn pick_action(&mut self, state: &GameState, explore: bool) -> usize {
        let valid = state.get_valid_moves();
        assert!(!valid.is_empty(), "No legal actions");

        if explore && self.rng.random::<f64>() < self.epsilon {
            let idx = self.rng.random_range(0..valid.len());
            return valid[idx];
        }

        let values = self.q_table.values(state);
        let masked: Vec<f64> = values
            .iter()
            .enumerate()
            .map(|(col, &q)| if valid.contains(&col) { q } else { f64::NEG_INFINITY })
            .collect();
        argmax(&masked)
    }

    /// One-step TD update of Q(state, action), then decay epsilon.
    pub fn learn(&mut self, state: &GameState, action: usize, reward: f64, next_state: &GameState) {
        let current_q = self.q_table.get_value(state, action);

        let next_valid = next_state.get_valid_moves();
        let next_q = if next_state.is_terminal() || next_valid.is_empty() {
            0.0
        } else {
            let row = self.q_table.values(next_state);
            next_valid
                .iter()
                .map(|&col| row[col])
                .fold(f64::NEG_INFINITY, f64::max)
        };

        let target = reward + self.config.discount_factor * next_q;
        let new_q = current_q + self.config.learning_rate * (target - current_q);
        self.q_table.set_value(state, action, new_q);

        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.min_epsilon);
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        self.q_table.save(path)
    }

    pub fn load(&mut self, path: &Path) -> Result<(), PersistenceError> {
        self.q_table.load(path)
    }
}

impl Agent for QLearningAgent {
    fn select_action(&mut self, state: &GameState, training: bool) -> usize {
        self.pick_action(state, training)
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }
}

/// Index of the largest value; the first one wins ties.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (idx, &value) in values.iter().enumerate() {
        if value > values[best] {
            best = idx;
        }
    }
    best
}
