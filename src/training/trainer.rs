use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crate::ai::{Agent, QLearningAgent, RandomAgent};
use crate::checkpoint::{CheckpointManager, CheckpointMetrics};
use crate::error::{ConfigError, TrainingError};
use crate::game::{Board, GameState, Player, COLS, ROWS};
use crate::training::metrics::{EpisodeResult, TrainingMetrics};
use crate::training::render::Renderer;

/// Episodes covered by the rolling statistics in reports and checkpoints.
const REPORT_WINDOW: usize = 100;

/// Trainer configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub episodes: usize,
    /// Replay every `render_every`-th episode through the renderer.
    pub render: bool,
    pub render_every: usize,
    pub render_delay_secs: f64,
    pub save_every: usize,
    pub eval_every: usize,
    pub eval_games: usize,
    pub log_interval: usize,
    pub model_path: PathBuf,
    pub win_reward: f64,
    pub lose_reward: f64,
    pub draw_reward: f64,
    pub invalid_move_reward: f64,
    pub rows: usize,
    pub cols: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            episodes: 10_000,
            render: false,
            render_every: 1000,
            render_delay_secs: 0.3,
            save_every: 5000,
            eval_every: 1000,
            eval_games: 100,
            log_interval: REPORT_WINDOW,
            model_path: PathBuf::from("models/sparse_q_learning.json"),
            win_reward: 1.0,
            lose_reward: -1.0,
            draw_reward: 0.1,
            invalid_move_reward: -0.5,
            rows: ROWS,
            cols: COLS,
            seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cadences = [
            ("episodes", self.episodes),
            ("render_every", self.render_every),
            ("save_every", self.save_every),
            ("eval_every", self.eval_every),
            ("log_interval", self.log_interval),
            ("rows", self.rows),
            ("cols", self.cols),
        ];
        for (name, value) in cadences {
            if value == 0 {
                return Err(ConfigError::Validation(format!(
                    "training.{name} must be > 0"
                )));
            }
        }
        if !self.render_delay_secs.is_finite() || self.render_delay_secs < 0.0 {
            return Err(ConfigError::Validation(
                "training.render_delay_secs must be >= 0".into(),
            ));
        }
        Ok(())
    }

    pub fn render_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.render_delay_secs).unwrap_or_default()
    }
}

/// Totals for one call to [`Trainer::train`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSummary {
    pub episodes: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub final_epsilon: f64,
    pub table_entries: usize,
}

impl TrainingSummary {
    fn record(&mut self, result: &EpisodeResult) {
        self.episodes += 1;
        match result.winner {
            Some(Player::PlayerOne) => self.wins += 1,
            Some(_) => self.losses += 1,
            None => self.draws += 1,
        }
    }
}

/// Trains a [`QLearningAgent`] playing first against a uniform-random
/// opponent.
pub struct Trainer {
    config: TrainingConfig,
    board: Board,
    opponent: RandomAgent,
    renderer: Option<Box<dyn Renderer>>,
    checkpoint_manager: CheckpointManager,
    metrics: TrainingMetrics,
}

impl Trainer {
    /// Build a trainer. Fails if the config does not validate.
    pub fn new(config: TrainingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let opponent = match config.seed {
            Some(seed) => RandomAgent::with_seed(derive_seed(seed, 1)),
            None => RandomAgent::new(),
        };
        Ok(Trainer {
            board: Board::with_size(config.rows, config.cols),
            opponent,
            renderer: None,
            checkpoint_manager: CheckpointManager::new(config.model_path.clone()),
            metrics: TrainingMetrics::with_capacity(REPORT_WINDOW),
            config,
        })
    }

    pub fn with_opponent(mut self, opponent: RandomAgent) -> Self {
        self.opponent = opponent;
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    pub fn checkpoint_manager(&self) -> &CheckpointManager {
        &self.checkpoint_manager
    }

    /// Run the full training loop.
    pub fn train(&mut self, agent: &mut QLearningAgent) -> Result<TrainingSummary, TrainingError> {
        self.train_with_progress(agent, || {})
    }

    /// Run the full training loop, calling `on_episode` once after every
    /// completed episode.
    pub fn train_with_progress<F: FnMut()>(
        &mut self,
        agent: &mut QLearningAgent,
        mut on_episode: F,
    ) -> Result<TrainingSummary, TrainingError> {
        if agent.num_actions() != self.board.cols() {
            return Err(TrainingError::ActionMismatch {
                cols: self.board.cols(),
                actions: agent.num_actions(),
            });
        }

        let mut summary = TrainingSummary::default();
        let start_episode = agent.episode_count() + 1;
        let end_episode = agent.episode_count() + self.config.episodes;

        println!(
            "Starting Q-learning training for {} episodes (episodes {}..{})...",
            self.config.episodes, start_episode, end_episode
        );
        println!("-------------------------------------------");

        let mut last_saved = None;
        for episode in start_episode..=end_episode {
            let rendering = self.config.render
                && self.renderer.is_some()
                && (episode - 1) % self.config.render_every == 0;

            let result = self.play_episode(agent, rendering);
            agent.record_episode();
            self.metrics.record_episode(result);
            summary.record(&result);
            on_episode();

            if episode % self.config.log_interval == 0 {
                println!(
                    "Episode {}/{} | eps: {:.3} | win_rate({}): {:.1}% | draw: {:.1}% | avg_len: {:.1} | states: {}",
                    episode,
                    end_episode,
                    agent.epsilon(),
                    REPORT_WINDOW,
                    self.metrics.win_rate(REPORT_WINDOW) * 100.0,
                    self.metrics.draw_rate(REPORT_WINDOW) * 100.0,
                    self.metrics.average_game_length(REPORT_WINDOW),
                    agent.q_table().len(),
                );
            }

            if self.config.eval_games > 0 && episode % self.config.eval_every == 0 {
                let eval_wr = self.evaluate(agent);
                println!(
                    "  >> Eval vs Random ({} games): {:.1}% win rate",
                    self.config.eval_games,
                    eval_wr * 100.0
                );
            }

            if episode % self.config.save_every == 0 {
                let path = self.save_checkpoint(agent, episode)?;
                println!("  >> Checkpoint saved: {}", path.display());
                last_saved = Some(episode);
            }
        }

        if last_saved != Some(end_episode) {
            let path = self.save_checkpoint(agent, end_episode)?;
            println!("  >> Checkpoint saved: {}", path.display());
        }

        println!("-------------------------------------------");
        println!(
            "Training complete. Total episodes: {} | wins: {} | losses: {} | draws: {}",
            self.metrics.total_episodes(),
            summary.wins,
            summary.losses,
            summary.draws
        );

        summary.final_epsilon = agent.epsilon();
        summary.table_entries = agent.q_table().len();
        Ok(summary)
    }

    /// Play one training game. The agent moves first and learns from each of
    /// its own moves; the opponent never triggers an update.
    pub fn play_episode(&mut self, agent: &mut QLearningAgent, rendering: bool) -> EpisodeResult {
        self.board.reset();
        let mut moves_made = 0;

        while !self.board.is_terminal() {
            let state = self.board.get_state();

            if state.current_player() == Player::PlayerOne {
                let action = agent.choose_action(&state);
                let valid_move = self.board.make_move(action);

                let next_state = self.board.get_state();
                let reward = self.calculate_reward(valid_move, &next_state);
                agent.learn(&state, action, reward, &next_state);
                if !valid_move {
                    // Turn did not pass; the agent tries again
                    continue;
                }
            } else {
                let action = self.opponent.select_action(&state, true);
                let applied = self.board.make_move(action);
                debug_assert!(applied, "random opponent picked illegal column {action}");
            }
            moves_made += 1;

            if rendering {
                self.render_current();
            }
        }

        EpisodeResult {
            winner: self.board.get_state().winner(),
            game_length: moves_made,
        }
    }

    /// Reward for the agent's move, seen from the post-move state.
    pub fn calculate_reward(&self, valid_move: bool, state: &GameState) -> f64 {
        if !valid_move {
            return self.config.invalid_move_reward;
        }

        if state.is_terminal() {
            return match state.winner() {
                Some(Player::PlayerOne) => self.config.win_reward,
                Some(_) => self.config.lose_reward,
                None => self.config.draw_reward,
            };
        }

        0.0
    }

    /// Play `eval_games` greedy games against the random opponent without
    /// learning. Returns the agent's win rate.
    pub fn evaluate(&mut self, agent: &mut QLearningAgent) -> f32 {
        let games = self.config.eval_games;
        if games == 0 {
            return 0.0;
        }

        let mut wins = 0;
        for _ in 0..games {
            self.board.reset();
            while !self.board.is_terminal() {
                let state = self.board.get_state();
                let action = if state.current_player() == Player::PlayerOne {
                    agent.select_action(&state, false)
                } else {
                    self.opponent.select_action(&state, false)
                };
                if !self.board.make_move(action) {
                    // Only a full board can reject a greedy pick; treat as over
                    break;
                }
            }
            if self.board.get_state().winner() == Some(Player::PlayerOne) {
                wins += 1;
            }
        }

        wins as f32 / games as f32
    }

    fn save_checkpoint(
        &self,
        agent: &QLearningAgent,
        episode: usize,
    ) -> Result<PathBuf, TrainingError> {
        let metrics = CheckpointMetrics {
            win_rate: self.metrics.win_rate(REPORT_WINDOW),
            draw_rate: self.metrics.draw_rate(REPORT_WINDOW),
            average_game_length: self.metrics.average_game_length(REPORT_WINDOW),
        };
        Ok(self.checkpoint_manager.save(agent, &metrics, episode)?)
    }

    fn render_current(&mut self) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render(&self.board.get_state());
        }
        let delay = self.config.render_delay();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

/// Derive an independent, deterministic seed for one random stream.
pub fn derive_seed(base_seed: u64, stream: u64) -> u64 {
    // FNV-1a-inspired mixing
    let mut hash = base_seed ^ 0x517cc1b727220a95;
    hash = hash.wrapping_mul(0x100000001b3);
    hash ^= stream;
    hash = hash.wrapping_mul(0x100000001b3);
    hash ^= stream >> 32;
    hash
}
