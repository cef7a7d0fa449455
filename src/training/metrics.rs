use std::collections::VecDeque;

use crate::game::Player;

/// Result of a single episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeResult {
    pub winner: Option<Player>,
    pub game_length: usize,
}

/// Training metrics tracker with rolling window computations.
///
/// Rates are reported from the learning agent's side, which always plays
/// [`Player::PlayerOne`].
pub struct TrainingMetrics {
    episode_results: VecDeque<EpisodeResult>,
    capacity: usize,
    total_episodes: usize, // lifetime count, never capped
}

impl TrainingMetrics {
    pub fn with_capacity(capacity: usize) -> Self {
        TrainingMetrics {
            episode_results: VecDeque::with_capacity(capacity),
            capacity,
            total_episodes: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn record_episode(&mut self, result: EpisodeResult) {
        self.total_episodes += 1;
        self.episode_results.push_back(result);
        if self.episode_results.len() > self.capacity {
            self.episode_results.pop_front();
        }
    }

    /// Win rate for the agent in the last N episodes.
    pub fn win_rate(&self, last_n: usize) -> f32 {
        self.rate(last_n, |r| r.winner == Some(Player::PlayerOne))
    }

    /// Loss rate for the agent in the last N episodes.
    pub fn loss_rate(&self, last_n: usize) -> f32 {
        self.rate(last_n, |r| r.winner == Some(Player::PlayerTwo))
    }

    /// Draw rate in the last N episodes.
    pub fn draw_rate(&self, last_n: usize) -> f32 {
        self.rate(last_n, |r| r.winner.is_none())
    }

    /// Average game length over the last N episodes.
    pub fn average_game_length(&self, last_n: usize) -> f32 {
        let n = self.episode_results.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let total: usize = self
            .episode_results
            .iter()
            .rev()
            .take(n)
            .map(|r| r.game_length)
            .sum();
        total as f32 / n as f32
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    fn rate(&self, last_n: usize, matches: impl Fn(&EpisodeResult) -> bool) -> f32 {
        let n = self.episode_results.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let hits = self
            .episode_results
            .iter()
            .rev()
            .take(n)
            .filter(|r| matches(r))
            .count();
        hits as f32 / n as f32
    }
}

impl Default for TrainingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(winner: Option<Player>, game_length: usize) -> EpisodeResult {
        EpisodeResult {
            winner,
            game_length,
        }
    }

    #[test]
    fn test_win_rate() {
        let mut m = TrainingMetrics::new();
        for _ in 0..7 {
            m.record_episode(result(Some(Player::PlayerOne), 10));
        }
        for _ in 0..3 {
            m.record_episode(result(Some(Player::PlayerTwo), 10));
        }
        assert!((m.win_rate(10) - 0.7).abs() < 1e-6);
        assert!((m.loss_rate(10) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_draw_rate() {
        let mut m = TrainingMetrics::new();
        m.record_episode(result(None, 42));
        m.record_episode(result(Some(Player::PlayerOne), 10));
        assert!((m.draw_rate(10) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_average_game_length() {
        let mut m = TrainingMetrics::new();
        m.record_episode(result(None, 20));
        m.record_episode(result(None, 30));
        assert!((m.average_game_length(10) - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_window_only_covers_last_n() {
        let mut m = TrainingMetrics::new();
        for _ in 0..150 {
            m.record_episode(result(Some(Player::PlayerTwo), 8));
        }
        for _ in 0..100 {
            m.record_episode(result(Some(Player::PlayerOne), 12));
        }
        assert_eq!(m.total_episodes(), 250);
        assert_eq!(m.win_rate(100), 1.0);
        assert!((m.average_game_length(100) - 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_metrics_are_zero() {
        let m = TrainingMetrics::default();
        assert_eq!(m.win_rate(100), 0.0);
        assert_eq!(m.draw_rate(100), 0.0);
        assert_eq!(m.average_game_length(100), 0.0);
    }
}
