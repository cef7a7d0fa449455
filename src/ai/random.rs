use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::game::GameState;

use super::agent::Agent;

/// An agent that selects uniformly at random from legal actions.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        RandomAgent { rng }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_action(&mut self, state: &GameState, _training: bool) -> usize {
        let actions = state.get_valid_moves();
        assert!(!actions.is_empty(), "No legal actions available");
        let idx = self.rng.random_range(0..actions.len());
        actions[idx]
    }

    fn name(&self) -> &str {
        "Random"
    }
}
