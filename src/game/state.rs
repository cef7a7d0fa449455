use std::fmt;

use super::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

/// Immutable snapshot of a [`Board`](super::Board).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    cells: Vec<Player>,
    rows: usize,
    cols: usize,
    current_player: Player,
    last_move: Option<(usize, usize)>,
    game_over: bool,
    winner: Option<Player>,
}

impl GameState {
    pub(crate) fn new(
        cells: Vec<Player>,
        rows: usize,
        cols: usize,
        current_player: Player,
        last_move: Option<(usize, usize)>,
        game_over: bool,
        winner: Option<Player>,
    ) -> Self {
        debug_assert_eq!(cells.len(), rows * cols);
        GameState {
            cells,
            rows,
            cols,
            current_player,
            last_move,
            game_over,
            winner,
        }
    }

    /// Initial state of a default 6x7 game
    pub fn initial() -> Self {
        super::Board::new().get_state()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the cell at a specific position (row 0 is the top)
    pub fn cell(&self, row: usize, col: usize) -> Player {
        self.cells[row * self.cols + col]
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Player] {
        &self.cells
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn last_move(&self) -> Option<(usize, usize)> {
        self.last_move
    }

    pub fn is_terminal(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        if !self.game_over {
            return None;
        }
        Some(match self.winner {
            Some(player) => GameOutcome::Winner(player),
            None => GameOutcome::Draw,
        })
    }

    /// Columns whose top cell is empty, ascending. Recomputed on every call.
    pub fn get_valid_moves(&self) -> Vec<usize> {
        (0..self.cols)
            .filter(|&col| self.cell(0, col).is_empty())
            .collect()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let line: Vec<&str> = (0..self.cols)
                .map(|col| match self.cell(row, col) {
                    Player::Empty => ".",
                    Player::PlayerOne => "X",
                    Player::PlayerTwo => "O",
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        let columns: Vec<String> = (0..self.cols).map(|c| (c % 10).to_string()).collect();
        writeln!(f, "{}", columns.join(" "))?;

        match self.outcome() {
            None => writeln!(f, "Game in progress")?,
            Some(GameOutcome::Winner(player)) => writeln!(f, "Game over - Winner: {player}")?,
            Some(GameOutcome::Draw) => writeln!(f, "Game over - Draw")?,
        }
        write!(f, "Current player: {}", self.current_player)
    }
}
