use super::{GameState, Player};

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Tokens in a line needed to win.
pub const CONNECT: usize = 4;

/// Axis pairs scanned from the last move: horizontal, vertical, and the
/// two diagonals. Each axis is walked in both directions.
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    InvalidColumn,
    ColumnFull,
    GameOver,
}

/// Mutable Connect Four board and turn state machine.
///
/// Row 0 is the top, row `rows - 1` is the bottom. Consumers read it
/// through [`Board::get_state`], which always hands out an independent
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Player>,
    current_player: Player,
    last_move: Option<(usize, usize)>,
    game_over: bool,
    winner: Option<Player>,
}

impl Board {
    /// Create a new empty 6x7 board
    pub fn new() -> Self {
        Self::with_size(ROWS, COLS)
    }

    /// Create an empty board with custom dimensions.
    pub fn with_size(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "board needs at least one row and column");
        Board {
            rows,
            cols,
            cells: vec![Player::Empty; rows * cols],
            current_player: Player::PlayerOne,
            last_move: None,
            game_over: false,
            winner: None,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn is_terminal(&self) -> bool {
        self.game_over
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Player {
        self.cells[row * self.cols + col]
    }

    /// Check if a column is full (or does not exist)
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= self.cols {
            return true;
        }
        !self.get(0, col).is_empty()
    }

    /// Columns whose top cell is empty, ascending.
    pub fn get_valid_moves(&self) -> Vec<usize> {
        (0..self.cols)
            .filter(|&col| !self.is_column_full(col))
            .collect()
    }

    /// Drop the current player's token into `column`.
    ///
    /// Returns `false` and leaves the board untouched if the column is out
    /// of range, full, or the game is already over.
    pub fn make_move(&mut self, column: usize) -> bool {
        self.try_move(column).is_ok()
    }

    /// Like [`Board::make_move`], but reports why a move was rejected.
    /// On success returns the `(row, col)` where the token landed.
    pub fn try_move(&mut self, column: usize) -> Result<(usize, usize), MoveError> {
        if self.game_over {
            return Err(MoveError::GameOver);
        }
        if column >= self.cols {
            return Err(MoveError::InvalidColumn);
        }
        if self.is_column_full(column) {
            return Err(MoveError::ColumnFull);
        }

        let row = (0..self.rows)
            .rev()
            .find(|&row| self.get(row, column).is_empty())
            .ok_or(MoveError::ColumnFull)?;

        let player = self.current_player;
        self.cells[row * self.cols + column] = player;
        self.last_move = Some((row, column));

        if self.check_win(row, column) {
            self.game_over = true;
            self.winner = Some(player);
        } else if self.is_full() {
            self.game_over = true;
        }

        // Advances even after a terminal move.
        self.current_player = self.current_player.other();

        Ok((row, column))
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..self.cols).all(|col| self.is_column_full(col))
    }

    /// Snapshot the board. The result never observes later moves.
    pub fn get_state(&self) -> GameState {
        GameState::new(
            self.cells.clone(),
            self.rows,
            self.cols,
            self.current_player,
            self.last_move,
            self.game_over,
            self.winner,
        )
    }

    /// Clear the grid and hand the first turn back to player one.
    pub fn reset(&mut self) {
        self.cells.fill(Player::Empty);
        self.current_player = Player::PlayerOne;
        self.last_move = None;
        self.game_over = false;
        self.winner = None;
    }

    /// Check if the token at (row, col) completes a line.
    fn check_win(&self, row: usize, col: usize) -> bool {
        let player = self.get(row, col);
        if player.is_empty() {
            return false;
        }

        AXES.iter().any(|&(dr, dc)| {
            let count = 1
                + self.count_direction(row, col, dr, dc, player)
                + self.count_direction(row, col, -dr, -dc, player);
            count >= CONNECT
        })
    }

    /// Count contiguous `player` tokens walking from (row, col), exclusive.
    fn count_direction(&self, row: usize, col: usize, dr: isize, dc: isize, player: Player) -> usize {
        let mut count = 0;
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        while r >= 0
            && c >= 0
            && (r as usize) < self.rows
            && (c as usize) < self.cols
            && self.get(r as usize, c as usize) == player
        {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A full 6x7 game in which no move ever completes a line.
    pub(crate) const DRAW_SEQUENCE: [usize; 42] = [
        5, 4, 5, 0, 6, 2, 4, 5, 5, 0, 4, 1, 1, 0, 4, 5, 6, 5, 3, 1, 1, 2, 2, 6, 2, 6, 6, 3, 6,
        2, 0, 3, 0, 3, 3, 4, 3, 1, 4, 2, 1, 0,
    ];

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                assert_eq!(board.get(row, col), Player::Empty);
            }
        }
        assert_eq!(board.current_player(), Player::PlayerOne);
        assert!(!board.is_terminal());
    }

    #[test]
    fn test_gravity_drop() {
        let mut board = Board::new();

        // First token lands on the bottom row
        assert_eq!(board.try_move(3), Ok((5, 3)));
        assert_eq!(board.get(5, 3), Player::PlayerOne);

        // Second token stacks on top of it
        assert_eq!(board.try_move(3), Ok((4, 3)));
        assert_eq!(board.get(4, 3), Player::PlayerTwo);
    }

    #[test]
    fn test_gravity_lands_at_rows_minus_one_minus_k() {
        let mut board = Board::new();
        for k in 0..ROWS {
            let (row, _) = board.try_move(2).unwrap();
            assert_eq!(row, ROWS - 1 - k);
        }
    }

    #[test]
    fn test_full_column_rejected_without_state_change() {
        let mut board = Board::new();
        for _ in 0..ROWS {
            assert!(board.make_move(0));
        }
        let before = board.get_state();

        assert!(board.is_column_full(0));
        assert!(!board.make_move(0));
        assert_eq!(board.try_move(0), Err(MoveError::ColumnFull));

        let after = board.get_state();
        assert_eq!(after.current_player(), before.current_player());
        assert_eq!(after.last_move(), before.last_move());
        assert_eq!(after, before);
    }

    #[test]
    fn test_invalid_column() {
        let mut board = Board::new();
        assert_eq!(board.try_move(7), Err(MoveError::InvalidColumn));
        assert!(!board.make_move(100));
        assert_eq!(board.current_player(), Player::PlayerOne);
    }

    #[test]
    fn test_valid_moves_track_top_row() {
        let mut board = Board::new();
        assert_eq!(board.get_valid_moves(), vec![0, 1, 2, 3, 4, 5, 6]);

        // Fill column 4 without anyone lining up four vertically
        for _ in 0..ROWS {
            board.make_move(4);
        }
        assert_eq!(board.get_valid_moves(), vec![0, 1, 2, 3, 5, 6]);

        let state = board.get_state();
        let expected: Vec<usize> = (0..COLS)
            .filter(|&c| state.cell(0, c) == Player::Empty)
            .collect();
        assert_eq!(state.get_valid_moves(), expected);
    }

    #[test]
    fn test_valid_moves_match_top_row_during_random_playouts() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(2024);
        for (rows, cols) in [(ROWS, COLS), (4, 5), (6, 9)] {
            let mut board = Board::with_size(rows, cols);
            for _ in 0..50 {
                board.reset();
                while !board.is_terminal() {
                    let expected: Vec<usize> = (0..cols)
                        .filter(|&c| board.get(0, c) == Player::Empty)
                        .collect();
                    assert_eq!(board.get_valid_moves(), expected);
                    assert_eq!(board.get_state().get_valid_moves(), expected);

                    let col = expected[rng.random_range(0..expected.len())];
                    assert!(board.make_move(col));
                }

                let expected: Vec<usize> = (0..cols)
                    .filter(|&c| board.get(0, c) == Player::Empty)
                    .collect();
                assert_eq!(board.get_valid_moves(), expected);
            }
        }
    }

    #[test]
    fn test_vertical_win_in_column_zero() {
        let mut board = Board::new();
        // P1 stacks column 0, P2 stacks column 1
        for col in [0, 1, 0, 1, 0, 1] {
            assert!(board.make_move(col));
            assert!(!board.is_terminal());
        }
        assert!(board.make_move(0));

        let state = board.get_state();
        assert!(state.is_terminal());
        assert_eq!(state.winner(), Some(Player::PlayerOne));
        assert_eq!(state.last_move(), Some((2, 0)));
    }

    #[test]
    fn test_horizontal_win() {
        let mut board = Board::new();
        for col in [0, 0, 1, 1, 2, 2] {
            board.make_move(col);
        }
        assert!(board.make_move(3));
        assert_eq!(board.get_state().winner(), Some(Player::PlayerOne));
    }

    #[test]
    fn test_horizontal_win_filled_from_the_middle() {
        let mut board = Board::new();
        // P1: 0, 1, 3 then 2 completes the row through the middle
        for col in [0, 6, 1, 6, 3, 5] {
            board.make_move(col);
        }
        assert!(board.make_move(2));
        assert_eq!(board.get_state().winner(), Some(Player::PlayerOne));
    }

    #[test]
    fn test_diagonal_up_win() {
        let mut board = Board::new();
        // Builds / with P1 at (5,0) (4,1) (3,2) (2,3)
        for col in [0, 1, 1, 2, 2, 3, 2, 3, 3, 6] {
            assert!(board.make_move(col));
            assert!(!board.is_terminal());
        }
        assert!(board.make_move(3));
        assert_eq!(board.get_state().winner(), Some(Player::PlayerOne));
    }

    #[test]
    fn test_diagonal_down_win() {
        let mut board = Board::new();
        // Mirror image: \ with P1 at (2,3) (3,4) (4,5) (5,6)
        for col in [6, 5, 5, 4, 4, 3, 4, 3, 3, 0] {
            assert!(board.make_move(col));
            assert!(!board.is_terminal());
        }
        assert!(board.make_move(3));
        assert_eq!(board.get_state().winner(), Some(Player::PlayerOne));
    }

    #[test]
    fn test_no_win_with_three() {
        let mut board = Board::new();
        for col in [0, 0, 1, 1, 2] {
            board.make_move(col);
        }
        assert!(!board.is_terminal());
        assert_eq!(board.get_state().winner(), None);
    }

    #[test]
    fn test_full_board_draw() {
        let mut board = Board::new();
        for (i, &col) in DRAW_SEQUENCE.iter().enumerate() {
            assert!(!board.is_terminal(), "game ended early at move {i}");
            assert!(board.make_move(col), "move {i} into column {col} rejected");
        }

        let state = board.get_state();
        assert!(board.is_full());
        assert!(state.is_terminal());
        assert_eq!(state.winner(), None);
        assert!(state.get_valid_moves().is_empty());
    }

    #[test]
    fn test_no_moves_after_game_over() {
        let mut board = Board::new();
        for col in [0, 1, 0, 1, 0, 1, 0] {
            board.make_move(col);
        }
        assert!(board.is_terminal());
        assert_eq!(board.try_move(3), Err(MoveError::GameOver));
        assert!(!board.make_move(4));
    }

    #[test]
    fn test_player_advances_after_terminal_move() {
        let mut board = Board::new();
        for col in [0, 1, 0, 1, 0, 1, 0] {
            board.make_move(col);
        }
        // Player one won, but the turn still passed on
        assert_eq!(board.current_player(), Player::PlayerTwo);
    }

    #[test]
    fn test_reset() {
        let mut board = Board::new();
        for col in [0, 1, 0, 1, 0, 1, 0] {
            board.make_move(col);
        }
        board.reset();

        let state = board.get_state();
        assert_eq!(state, Board::new().get_state());
        assert_eq!(state.last_move(), None);
        assert_eq!(state.winner(), None);
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_custom_size() {
        let mut board = Board::with_size(4, 4);
        assert_eq!(board.get_valid_moves(), vec![0, 1, 2, 3]);
        assert_eq!(board.try_move(3), Ok((3, 3)));
        assert_eq!(board.try_move(4), Err(MoveError::InvalidColumn));
    }
}
