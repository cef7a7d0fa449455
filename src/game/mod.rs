//! Core Connect Four game logic: the mutable board state machine, player
//! tags, and immutable state snapshots.

pub(crate) mod board;
mod player;
mod state;

pub use board::{Board, MoveError, COLS, CONNECT, ROWS};
pub use player::Player;
pub use state::{GameOutcome, GameState};
