//! Game state: board, move history and terminal outcome.
//!
//! This module provides the game logic the search consumes:
//! - Move application with legality checking
//! - Five-in-a-row win and full-board draw detection
//! - Cheap copies and history replay
//! - Coordinate parsing ("H8") and formatting

use thiserror::Error;

use crate::board::{Board, Point, Side, on_board};
use crate::constants::N;

/// Reasons a move cannot be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("illegal move: point is not on the board")]
    OutOfBounds,
    #[error("illegal move: point is already occupied")]
    Occupied,
    #[error("illegal move: game is already over")]
    GameOver,
}

/// Terminal result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Side),
    /// Board filled without a winner.
    Draw,
}

/// A gomoku position.
///
/// Turn order is not enforced: the caller names the side of every move.
#[derive(Debug, Clone, Default)]
pub struct Game {
    board: Board,
    history: Vec<(Point, Side)>,
    outcome: Option<Outcome>,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a game by playing `moves` in order.
    pub fn from_moves(moves: &[(Point, Side)]) -> Result<Self, PlayError> {
        let mut game = Self::new();
        for &(pt, side) in moves {
            game.play(pt, side)?;
        }
        Ok(game)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &[(Point, Side)] {
        &self.history
    }

    /// `None` while the game is ongoing.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn last_move(&self) -> Option<(Point, Side)> {
        self.history.last().copied()
    }

    /// The side after the last mover, Black on an empty board.
    pub fn next_side(&self) -> Side {
        self.last_move()
            .map(|(_, side)| side.opponent())
            .unwrap_or(Side::Black)
    }

    /// Place a stone for `side` at `pt`.
    ///
    /// # Errors
    /// - [`PlayError::GameOver`] if the game already has an outcome
    /// - [`PlayError::OutOfBounds`] if the point is off the board
    /// - [`PlayError::Occupied`] if the point is not empty
    pub fn play(&mut self, pt: Point, side: Side) -> Result<(), PlayError> {
        if self.outcome.is_some() {
            return Err(PlayError::GameOver);
        }
        if !on_board(pt) {
            return Err(PlayError::OutOfBounds);
        }
        if !self.board.is_empty_at(pt) {
            return Err(PlayError::Occupied);
        }

        self.board.place(pt, side);
        self.history.push((pt, side));

        if self.board.makes_five(pt, side) {
            self.outcome = Some(Outcome::Winner(side));
        } else if self.board.is_full() {
            self.outcome = Some(Outcome::Draw);
        }
        Ok(())
    }

    /// A copy of this game truncated to its first `n` moves.
    ///
    /// `n` beyond the history length replays the whole game.
    pub fn replay_prefix(&self, n: usize) -> Result<Game, PlayError> {
        Self::from_moves(&self.history[..n.min(self.history.len())])
    }

    /// Board after each ply, starting with the empty board.
    pub fn board_history(&self) -> Vec<Board> {
        let mut boards = Vec::with_capacity(self.history.len() + 1);
        let mut board = Board::new();
        boards.push(board.clone());
        for &(pt, side) in &self.history {
            board.place(pt, side);
            boards.push(board.clone());
        }
        boards
    }
}

/// Parse a coordinate string (e.g., "H8") into a Point.
///
/// Columns are letters starting at 'A' on the left, rows are numbered from 1
/// at the bottom. Returns `None` for malformed or off-board input.
pub fn parse_coord(s: &str) -> Option<Point> {
    let s = s.trim();
    let mut chars = s.chars();
    let col_char = chars.next()?.to_ascii_uppercase();
    if !col_char.is_ascii_uppercase() {
        return None;
    }
    let col = (col_char as u8 - b'A') as usize;
    let row_num: usize = chars.as_str().parse().ok()?;
    if row_num == 0 || row_num > N || col >= N {
        return None;
    }
    Some((N - row_num, col))
}

/// Convert a Point to a coordinate string (e.g., "H8").
pub fn str_coord((row, col): Point) -> String {
    format!("{}{}", (b'A' + col as u8) as char, N - row)
}
