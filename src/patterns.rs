//! Line-pattern move scoring.
//!
//! Each empty cell is scored by looking along the four line directions. The
//! eight cells surrounding it on a line (four on each side) form a window,
//! encoded into a 16-bit code and looked up in a precomputed table:
//!
//! ```text
//! -4 -3 -2 -1 [pt] +1 +2 +3 +4
//! ```
//!
//! Each window cell takes 2 bits: empty = 0, own = 1, opponent = 2, edge = 3.
//! The table entry rates the line the mover would build by playing `pt` and
//! the line the opponent would build there, so both attacking and blocking
//! moves score high.
//!
//! [`LinePatternScorer`] turns these into per-cell logits usable by
//! [`LearnedSoftmax`](crate::policy::LearnedSoftmax).

use std::sync::OnceLock;

use crate::board::{Point, center, index_of, on_board, point_of};
use crate::constants::{BOARDSIZE, DIRECTIONS, N, WIN_LENGTH};
use crate::policy::MoveScorer;

const EMPTY: u8 = 0;
const OWN: u8 = 1;
const OPPONENT: u8 = 2;
const EDGE: u8 = 3;

/// Cells inspected on each side of the scored point.
const REACH: usize = WIN_LENGTH - 1;

/// Number of distinct window codes.
const N_CODES: usize = 1 << (4 * REACH);

/// Logit contribution of a line of the given length and number of open ends.
fn line_weight(len: usize, open_ends: usize) -> f32 {
    match (len, open_ends) {
        (l, _) if l >= WIN_LENGTH => 12.0,
        (4, 2) => 8.0,
        (4, 1) => 5.0,
        (3, 2) => 4.0,
        (3, 1) => 2.0,
        (2, 2) => 1.5,
        (2, 1) => 0.5,
        _ => 0.0,
    }
}

/// Weight of blocking the opponent relative to extending own lines.
const DEFENSE_WEIGHT: f32 = 0.9;

/// Logit penalty per step of Chebyshev distance from the center.
const CENTER_BIAS: f32 = 0.05;

/// Window table: code -> (own score, opponent score).
static LINE_TABLE: OnceLock<Vec<(f32, f32)>> = OnceLock::new();

/// Build the table eagerly. Called on first use otherwise.
pub fn init_patterns() {
    LINE_TABLE.get_or_init(make_line_table);
}

fn make_line_table() -> Vec<(f32, f32)> {
    (0..N_CODES)
        .map(|code| {
            let window = decode(code as u32);
            (rate_window(&window, OWN), rate_window(&window, OPPONENT))
        })
        .collect()
}

/// Unpack a code into the window, nearest-left first on the left half.
///
/// Index `REACH - 1` is the cell just left of the point, index `REACH` the
/// cell just right of it.
fn decode(code: u32) -> [u8; 2 * REACH] {
    let mut window = [EMPTY; 2 * REACH];
    for (i, cell) in window.iter_mut().enumerate() {
        *cell = ((code >> (2 * i)) & 3) as u8;
    }
    window
}

/// Rate the line `stone` would form by playing the center of `window`.
fn rate_window(window: &[u8; 2 * REACH], stone: u8) -> f32 {
    let left = window[..REACH].iter().rev();
    let right = window[REACH..].iter();
    let (left_run, left_open) = run_and_open(left, stone);
    let (right_run, right_open) = run_and_open(right, stone);
    line_weight(
        1 + left_run + right_run,
        left_open as usize + right_open as usize,
    )
}

/// Count `stone` cells walking outward, and whether the run ends on an empty cell.
fn run_and_open<'a>(mut cells: impl Iterator<Item = &'a u8>, stone: u8) -> (usize, bool) {
    let mut run = 0;
    for &cell in cells.by_ref() {
        if cell == stone {
            run += 1;
        } else {
            return (run, cell == EMPTY);
        }
    }
    // Window exhausted: the line reaches past what the table distinguishes.
    (run, true)
}

/// Encode the window around `pt` along `(dr, dc)` on a perspective board.
fn window_code(board: &[f32], pt: Point, (dr, dc): (isize, isize)) -> usize {
    let offsets = (1..=REACH as isize)
        .rev()
        .map(|k| -k)
        .chain(1..=REACH as isize);

    let mut code = 0usize;
    for (i, k) in offsets.enumerate() {
        let r = pt.0 as isize + dr * k;
        let c = pt.1 as isize + dc * k;
        let cell = if r < 0 || c < 0 || !on_board((r as usize, c as usize)) {
            EDGE
        } else {
            match board[index_of((r as usize, c as usize))] {
                v if v > 0.0 => OWN,
                v if v < 0.0 => OPPONENT,
                _ => EMPTY,
            }
        };
        code |= (cell as usize) << (2 * i);
    }
    code
}

/// Heuristic move scorer over the mover's perspective board.
///
/// Occupied cells score 0; they are never candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinePatternScorer;

impl LinePatternScorer {
    pub fn new() -> Self {
        init_patterns();
        Self
    }

    /// Logit for a single empty cell.
    pub fn score_point(&self, board: &[f32], pt: Point) -> f32 {
        let table = LINE_TABLE.get_or_init(make_line_table);
        let (own, opponent) = DIRECTIONS
            .iter()
            .map(|&dir| table[window_code(board, pt, dir)])
            .fold((0.0, 0.0), |(a, b), (o, t)| (a + o, b + t));

        let (cr, cc) = center();
        let dist = pt.0.abs_diff(cr).max(pt.1.abs_diff(cc));
        own + DEFENSE_WEIGHT * opponent - CENTER_BIAS * dist as f32
    }
}

impl MoveScorer for LinePatternScorer {
    fn score(&self, board: &[f32]) -> Vec<f32> {
        debug_assert_eq!(board.len(), BOARDSIZE, "board must be {N}x{N}");
        (0..BOARDSIZE)
            .map(|idx| {
                if board.get(idx) == Some(&0.0) {
                    self.score_point(board, point_of(idx))
                } else {
                    0.0
                }
            })
            .collect()
    }
}
