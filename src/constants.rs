//! Constants for board dimensions and search parameters.
//!
//! The board is a dense `N x N` grid addressed by `(row, col)` pairs, with row 0
//! at the top. A line of [`WIN_LENGTH`] same-colored stones along a row, column
//! or diagonal wins.
//!
//! # Board Size Configuration
//!
//! The board size is controlled by Cargo features:
//! - `board15x15` (default): 15x15 board
//! - `board19x19`: 19x19 board
//!
//! ```sh
//! cargo build                                              # 15x15 (default)
//! cargo build --no-default-features --features board19x19  # 19x19
//! ```

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN).
#[cfg(feature = "board15x15")]
pub const N: usize = 15;

#[cfg(feature = "board19x19")]
pub const N: usize = 19;

// Compile-time check: exactly one board size feature must be enabled
#[cfg(all(feature = "board15x15", feature = "board19x19"))]
compile_error!("Cannot enable both 'board15x15' and 'board19x19' features at the same time");

#[cfg(not(any(feature = "board15x15", feature = "board19x19")))]
compile_error!("Must enable exactly one board size feature: 'board15x15' or 'board19x19'");

/// Total number of cells.
pub const BOARDSIZE: usize = N * N;

/// Number of same-colored stones in a line needed to win.
pub const WIN_LENGTH: usize = 5;

/// Line directions as (row, col) steps: horizontal, vertical, diagonal, anti-diagonal.
pub const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Default number of playouts per move decision.
pub const N_PLAYOUTS: usize = 1000;

/// Default ply limit after which a leaf is evaluated heuristically.
pub const MAX_DEPTH: usize = 20;

/// Mean value given to a freshly created node (uninformative prior).
pub const INITIAL_VALUE: f64 = 0.5;

/// Leaf value backpropagated for a full-board draw.
pub const DRAW_VALUE: f64 = 0.5;

/// Scale `K` applied to the win/loss counts of the Beta posterior.
pub const BETA_SCALE: f64 = 100.0;

/// Pseudo-count `N0` added to both Beta parameters.
pub const BETA_PSEUDO_COUNT: f64 = 100.0;

/// Exponent of the prior-weighted exploration bonus `(p / (1 + n))^e`.
pub const BONUS_EXPONENT: f64 = 1.0 / 3.0;

/// Default seed for the search random source.
pub const DEFAULT_SEED: u64 = 0x5eed;

// =============================================================================
// Policy / Evaluator Defaults
// =============================================================================

/// Chebyshev distance from existing stones within which candidates are generated.
pub const LOCALITY_DISTANCE: usize = 1;

/// Standard deviation of the noisy-neutral leaf evaluator.
pub const NOISE_LEVEL: f64 = 0.01;

/// Winrate below which the text frontend reports the engine as losing.
pub const RESIGN_THRES: f64 = 0.05;
