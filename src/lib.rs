//! gomoku-mcts: a Monte Carlo Tree Search engine for five-in-a-row.
//!
//! Two players alternately place stones on a fixed `N x N` grid (15x15 by
//! default); the first to line up five wins. The search keeps every node's
//! value as the win probability of one fixed side, selects children by a
//! Beta-posterior Thompson sample plus a prior bonus, and stops each descent
//! at a decided game or a depth limit.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions and engine parameters
//! - [`board`] - Grid, sides and five-in-a-row detection
//! - [`game`] - Game state, outcome and coordinates
//! - [`node`], [`tree`] - Node statistics and the node arena
//! - [`policy`] - Expansion policies (candidate moves with priors)
//! - [`evaluator`] - Leaf evaluators for the depth limit
//! - [`playout`] - Random playouts, usable as a leaf evaluator
//! - [`patterns`] - Line-pattern move scorer
//! - [`mcts`] - The search itself
//! - [`player`] - Random and MCTS players
//! - [`gtp`] - Text protocol front end
//!
//! ## Example
//!
//! ```
//! use gomoku_mcts::board::{Side, center};
//! use gomoku_mcts::evaluator::ConstantNeutral;
//! use gomoku_mcts::game::{Game, str_coord};
//! use gomoku_mcts::mcts::{SearchConfig, SearchTree};
//! use gomoku_mcts::policy::LocalityUniform;
//!
//! let game = Game::new();
//! let mut tree = SearchTree::new(
//!     &game,
//!     Side::Black,
//!     SearchConfig::default(),
//!     LocalityUniform::default(),
//!     ConstantNeutral,
//! )
//! .unwrap();
//! tree.playout(100).unwrap();
//!
//! let best = tree.final_move().unwrap();
//! assert_eq!(best, center());
//! println!("Best move: {}", str_coord(best));
//! ```

pub mod board;
pub mod constants;
pub mod error;
pub mod evaluator;
pub mod game;
pub mod gtp;
pub mod mcts;
pub mod node;
pub mod patterns;
pub mod player;
pub mod playout;
pub mod policy;
pub mod tree;
