//! Error kinds raised by the search.
//!
//! None of these are transient: each one points at a caller bug or at an
//! expansion policy producing output the search cannot use.

use thiserror::Error;

use crate::board::Point;
use crate::game::PlayError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("cannot select from a node without children")]
    NoChildren,

    #[error("node is already expanded")]
    AlreadyExpanded,

    #[error("cannot search a position that is already decided")]
    GameOver,

    #[error("expansion policy returned no candidate moves")]
    EmptyPriors,

    #[error("expansion policy returned invalid prior {prior} for {point:?}")]
    InvalidPrior { point: Point, prior: f64 },

    #[error("expansion policy returned {0:?} more than once")]
    DuplicateMove(Point),

    #[error("move scorer returned {got} scores, expected {expected}")]
    ScoreShape { expected: usize, got: usize },

    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),

    #[error("sampling failed: {0}")]
    Sampling(String),

    #[error(transparent)]
    Play(#[from] PlayError),
}

pub type Result<T> = std::result::Result<T, SearchError>;
