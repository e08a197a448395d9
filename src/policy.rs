//! Expansion policies: candidate moves and their prior probabilities.
//!
//! A policy is consulted once per node, the first time a descent reaches it.
//! Two policies are provided:
//! - [`LocalityUniform`]: equal weight on every empty cell near existing stones
//! - [`LearnedSoftmax`]: softmax over per-cell scores from a [`MoveScorer`]

use log::warn;

use crate::board::{Board, Point, Side, center, index_of, on_board};
use crate::constants::{BOARDSIZE, LOCALITY_DISTANCE};
use crate::error::{Result, SearchError};
use crate::game::{Game, PlayError};

/// Candidate moves paired with prior probabilities, in ranking order.
pub type Priors = Vec<(Point, f64)>;

/// Produces move priors for a position.
///
/// Priors must be finite and non-negative; they need not sum to one.
pub trait ExpansionPolicy {
    fn expand(&self, game: &Game, side: Side) -> Result<Priors>;
}

impl<P: ExpansionPolicy + ?Sized> ExpansionPolicy for &P {
    fn expand(&self, game: &Game, side: Side) -> Result<Priors> {
        (**self).expand(game, side)
    }
}

impl<P: ExpansionPolicy + ?Sized> ExpansionPolicy for Box<P> {
    fn expand(&self, game: &Game, side: Side) -> Result<Priors> {
        (**self).expand(game, side)
    }
}

/// Opaque scoring function: board from the mover's perspective
/// (own = +1, opponent = -1, empty = 0, row-major) to one score per cell.
pub trait MoveScorer {
    fn score(&self, board: &[f32]) -> Vec<f32>;
}

impl<F> MoveScorer for F
where
    F: Fn(&[f32]) -> Vec<f32>,
{
    fn score(&self, board: &[f32]) -> Vec<f32> {
        self(board)
    }
}

/// All empty cells in row-major order.
pub fn valid_moves(board: &Board) -> Vec<Point> {
    board.empty_points().collect()
}

/// Empty cells within Chebyshev distance `dist` of any stone.
///
/// On an empty board the only candidate is the center cell.
pub fn nearby_moves(board: &Board, dist: usize) -> Vec<Point> {
    if board.stone_count() == 0 {
        return vec![center()];
    }
    let anchors: Vec<Point> = board.occupied_points().collect();
    board
        .empty_points()
        .filter(|&(row, col)| {
            anchors
                .iter()
                .any(|&(r, c)| row.abs_diff(r) <= dist && col.abs_diff(c) <= dist)
        })
        .collect()
}

/// Reject priors the selection score cannot work with.
pub fn validate_priors(priors: &[(Point, f64)]) -> Result<()> {
    if priors.is_empty() {
        return Err(SearchError::EmptyPriors);
    }
    let mut seen = [false; BOARDSIZE];
    for &(point, prior) in priors {
        if !prior.is_finite() || prior < 0.0 {
            warn!("rejecting prior {prior} for {point:?}");
            return Err(SearchError::InvalidPrior { point, prior });
        }
        if !on_board(point) {
            return Err(PlayError::OutOfBounds.into());
        }
        let idx = index_of(point);
        if seen[idx] {
            return Err(SearchError::DuplicateMove(point));
        }
        seen[idx] = true;
    }
    Ok(())
}

/// Uniform priors over empty cells near existing stones.
#[derive(Debug, Clone)]
pub struct LocalityUniform {
    pub distance: usize,
}

impl Default for LocalityUniform {
    fn default() -> Self {
        Self {
            distance: LOCALITY_DISTANCE,
        }
    }
}

impl LocalityUniform {
    pub fn new(distance: usize) -> Self {
        Self { distance }
    }
}

impl ExpansionPolicy for LocalityUniform {
    fn expand(&self, game: &Game, _side: Side) -> Result<Priors> {
        let moves = nearby_moves(game.board(), self.distance);
        if moves.is_empty() {
            return Err(SearchError::EmptyPriors);
        }
        let p = 1.0 / moves.len() as f64;
        Ok(moves.into_iter().map(|mv| (mv, p)).collect())
    }
}

/// Softmax over scorer output restricted to empty cells.
#[derive(Debug, Clone)]
pub struct LearnedSoftmax<S> {
    scorer: S,
}

impl<S: MoveScorer> LearnedSoftmax<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }
}

impl<S: MoveScorer> ExpansionPolicy for LearnedSoftmax<S> {
    fn expand(&self, game: &Game, side: Side) -> Result<Priors> {
        let board = game.board();
        let scores = self.scorer.score(&board.perspective(side));
        if scores.len() != BOARDSIZE {
            return Err(SearchError::ScoreShape {
                expected: BOARDSIZE,
                got: scores.len(),
            });
        }

        let moves = valid_moves(board);
        if moves.is_empty() {
            return Err(SearchError::EmptyPriors);
        }
        let logits: Vec<f64> = moves.iter().map(|&mv| scores[index_of(mv)] as f64).collect();
        if let Some(pos) = logits.iter().position(|l| !l.is_finite()) {
            return Err(SearchError::InvalidPrior {
                point: moves[pos],
                prior: logits[pos],
            });
        }

        Ok(moves.into_iter().zip(softmax(&logits)).collect())
    }
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::N;

    #[test]
    fn test_locality_empty_board_is_center() {
        let game = Game::new();
        let priors = LocalityUniform::new(1).expand(&game, Side::Black).unwrap();
        assert_eq!(priors, vec![(center(), 1.0)]);

        // The distance only widens the ring once stones exist.
        let wide = LocalityUniform::new(3).expand(&game, Side::White).unwrap();
        assert_eq!(wide, vec![(center(), 1.0)]);
        assert_eq!(nearby_moves(game.board(), 0), vec![center()]);
    }

    #[test]
    fn test_locality_ring() {
        let mut game = Game::new();
        game.play(center(), Side::Black).unwrap();
        let priors = LocalityUniform::new(1).expand(&game, Side::White).unwrap();
        assert_eq!(priors.len(), 8);
        for &(mv, p) in &priors {
            assert!((p - 0.125).abs() < 1e-12);
            assert_ne!(mv, center());
        }

        let wide = LocalityUniform::new(2).expand(&game, Side::White).unwrap();
        assert_eq!(wide.len(), 24);
    }

    #[test]
    fn test_locality_corner() {
        let mut game = Game::new();
        game.play((0, 0), Side::Black).unwrap();
        let moves = nearby_moves(game.board(), 1);
        assert_eq!(moves, vec![(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0, 1000.0]);
        let total: f64 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(probs[3] > 0.99);
    }

    #[test]
    fn test_learned_softmax_uses_perspective() {
        // Score each empty cell by the value of its left neighbour.
        let scorer = |board: &[f32]| -> Vec<f32> {
            (0..board.len())
                .map(|i| if i % N > 0 { 10.0 * board[i - 1] } else { 0.0 })
                .collect()
        };
        let policy = LearnedSoftmax::new(scorer);
        let mut game = Game::new();
        game.play((3, 3), Side::Black).unwrap();

        let black = policy.expand(&game, Side::Black).unwrap();
        let best = black
            .iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
            .unwrap();
        assert_eq!(best.0, (3, 4));
        assert_eq!(black.len(), BOARDSIZE - 1);
        let total: f64 = black.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);

        let white = policy.expand(&game, Side::White).unwrap();
        let worst = white
            .iter()
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
            .unwrap();
        assert_eq!(worst.0, (3, 4));
    }

    #[test]
    fn test_learned_softmax_rejects_bad_scores() {
        let short = LearnedSoftmax::new(|_: &[f32]| vec![0.0f32; 3]);
        assert_eq!(
            short.expand(&Game::new(), Side::Black),
            Err(SearchError::ScoreShape {
                expected: BOARDSIZE,
                got: 3
            })
        );

        let nan = LearnedSoftmax::new(|_: &[f32]| vec![f32::NAN; BOARDSIZE]);
        assert!(matches!(
            nan.expand(&Game::new(), Side::Black),
            Err(SearchError::InvalidPrior { .. })
        ));
    }

    #[test]
    fn test_validate_priors() {
        assert_eq!(validate_priors(&[]), Err(SearchError::EmptyPriors));
        assert!(validate_priors(&[((0, 0), 0.0), ((0, 1), 2.0)]).is_ok());
        assert!(matches!(
            validate_priors(&[((0, 0), -0.1)]),
            Err(SearchError::InvalidPrior { .. })
        ));
        assert!(matches!(
            validate_priors(&[((0, 0), f64::NAN)]),
            Err(SearchError::InvalidPrior { .. })
        ));
        assert_eq!(
            validate_priors(&[((0, 0), 0.5), ((0, 0), 0.5)]),
            Err(SearchError::DuplicateMove((0, 0)))
        );
    }
}
