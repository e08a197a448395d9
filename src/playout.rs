//! Random playouts (uniform game simulation).
//!
//! A playout fills the board with uniformly random moves, alternating sides,
//! until the game is decided. It is available as a [`LeafEvaluator`] for
//! searches that prefer a sampled outcome over a neutral leaf value.

use crate::board::Side;
use crate::constants::DRAW_VALUE;
use crate::evaluator::LeafEvaluator;
use crate::game::{Game, Outcome};

/// Leaf value of a finished game from `searcher`'s point of view.
pub fn outcome_value(outcome: Outcome, searcher: Side) -> f64 {
    match outcome {
        Outcome::Winner(side) if side == searcher => 1.0,
        Outcome::Winner(_) => 0.0,
        Outcome::Draw => DRAW_VALUE,
    }
}

/// Play random moves from `game` with `to_move` first until it ends.
///
/// Returns the outcome, or `None` if `game` was already over.
pub fn random_playout(
    game: &mut Game,
    mut to_move: Side,
    rng: &mut fastrand::Rng,
) -> Option<Outcome> {
    if game.is_over() {
        return None;
    }
    let mut moves: Vec<_> = game.board().empty_points().collect();
    rng.shuffle(&mut moves);

    for pt in moves {
        // Points are distinct and were empty, and the loop stops at the outcome.
        if game.play(pt, to_move).is_err() {
            break;
        }
        if let Some(outcome) = game.outcome() {
            return Some(outcome);
        }
        to_move = to_move.opponent();
    }
    game.outcome()
}

/// Averages `rollouts` random playouts per leaf.
#[derive(Debug, Clone)]
pub struct RandomRollout {
    rollouts: usize,
    rng: fastrand::Rng,
}

impl RandomRollout {
    pub fn new(rollouts: usize, seed: u64) -> Self {
        Self {
            rollouts: rollouts.max(1),
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl LeafEvaluator for RandomRollout {
    fn evaluate(&mut self, game: &Game, to_move: Side, searcher: Side) -> f64 {
        let mut total = 0.0;
        for _ in 0..self.rollouts {
            let mut scratch = game.clone();
            total += random_playout(&mut scratch, to_move, &mut self.rng)
                .map(|outcome| outcome_value(outcome, searcher))
                .unwrap_or(DRAW_VALUE);
        }
        total / self.rollouts as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_value() {
        assert_eq!(outcome_value(Outcome::Winner(Side::Black), Side::Black), 1.0);
        assert_eq!(outcome_value(Outcome::Winner(Side::White), Side::Black), 0.0);
        assert_eq!(outcome_value(Outcome::Draw, Side::White), 0.5);
    }

    #[test]
    fn test_random_playout_finishes() {
        let mut rng = fastrand::Rng::with_seed(5);
        let mut game = Game::new();
        let outcome = random_playout(&mut game, Side::Black, &mut rng);
        assert!(outcome.is_some());
        assert_eq!(game.outcome(), outcome);

        // Already decided.
        assert_eq!(random_playout(&mut game, Side::Black, &mut rng), None);
    }

    #[test]
    fn test_random_playout_alternates() {
        let mut rng = fastrand::Rng::with_seed(9);
        let mut game = Game::new();
        random_playout(&mut game, Side::White, &mut rng);
        for (i, &(_, side)) in game.history().iter().enumerate() {
            let expected = if i % 2 == 0 { Side::White } else { Side::Black };
            assert_eq!(side, expected);
        }
    }

    #[test]
    fn test_rollout_sees_immediate_win() {
        // Open four: Black wins unless White fills both ends first.
        let mut game = Game::new();
        for col in 3..7 {
            game.play((7, col), Side::Black).unwrap();
        }
        let mut eval = RandomRollout::new(200, 3);
        let value = eval.evaluate(&game, Side::Black, Side::Black);
        assert!(value > 0.5, "value {value}");
        let mut eval = RandomRollout::new(200, 3);
        let flipped = eval.evaluate(&game, Side::Black, Side::White);
        assert!((value + flipped - 1.0).abs() < 1e-9);
    }
}
