//! Leaf evaluators for positions reached at the depth limit.
//!
//! An evaluator returns an estimate in [0, 1] of the probability that the
//! tree's searching side eventually wins. It is only consulted for
//! non-terminal positions.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::board::Side;
use crate::error::{Result, SearchError};
use crate::game::Game;

pub trait LeafEvaluator {
    /// Win probability of `searcher` in `game`, with `to_move` next to play.
    fn evaluate(&mut self, game: &Game, to_move: Side, searcher: Side) -> f64;
}

impl<E: LeafEvaluator + ?Sized> LeafEvaluator for &mut E {
    fn evaluate(&mut self, game: &Game, to_move: Side, searcher: Side) -> f64 {
        (**self).evaluate(game, to_move, searcher)
    }
}

impl<E: LeafEvaluator + ?Sized> LeafEvaluator for Box<E> {
    fn evaluate(&mut self, game: &Game, to_move: Side, searcher: Side) -> f64 {
        (**self).evaluate(game, to_move, searcher)
    }
}

/// Always 0.5: leaves carry no value signal, priors do the work.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantNeutral;

impl LeafEvaluator for ConstantNeutral {
    fn evaluate(&mut self, _game: &Game, _to_move: Side, _searcher: Side) -> f64 {
        0.5
    }
}

/// `0.5 + N(0, noise_level)`, not clamped.
///
/// Breaks ties between otherwise indistinguishable leaves when the expansion
/// policy is uninformative.
#[derive(Debug, Clone)]
pub struct NoisyNeutral {
    noise: Normal<f64>,
    rng: StdRng,
}

impl NoisyNeutral {
    pub fn new(noise_level: f64, seed: u64) -> Result<Self> {
        let noise = Normal::new(0.0, noise_level)
            .map_err(|e| SearchError::InvalidConfig(format!("noise level {noise_level}: {e}")))?;
        Ok(Self {
            noise,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn noise_level(&self) -> f64 {
        self.noise.std_dev()
    }
}

impl LeafEvaluator for NoisyNeutral {
    fn evaluate(&mut self, _game: &Game, _to_move: Side, _searcher: Side) -> f64 {
        0.5 + self.noise.sample(&mut self.rng)
    }
}
