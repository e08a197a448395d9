//! Players: something that picks and plays a move for a side.

use log::info;

use crate::board::{Point, Side};
use crate::error::{Result, SearchError};
use crate::evaluator::LeafEvaluator;
use crate::game::{Game, str_coord};
use crate::mcts::{SearchConfig, SearchTree, TrainingSample};
use crate::policy::{ExpansionPolicy, valid_moves};

pub trait Player {
    /// Choose a move for `side`, play it on `game` and return it.
    fn play(&mut self, game: &mut Game, side: Side) -> Result<Point>;
}

/// Plays a uniformly random empty cell.
#[derive(Debug, Clone)]
pub struct RandomPlayer {
    rng: fastrand::Rng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn play(&mut self, game: &mut Game, side: Side) -> Result<Point> {
        if game.is_over() {
            return Err(SearchError::GameOver);
        }
        let moves = valid_moves(game.board());
        let mv = moves[self.rng.usize(..moves.len())];
        game.play(mv, side)?;
        Ok(mv)
    }
}

/// Runs a fresh search per decision and plays the most visited move.
///
/// `P` and `E` are cloned into each new tree.
pub struct MctsPlayer<P, E> {
    pub playouts: usize,
    pub config: SearchConfig,
    policy: P,
    evaluator: E,
    record: bool,
    samples: Vec<TrainingSample>,
    last_winrate: Option<f64>,
    decisions: u64,
}

impl<P, E> MctsPlayer<P, E>
where
    P: ExpansionPolicy + Clone,
    E: LeafEvaluator + Clone,
{
    pub fn new(playouts: usize, config: SearchConfig, policy: P, evaluator: E) -> Self {
        Self {
            playouts,
            config,
            policy,
            evaluator,
            record: false,
            samples: Vec::new(),
            last_winrate: None,
            decisions: 0,
        }
    }

    /// Keep a [`TrainingSample`] for every decision.
    pub fn recording(mut self, record: bool) -> Self {
        self.record = record;
        self
    }

    pub fn samples(&self) -> &[TrainingSample] {
        &self.samples
    }

    pub fn take_samples(&mut self) -> Vec<TrainingSample> {
        std::mem::take(&mut self.samples)
    }

    /// Root value of the last search: the engine's estimated win probability.
    pub fn last_winrate(&self) -> Option<f64> {
        self.last_winrate
    }

    /// Search `game` for `side` without playing the result.
    pub fn search(&mut self, game: &Game, side: Side) -> Result<SearchTree<P, E>> {
        // Vary the seed per decision so successive searches are not replays.
        let config = self
            .config
            .clone()
            .with_seed(self.config.seed.wrapping_add(self.decisions));
        self.decisions += 1;

        let mut tree = SearchTree::new(
            game,
            side,
            config,
            self.policy.clone(),
            self.evaluator.clone(),
        )?;
        tree.playout(self.playouts)?;
        Ok(tree)
    }
}

impl<P, E> Player for MctsPlayer<P, E>
where
    P: ExpansionPolicy + Clone,
    E: LeafEvaluator + Clone,
{
    fn play(&mut self, game: &mut Game, side: Side) -> Result<Point> {
        if game.is_over() {
            return Err(SearchError::GameOver);
        }
        let tree = self.search(game, side)?;
        let mv = tree.final_move()?;
        tree.dump_children();
        info!(
            "{side} plays {} after {} playouts (winrate {:.1}%)",
            str_coord(mv),
            tree.root_visits(),
            tree.root_value() * 100.0
        );

        self.last_winrate = Some(tree.root_value());
        if self.record {
            self.samples.push(tree.training_sample());
        }
        game.play(mv, side)?;
        Ok(mv)
    }
}

/// Play a full game between two players, Black first.
pub fn play_game(black: &mut dyn Player, white: &mut dyn Player, game: &mut Game) -> Result<()> {
    let mut side = game.next_side();
    while !game.is_over() {
        match side {
            Side::Black => black.play(game, side)?,
            Side::White => white.play(game, side)?,
        };
        side = side.opponent();
    }
    Ok(())
}
