//! Monte Carlo Tree Search driver.
//!
//! A [`SearchTree`] is built once per move decision from a snapshot of the
//! game. Each playout:
//! - copies the snapshot into a scratch game
//! - descends from the root, expanding first-visited nodes with the
//!   [`ExpansionPolicy`] and choosing children by the Thompson-sampled score
//! - stops at a decided game or at `max_depth` plies, where the
//!   [`LeafEvaluator`] supplies the value
//! - backpropagates the leaf value from the reached node up to the root
//!
//! Every node value is the win probability of the tree's fixed `side`.

use log::{debug, trace};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::board::{Point, Side, index_of};
use crate::constants::{BOARDSIZE, DEFAULT_SEED, MAX_DEPTH};
use crate::error::{Result, SearchError};
use crate::evaluator::LeafEvaluator;
use crate::game::{Game, str_coord};
use crate::node::{Node, SelectionParams};
use crate::playout::outcome_value;
use crate::policy::{ExpansionPolicy, validate_priors};
use crate::tree::{Tree, TreeStats};

/// Configuration for one search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Plies after which a non-terminal leaf is handed to the evaluator.
    pub max_depth: usize,
    /// Constants of the selection score.
    pub selection: SelectionParams,
    /// Seed for Beta sampling.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            selection: SelectionParams::default(),
            seed: DEFAULT_SEED,
        }
    }
}

impl SearchConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_selection(mut self, selection: SelectionParams) -> Self {
        self.selection = selection;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.selection;
        if self.max_depth == 0 {
            return Err(SearchError::InvalidConfig("max_depth must be at least 1".into()));
        }
        if !(s.beta_pseudo_count.is_finite() && s.beta_pseudo_count > 0.0) {
            return Err(SearchError::InvalidConfig(format!(
                "beta_pseudo_count must be positive, got {}",
                s.beta_pseudo_count
            )));
        }
        if !(s.beta_scale.is_finite() && s.beta_scale >= 0.0) {
            return Err(SearchError::InvalidConfig(format!(
                "beta_scale must be non-negative, got {}",
                s.beta_scale
            )));
        }
        if !(s.bonus_exponent.is_finite() && s.bonus_exponent > 0.0) {
            return Err(SearchError::InvalidConfig(format!(
                "bonus_exponent must be positive, got {}",
                s.bonus_exponent
            )));
        }
        Ok(())
    }
}

/// Search tree over a private copy of the game.
pub struct SearchTree<P, E> {
    tree: Tree,
    game: Game,
    side: Side,
    config: SearchConfig,
    policy: P,
    evaluator: E,
    rng: StdRng,
}

impl<P: ExpansionPolicy, E: LeafEvaluator> SearchTree<P, E> {
    /// Build a tree searching for `side` from a copy of `game`.
    pub fn new(
        game: &Game,
        side: Side,
        config: SearchConfig,
        policy: P,
        evaluator: E,
    ) -> Result<Self> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            tree: Tree::new(),
            game: game.clone(),
            side,
            config,
            policy,
            evaluator,
            rng,
        })
    }

    /// The side whose win probability the tree tracks.
    pub fn side(&self) -> Side {
        self.side
    }

    /// The position at the root.
    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn root(&self) -> &Node {
        self.tree.get(self.tree.root())
    }

    pub fn root_visits(&self) -> u32 {
        self.root().visits
    }

    pub fn root_value(&self) -> f64 {
        self.root().value
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Child statistics of the root: `(move, node)` in expansion order.
    pub fn root_children(&self) -> impl Iterator<Item = (Point, &Node)> + '_ {
        self.root()
            .children
            .iter()
            .map(|&(mv, id)| (mv, self.tree.get(id)))
    }

    /// Run a single descent and backpropagation. Returns the leaf value.
    ///
    /// # Errors
    /// [`SearchError::GameOver`] if the root position is already decided, or
    /// any error raised by the expansion policy or selection.
    pub fn one_playout(&mut self) -> Result<f64> {
        if self.game.is_over() {
            return Err(SearchError::GameOver);
        }

        let mut scratch = self.game.clone();
        let mut node = self.tree.root();
        let mut to_move = self.side;
        let mut depth = 0;

        let leaf_value = loop {
            depth += 1;
            if !self.tree.get(node).is_expanded() {
                let priors = self.policy.expand(&scratch, to_move)?;
                validate_priors(&priors)?;
                self.tree.expand(node, &priors)?;
            }

            let (mv, child) = self
                .tree
                .select_by_score(node, &self.config.selection, &mut self.rng)?;
            scratch.play(mv, to_move)?;
            node = child;

            if let Some(outcome) = scratch.outcome() {
                trace!("playout ended at depth {depth}: {outcome:?}");
                break outcome_value(outcome, self.side);
            }
            if depth == self.config.max_depth {
                break self
                    .evaluator
                    .evaluate(&scratch, to_move.opponent(), self.side);
            }
            to_move = to_move.opponent();
        };

        self.tree.backpropagate(node, leaf_value);
        Ok(leaf_value)
    }

    /// Run `n` playouts sequentially into the same tree.
    pub fn playout(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.one_playout()?;
        }
        debug!(
            "{n} playouts for {}: root visits {}, winrate {:.3}, {} nodes",
            self.side,
            self.root_visits(),
            self.root_value(),
            self.tree.len()
        );
        Ok(())
    }

    /// The most-visited root child.
    pub fn final_move(&self) -> Result<Point> {
        self.tree.most_visited(self.tree.root()).map(|(mv, _)| mv)
    }

    /// `visits / root visits` for every root child; empty before any playout.
    pub fn visit_distribution(&self) -> Vec<(Point, f64)> {
        let total = self.root_visits();
        if total == 0 {
            return Vec::new();
        }
        self.root_children()
            .map(|(mv, node)| (mv, node.visits as f64 / total as f64))
            .collect()
    }

    /// Visit distribution laid out as a row-major `N x N` grid.
    pub fn visit_matrix(&self) -> Vec<f64> {
        let mut matrix = vec![0.0; BOARDSIZE];
        for (mv, p) in self.visit_distribution() {
            matrix[index_of(mv)] = p;
        }
        matrix
    }

    /// Training pair: root board from `side`'s perspective and the visit matrix.
    pub fn training_sample(&self) -> TrainingSample {
        TrainingSample {
            board: self.game.board().perspective(self.side),
            visits: self.visit_matrix(),
        }
    }

    pub fn stats(&self) -> TreeStats {
        self.tree.stats()
    }

    /// Commit `mv` for `side` and re-root the tree on the resulting child.
    ///
    /// The tree then searches for the opponent. Statistics gathered under the
    /// played child are kept, re-expressed from the opponent's perspective.
    pub fn advance(&mut self, mv: Point) -> Result<()> {
        self.game.play(mv, self.side)?;
        let child = self
            .root()
            .children
            .iter()
            .find(|&&(m, _)| m == mv)
            .map(|&(_, id)| id);

        self.tree = match child {
            Some(id) => self.tree.subtree(id, true),
            None => Tree::new(),
        };
        self.side = self.side.opponent();
        Ok(())
    }

    /// Log the root children, most visited first.
    pub fn dump_children(&self) {
        let mut children: Vec<(Point, &Node)> = self.root_children().collect();
        children.sort_by(|a, b| b.1.visits.cmp(&a.1.visits));
        for (mv, node) in children.into_iter().filter(|(_, n)| n.visits > 0) {
            debug!(
                "move {} n={} q={:.3} p={:.3}",
                str_coord(mv),
                node.visits,
                node.value,
                node.prior
            );
        }
    }
}

/// Supervised target for a move-prior estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    /// Row-major board, own stones +1, opponent -1.
    pub board: Vec<f32>,
    /// Row-major visit fractions at the root.
    pub visits: Vec<f64>,
}
