//! Search-tree vertex statistics and the selection score.
//!
//! Each node stores the visit count, the running mean value and the prior of
//! the move leading to it. The mean value always measures the win probability
//! of the tree's searching side; `turn_sign` re-orients it for whoever moves.

use rand::Rng;
use rand_distr::{Beta, Distribution};

use crate::board::Point;
use crate::constants::{BETA_PSEUDO_COUNT, BETA_SCALE, BONUS_EXPONENT, INITIAL_VALUE};
use crate::error::{Result, SearchError};

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Constants of the selection score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionParams {
    /// `K`: weight of observed outcomes in the Beta posterior.
    pub beta_scale: f64,
    /// `N0`: pseudo-count added to both Beta parameters.
    pub beta_pseudo_count: f64,
    /// Exponent of the prior bonus.
    pub bonus_exponent: f64,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            beta_scale: BETA_SCALE,
            beta_pseudo_count: BETA_PSEUDO_COUNT,
            bonus_exponent: BONUS_EXPONENT,
        }
    }
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node, `None` for the root.
    pub parent: Option<NodeId>,
    /// Children in the order the expansion policy listed them.
    /// Empty until the node is expanded.
    pub children: Vec<(Point, NodeId)>,
    /// +1 when the searching side made the move into this node, -1 otherwise.
    pub turn_sign: i8,
    pub visits: u32,
    /// Running mean of backpropagated leaf values (Q).
    pub value: f64,
    /// Prior probability assigned by the expansion policy (p).
    pub prior: f64,
}

impl Node {
    /// The root sits before the searching side's first move.
    pub fn new_root() -> Self {
        Self::new(None, -1, INITIAL_VALUE)
    }

    pub fn new(parent: Option<NodeId>, turn_sign: i8, prior: f64) -> Self {
        Self {
            parent,
            children: Vec::new(),
            turn_sign,
            visits: 0,
            value: INITIAL_VALUE,
            prior,
        }
    }

    #[inline]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Fold one leaf value into the running mean.
    pub fn update(&mut self, leaf_value: f64) {
        self.visits += 1;
        self.value += (leaf_value - self.value) / self.visits as f64;
    }

    /// Thompson sample of the searching side's win probability.
    ///
    /// Draws from `Beta(K*Q*n + N0, K*(1-Q)*n + N0)`.
    pub fn action_value<R: Rng + ?Sized>(
        &self,
        params: &SelectionParams,
        rng: &mut R,
    ) -> Result<f64> {
        let n = self.visits as f64;
        let alpha = params.beta_scale * self.value * n + params.beta_pseudo_count;
        let beta = params.beta_scale * (1.0 - self.value) * n + params.beta_pseudo_count;
        let dist = Beta::new(alpha, beta)
            .map_err(|e| SearchError::Sampling(format!("Beta({alpha}, {beta}): {e}")))?;
        Ok(dist.sample(rng))
    }

    /// Prior-weighted exploration bonus `(p / (1 + n))^e`.
    pub fn bonus(&self, params: &SelectionParams) -> f64 {
        (self.prior / (1.0 + self.visits as f64)).powf(params.bonus_exponent)
    }

    /// Score maximized during descent: `-s + s * sample + bonus` with `s = turn_sign`.
    ///
    /// For `s = +1` this ranks by the sampled win probability, for `s = -1` by
    /// its complement, since the opponent is the one choosing.
    pub fn selection_score<R: Rng + ?Sized>(
        &self,
        params: &SelectionParams,
        rng: &mut R,
    ) -> Result<f64> {
        let sign = self.turn_sign as f64;
        Ok(-sign + sign * self.action_value(params, rng)? + self.bonus(params))
    }
}
