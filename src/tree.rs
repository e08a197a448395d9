//! Search tree with arena allocation.
//!
//! Nodes live in a contiguous Vec and are referenced by [`NodeId`]. Parents
//! own their children through the `children` list; children point back with a
//! plain index used only for backpropagation.

use rand::Rng;

use crate::board::Point;
use crate::error::{Result, SearchError};
use crate::node::{Node, NodeId, SelectionParams};

/// Arena of nodes. The root is always `NodeId(0)`.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new_root()],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn allocate(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Install one child per `(move, prior)` entry under `id`.
    ///
    /// Children get the opposite turn sign of `id`. The priors are expected to
    /// have been validated already; an empty list is still rejected because it
    /// would leave the node unexpanded.
    pub fn expand(&mut self, id: NodeId, priors: &[(Point, f64)]) -> Result<()> {
        if self.get(id).is_expanded() {
            return Err(SearchError::AlreadyExpanded);
        }
        if priors.is_empty() {
            return Err(SearchError::EmptyPriors);
        }

        let turn_sign = -self.get(id).turn_sign;
        let children: Vec<(Point, NodeId)> = priors
            .iter()
            .map(|&(mv, prior)| (mv, self.allocate(Node::new(Some(id), turn_sign, prior))))
            .collect();
        self.get_mut(id).children = children;
        Ok(())
    }

    /// Child maximizing the stochastic selection score.
    ///
    /// Ties keep the first child in expansion order.
    pub fn select_by_score<R: Rng + ?Sized>(
        &self,
        id: NodeId,
        params: &SelectionParams,
        rng: &mut R,
    ) -> Result<(Point, NodeId)> {
        let mut best: Option<(f64, Point, NodeId)> = None;
        for &(mv, child) in &self.get(id).children {
            let score = self.get(child).selection_score(params, rng)?;
            if best.is_none_or(|(best_score, _, _)| score > best_score) {
                best = Some((score, mv, child));
            }
        }
        best.map(|(_, mv, child)| (mv, child))
            .ok_or(SearchError::NoChildren)
    }

    /// Child with the highest visit count, first child on ties.
    pub fn most_visited(&self, id: NodeId) -> Result<(Point, NodeId)> {
        let mut best: Option<(u32, Point, NodeId)> = None;
        for &(mv, child) in &self.get(id).children {
            let visits = self.get(child).visits;
            if best.is_none_or(|(best_visits, _, _)| visits > best_visits) {
                best = Some((visits, mv, child));
            }
        }
        best.map(|(_, mv, child)| (mv, child))
            .ok_or(SearchError::NoChildren)
    }

    /// Apply `leaf_value` to `leaf` and every ancestor up to the root.
    pub fn backpropagate(&mut self, leaf: NodeId, leaf_value: f64) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.update(leaf_value);
            current = node.parent;
        }
    }

    /// Copy the subtree under `id` into a fresh arena rooted at it.
    ///
    /// With `flip` set, values become `1 - Q` and turn signs are negated, which
    /// re-expresses the statistics for the opposite searching side.
    pub fn subtree(&self, id: NodeId, flip: bool) -> Tree {
        let mut out = Tree { nodes: Vec::new() };
        let mut root = self.get(id).clone();
        root.parent = None;
        root.children.clear();
        out.nodes.push(Self::reorient(root, flip));

        // (source id, destination id)
        let mut stack = vec![(id, NodeId(0))];
        while let Some((src, dst)) = stack.pop() {
            let mut children = Vec::with_capacity(self.get(src).children.len());
            for &(mv, src_child) in &self.get(src).children {
                let mut node = self.get(src_child).clone();
                node.parent = Some(dst);
                node.children.clear();
                let dst_child = out.allocate(Self::reorient(node, flip));
                children.push((mv, dst_child));
                stack.push((src_child, dst_child));
            }
            out.get_mut(dst).children = children;
        }
        out
    }

    fn reorient(mut node: Node, flip: bool) -> Node {
        if flip {
            node.value = 1.0 - node.value;
            node.turn_sign = -node.turn_sign;
        }
        node
    }

    /// Statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root());
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visits,
            root_value: root.value,
            max_depth: self.max_depth(),
        }
    }

    fn max_depth(&self) -> u32 {
        let mut deepest = 0;
        let mut stack = vec![(self.root(), 0u32)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            for &(_, child) in &self.get(id).children {
                stack.push((child, depth + 1));
            }
        }
        deepest
    }
}

/// Statistics about a search tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f64,
    pub max_depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn uniform(moves: &[Point]) -> Vec<(Point, f64)> {
        let p = 1.0 / moves.len() as f64;
        moves.iter().map(|&mv| (mv, p)).collect()
    }

    #[test]
    fn test_new_tree() {
        let tree = Tree::new();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), NodeId(0));
        assert!(tree.get(tree.root()).parent.is_none());
    }

    #[test]
    fn test_expand() {
        let mut tree = Tree::new();
        let root = tree.root();
        tree.expand(root, &[((0, 0), 0.25), ((0, 1), 0.75)]).unwrap();

        assert_eq!(tree.len(), 3);
        let children = tree.get(root).children.clone();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].0, (0, 0));
        assert_eq!(children[1].0, (0, 1));
        for &(_, child) in &children {
            let node = tree.get(child);
            assert_eq!(node.parent, Some(root));
            assert_eq!(node.turn_sign, 1);
            assert_eq!(node.visits, 0);
            assert!((node.value - 0.5).abs() < 1e-12);
        }
        assert!((tree.get(children[1].1).prior - 0.75).abs() < 1e-12);

        // Grandchildren flip back.
        let child = children[0].1;
        tree.expand(child, &uniform(&[(1, 1)])).unwrap();
        let (_, grandchild) = tree.get(child).children[0];
        assert_eq!(tree.get(grandchild).turn_sign, -1);
    }

    #[test]
    fn test_expand_twice_fails() {
        let mut tree = Tree::new();
        let root = tree.root();
        tree.expand(root, &uniform(&[(0, 0)])).unwrap();
        assert_eq!(
            tree.expand(root, &uniform(&[(0, 1)])),
            Err(SearchError::AlreadyExpanded)
        );
        assert_eq!(tree.get(root).children.len(), 1);
    }

    #[test]
    fn test_expand_empty_fails() {
        let mut tree = Tree::new();
        let root = tree.root();
        assert_eq!(tree.expand(root, &[]), Err(SearchError::EmptyPriors));
    }

    #[test]
    fn test_select_without_children() {
        let tree = Tree::new();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            tree.select_by_score(tree.root(), &SelectionParams::default(), &mut rng),
            Err(SearchError::NoChildren)
        );
        assert_eq!(tree.most_visited(tree.root()), Err(SearchError::NoChildren));
    }

    #[test]
    fn test_select_prefers_winning_child() {
        let mut tree = Tree::new();
        let root = tree.root();
        tree.expand(root, &uniform(&[(0, 0), (0, 1)])).unwrap();
        let good = tree.get(root).children[1].1;
        for _ in 0..200 {
            tree.backpropagate(good, 1.0);
        }
        let bad = tree.get(root).children[0].1;
        for _ in 0..200 {
            tree.backpropagate(bad, 0.0);
        }

        let mut rng = StdRng::seed_from_u64(11);
        let params = SelectionParams::default();
        for _ in 0..20 {
            let (mv, _) = tree.select_by_score(root, &params, &mut rng).unwrap();
            assert_eq!(mv, (0, 1));
        }
    }

    #[test]
    fn test_most_visited_tie_breaks_first() {
        let mut tree = Tree::new();
        let root = tree.root();
        tree.expand(root, &uniform(&[(2, 2), (3, 3), (4, 4)])).unwrap();
        let children = tree.get(root).children.clone();
        tree.get_mut(children[1].1).visits = 5;
        tree.get_mut(children[2].1).visits = 5;
        assert_eq!(tree.most_visited(root).unwrap().0, (3, 3));
    }

    #[test]
    fn test_backpropagate() {
        let mut tree = Tree::new();
        let root = tree.root();
        tree.expand(root, &uniform(&[(0, 0)])).unwrap();
        let child = tree.get(root).children[0].1;
        tree.expand(child, &uniform(&[(1, 1)])).unwrap();
        let grandchild = tree.get(child).children[0].1;

        tree.backpropagate(grandchild, 1.0);
        tree.backpropagate(child, 0.0);

        assert_eq!(tree.get(grandchild).visits, 1);
        assert_eq!(tree.get(child).visits, 2);
        assert_eq!(tree.get(root).visits, 2);
        assert!((tree.get(grandchild).value - 1.0).abs() < 1e-12);
        assert!((tree.get(child).value - 0.5).abs() < 1e-12);
        assert!((tree.get(root).value - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_subtree_flip() {
        let mut tree = Tree::new();
        let root = tree.root();
        tree.expand(root, &uniform(&[(0, 0), (0, 1)])).unwrap();
        let child = tree.get(root).children[0].1;
        tree.expand(child, &uniform(&[(1, 1), (1, 2)])).unwrap();
        let grandchild = tree.get(child).children[1].1;
        tree.backpropagate(grandchild, 1.0);

        let sub = tree.subtree(child, true);
        assert_eq!(sub.len(), 3);
        let new_root = sub.get(sub.root());
        assert!(new_root.parent.is_none());
        assert_eq!(new_root.turn_sign, -1);
        assert_eq!(new_root.visits, 1);
        assert!(new_root.value.abs() < 1e-12);

        let (mv, id) = new_root.children[1];
        assert_eq!(mv, (1, 2));
        assert_eq!(sub.get(id).turn_sign, 1);
        assert_eq!(sub.get(id).parent, Some(sub.root()));
        assert!(sub.get(id).value.abs() < 1e-12);
    }

    #[test]
    fn test_tree_stats() {
        let mut tree = Tree::new();
        let root = tree.root();
        tree.expand(root, &uniform(&[(0, 0)])).unwrap();
        let child = tree.get(root).children[0].1;
        tree.expand(child, &uniform(&[(1, 1)])).unwrap();

        let stats = tree.stats();
        assert_eq!(stats.total_nodes, 3);
        assert_eq!(stats.max_depth, 2);
    }
}
