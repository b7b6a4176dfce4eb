//! MCTS tree structure with arena allocation.
//!
//! Nodes are stored in a contiguous Vec and referenced by NodeId indices.
//! Every child is owned by exactly one parent; there are no cross-links.

use crate::node::{MctsNode, NodeId};
use engine_core::{ActionId, Position};
use std::cmp::Ordering;

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree {
    /// Arena storing all nodes
    nodes: Vec<MctsNode>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl MctsTree {
    /// Create a new tree rooted at `position` with its legal actions.
    pub fn new(position: Position, legal: Vec<ActionId>) -> Self {
        Self {
            nodes: vec![MctsNode::new_root(position, legal)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    pub fn allocate(&mut self, node: MctsNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Select the child of a node with the highest UCT score.
    /// Ties go to the earliest expanded child.
    pub fn select_child(&self, node_id: NodeId, exploration: f32) -> Option<NodeId> {
        let node = self.get(node_id);
        let parent_visits_ln = (node.visit_count.max(1) as f32).ln();

        let mut best: Option<(f32, NodeId)> = None;
        for &(_, id) in &node.children {
            let score = self.get(id).uct_score(parent_visits_ln, exploration);
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, id));
            }
        }
        best.map(|(_, id)| id)
    }

    /// Add a child to a parent node.
    /// Returns the new child's NodeId.
    pub fn add_child(
        &mut self,
        parent_id: NodeId,
        action: ActionId,
        position: Position,
        terminal: Option<f32>,
        untried: Vec<ActionId>,
    ) -> NodeId {
        let child = MctsNode::new_child(parent_id, action, position, terminal, untried);
        let child_id = self.allocate(child);
        self.get_mut(parent_id).children.push((action, child_id));
        child_id
    }

    /// Backpropagate a playout score from a node to the root.
    ///
    /// The search has a single decision maker, so the same score is added at
    /// every level.
    pub fn backpropagate(&mut self, leaf_id: NodeId, value: f32) {
        let mut current_id = leaf_id;
        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visit_count += 1;
            node.value_sum += value;
            current_id = node.parent;
        }
    }

    /// Robust selection: the root child with the most visits.
    ///
    /// Ties are broken by the higher mean value, then by the lower action id.
    /// Returns None if the root has no children.
    pub fn best_action(&self) -> Option<(ActionId, NodeId)> {
        let root = self.get(self.root);
        root.children
            .iter()
            .copied()
            .max_by(|&(a, id_a), &(b, id_b)| {
                let (na, nb) = (self.get(id_a), self.get(id_b));
                na.visit_count
                    .cmp(&nb.visit_count)
                    .then_with(|| {
                        na.mean_value()
                            .partial_cmp(&nb.mean_value())
                            .unwrap_or(Ordering::Equal)
                    })
                    .then_with(|| b.cmp(&a))
            })
    }

    /// Visit counts of the root's children, in action id order.
    pub fn root_visits(&self) -> Vec<(ActionId, u32)> {
        let root = self.get(self.root);
        let mut visits: Vec<(ActionId, u32)> = root
            .children
            .iter()
            .map(|&(action, id)| (action, self.get(id).visit_count))
            .collect();
        visits.sort_by_key(|&(action, _)| action);
        visits
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_value: root.mean_value(),
            max_depth: self.compute_max_depth(),
        }
    }

    fn compute_max_depth(&self) -> u32 {
        // Parents are always allocated before their children.
        let mut depth = vec![0u32; self.nodes.len()];
        for (i, node) in self.nodes.iter().enumerate().skip(1) {
            depth[i] = depth[node.parent.0 as usize] + 1;
        }
        depth.into_iter().max().unwrap_or(0)
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f32,
    pub max_depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::CardCatalog;
    use hex_grid::HexGrid;
    use std::sync::Arc;

    fn position() -> Position {
        let grid = HexGrid::with_radius(1).unwrap();
        Position::new(&grid, Arc::new(CardCatalog::empty()), 1)
    }

    fn ids(raw: &[u32]) -> Vec<ActionId> {
        raw.iter().copied().map(ActionId).collect()
    }

    #[test]
    fn test_new_tree() {
        let tree = MctsTree::new(position(), ids(&[0, 1, 2]));

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), NodeId(0));

        let root = tree.get(tree.root());
        assert!(root.parent.is_none());
        assert_eq!(root.untried, ids(&[0, 1, 2]));
    }

    #[test]
    fn test_add_child() {
        let mut tree = MctsTree::new(position(), ids(&[0, 1]));

        let child_id = tree.add_child(tree.root(), ActionId(1), position(), None, ids(&[4]));

        assert_eq!(tree.len(), 2);
        assert_eq!(child_id, NodeId(1));

        let root = tree.get(tree.root());
        assert_eq!(root.children, vec![(ActionId(1), NodeId(1))]);

        let child = tree.get(child_id);
        assert_eq!(child.parent, tree.root());
        assert_eq!(child.action, Some(ActionId(1)));
        assert_eq!(child.untried, ids(&[4]));
    }

    #[test]
    fn test_backpropagate() {
        let mut tree = MctsTree::new(position(), Vec::new());

        // root -> child -> grandchild
        let child_id = tree.add_child(tree.root(), ActionId(0), position(), None, Vec::new());
        let grandchild_id = tree.add_child(child_id, ActionId(1), position(), None, Vec::new());

        tree.backpropagate(grandchild_id, 0.75);

        for id in [grandchild_id, child_id, tree.root()] {
            let node = tree.get(id);
            assert_eq!(node.visit_count, 1);
            assert!((node.value_sum - 0.75).abs() < 1e-6);
        }
    }

    #[test]
    fn test_select_child_prefers_unvisited() {
        let mut tree = MctsTree::new(position(), Vec::new());
        let a = tree.add_child(tree.root(), ActionId(0), position(), None, Vec::new());
        let b = tree.add_child(tree.root(), ActionId(1), position(), None, Vec::new());

        tree.backpropagate(a, 1.0);
        assert_eq!(tree.select_child(tree.root(), 1.4), Some(b));

        tree.backpropagate(b, 0.0);
        // Equal visits: the better mean wins.
        assert_eq!(tree.select_child(tree.root(), 1.4), Some(a));
    }

    #[test]
    fn test_best_action_is_most_visited() {
        let mut tree = MctsTree::new(position(), Vec::new());
        let c1 = tree.add_child(tree.root(), ActionId(5), position(), None, Vec::new());
        let c2 = tree.add_child(tree.root(), ActionId(9), position(), None, Vec::new());

        tree.get_mut(c1).visit_count = 30;
        tree.get_mut(c1).value_sum = 27.0;
        tree.get_mut(c2).visit_count = 70;
        tree.get_mut(c2).value_sum = 7.0;

        assert_eq!(tree.best_action(), Some((ActionId(9), c2)));
        assert_eq!(
            tree.root_visits(),
            vec![(ActionId(5), 30), (ActionId(9), 70)]
        );
    }

    #[test]
    fn test_best_action_tie_breaks() {
        let mut tree = MctsTree::new(position(), Vec::new());
        let c1 = tree.add_child(tree.root(), ActionId(7), position(), None, Vec::new());
        let c2 = tree.add_child(tree.root(), ActionId(3), position(), None, Vec::new());
        let c3 = tree.add_child(tree.root(), ActionId(4), position(), None, Vec::new());
        for id in [c1, c2, c3] {
            tree.get_mut(id).visit_count = 10;
            tree.get_mut(id).value_sum = 5.0;
        }
        // Same visits and mean: lowest id.
        assert_eq!(tree.best_action().map(|(a, _)| a), Some(ActionId(3)));

        tree.get_mut(c1).value_sum = 6.0;
        assert_eq!(tree.best_action().map(|(a, _)| a), Some(ActionId(7)));
    }

    #[test]
    fn test_tree_stats() {
        let mut tree = MctsTree::new(position(), Vec::new());
        let child = tree.add_child(tree.root(), ActionId(0), position(), None, Vec::new());
        tree.add_child(child, ActionId(0), position(), None, Vec::new());
        tree.add_child(tree.root(), ActionId(1), position(), None, Vec::new());

        let stats = tree.stats();
        assert_eq!(stats.total_nodes, 4);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.root_visits, 0);
    }
}
