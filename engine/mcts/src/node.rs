//! MCTS tree node representation.
//!
//! Each node holds the position reached by taking an action from the parent,
//! the actions not yet expanded from it, and the visit statistics used for
//! UCT selection and robust final selection.

use engine_core::{ActionId, Position};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Action that led to this node from parent (None for root)
    pub action: Option<ActionId>,

    /// Position at this node. Hidden deck order is whatever the tree
    /// was built with; playouts substitute the determinized view.
    pub position: Position,

    /// Number of times this node has been visited
    pub visit_count: u32,

    /// Sum of playout scores backpropagated through this node.
    pub value_sum: f32,

    /// Terminal score, if the game is over at this node
    pub terminal: Option<f32>,

    /// Legal actions not yet expanded
    pub untried: Vec<ActionId>,

    /// Children: Vec of (action, NodeId) pairs, in expansion order.
    pub children: Vec<(ActionId, NodeId)>,
}

impl MctsNode {
    /// Create a new root node.
    pub fn new_root(position: Position, untried: Vec<ActionId>) -> Self {
        Self {
            parent: NodeId::NONE,
            action: None,
            position,
            visit_count: 0,
            value_sum: 0.0,
            terminal: None,
            untried,
            children: Vec::new(),
        }
    }

    /// Create a new child node. Terminal children get no untried actions.
    pub fn new_child(
        parent: NodeId,
        action: ActionId,
        position: Position,
        terminal: Option<f32>,
        untried: Vec<ActionId>,
    ) -> Self {
        Self {
            parent,
            action: Some(action),
            position,
            visit_count: 0,
            value_sum: 0.0,
            terminal,
            untried: if terminal.is_some() { Vec::new() } else { untried },
            children: Vec::new(),
        }
    }

    /// Mean playout score. Returns 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f32 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.value_sum / self.visit_count as f32
        }
    }

    /// UCT score for selection from a parent:
    /// `mean + c * sqrt(ln(N_parent) / N_child)`.
    ///
    /// Unvisited nodes score `+inf`. Takes the precomputed `ln(N_parent)`.
    #[inline]
    pub fn uct_score(&self, parent_visits_ln: f32, exploration: f32) -> f32 {
        if self.visit_count == 0 {
            return f32::INFINITY;
        }
        let n = self.visit_count as f32;
        self.mean_value() + exploration * (parent_visits_ln / n).sqrt()
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    /// True while some legal action has not been expanded.
    #[inline]
    pub fn has_untried(&self) -> bool {
        !self.untried.is_empty()
    }

    /// Check if this node has been expanded (has children).
    #[inline]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Selection stops here: terminal, still expandable, or a dead end.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.is_terminal() || self.has_untried() || !self.is_expanded()
    }
}
