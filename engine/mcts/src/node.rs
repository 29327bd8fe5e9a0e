//! MCTS tree node representation.
//!
//! Each node holds the game state reached by taking `action` from the parent.
//! Rewards are accumulated from the perspective of the agent that chose that
//! action (`mover`), so a parent always maximises its children's mean.

use engine_core::{Action, AgentId, GameState};

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

    /// Action that led here from the parent (None for root)
    pub action: Option<Action>,

    /// Agent that played `action` (None for root)
    pub mover: Option<AgentId>,

    /// Game state at this node
    pub state: GameState,

    /// Legal actions not yet expanded, in the order they will be tried
    pub untried: Vec<Action>,

    /// Children: Vec of (action, NodeId) pairs in expansion order.
    pub children: Vec<(Action, NodeId)>,

    /// Number of times this node has been visited
    pub visit_count: u32,

    /// Sum of rewards backpropagated through this node, from `mover`'s view.
    pub total_reward: f64,

    /// Whether this is a terminal state (match over)
    pub is_terminal: bool,
}

impl MctsNode {
    /// Create a new root node.
    pub fn new_root(state: GameState, untried: Vec<Action>) -> Self {
        let is_terminal = state.is_terminal();
        Self {
            parent: NodeId::NONE,
            action: None,
            mover: None,
            state,
            untried,
            children: Vec::new(),
            visit_count: 0,
            total_reward: 0.0,
            is_terminal,
        }
    }

    /// Create a new child node.
    pub fn new_child(
        parent: NodeId,
        action: Action,
        mover: AgentId,
        state: GameState,
        untried: Vec<Action>,
    ) -> Self {
        let is_terminal = state.is_terminal();
        Self {
            parent,
            action: Some(action),
            mover: Some(mover),
            state,
            untried,
            children: Vec::new(),
            visit_count: 0,
            total_reward: 0.0,
            is_terminal,
        }
    }

    /// Mean reward; 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.total_reward / self.visit_count as f64
        }
    }

    /// UCB1 score: `mean + c * sqrt(ln(N_parent) / n)`.
    /// Unvisited nodes score +inf so each child is tried once.
    ///
    /// Takes pre-computed ln(parent_visits) to avoid redundant work when
    /// comparing siblings.
    #[inline]
    pub fn ucb1(&self, parent_visits_ln: f64, exploration: f64) -> f64 {
        if self.visit_count == 0 {
            return f64::INFINITY;
        }
        self.mean_value() + exploration * (parent_visits_ln / self.visit_count as f64).sqrt()
    }

    /// Every legal action has a child.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    /// Check if this node has been expanded (has children).
    #[inline]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Get the most visited child. The earliest child wins ties.
    pub fn best_child_by_visits<'a>(&self, arena: &'a [MctsNode]) -> Option<(Action, &'a MctsNode)> {
        let mut best: Option<(Action, &MctsNode)> = None;
        for (action, id) in &self.children {
            let node = &arena[id.0 as usize];
            if best.map_or(true, |(_, b)| node.visit_count > b.visit_count) {
                best = Some((*action, node));
            }
        }
        best
    }

    /// Visit count of every child, in expansion order.
    pub fn visit_distribution(&self, arena: &[MctsNode]) -> Vec<(Action, u32)> {
        self.children
            .iter()
            .map(|(action, id)| (*action, arena[id.0 as usize].visit_count))
            .collect()
    }
}
