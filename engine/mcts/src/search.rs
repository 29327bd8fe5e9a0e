//! MCTS search implementation.
//!
//! Implements the classic UCB1 loop:
//! 1. Selection: descend by UCB1 while nodes are fully expanded
//! 2. Expansion: add one untried action as a new child
//! 3. Rollout: play uniformly random actions for a few turns, then score
//!    the reached state with the heuristic evaluator
//! 4. Backpropagation: update visit counts and rewards up to the root

use std::time::{Duration, Instant};

use engine_core::{Action, AgentId, Evaluator, GameState, StopReason};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::node::NodeId;
use crate::tree::MctsTree;

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Most visited root action (Wait if the root has no children)
    pub action: Action,

    /// Mean reward of `action` for the searching agent, in (0, 1)
    pub value: f32,

    /// Number of simulations performed
    pub simulations: u32,

    /// Visit count of every root child, in expansion order
    pub visits: Vec<(Action, u32)>,

    pub tree_size: usize,
    pub max_depth: u32,
    pub stop_reason: StopReason,
    pub elapsed: Duration,
}

/// Squash a heuristic score into (0, 1).
#[inline]
pub fn logistic(x: f32) -> f64 {
    1.0 / (1.0 + (-(x as f64)).exp())
}

/// Legal actions of the player to move, shuffled. Empty for terminal states.
fn shuffled_actions(state: &GameState, rng: &mut ChaCha20Rng) -> Vec<Action> {
    if state.is_terminal() {
        return Vec::new();
    }
    let mut actions = state.legal_actions(state.active_player());
    actions.shuffle(rng);
    actions
}

/// MCTS search state.
pub struct MctsSearch<'a, E: Evaluator> {
    tree: MctsTree,
    evaluator: &'a E,
    config: MctsConfig,
    perspective: AgentId,
}

impl<'a, E: Evaluator> MctsSearch<'a, E> {
    /// Create a new MCTS search from the given game state. The searching
    /// agent is the one to move.
    pub fn new(evaluator: &'a E, config: MctsConfig, state: &GameState, rng: &mut ChaCha20Rng) -> Self {
        let untried = shuffled_actions(state, rng);
        Self {
            tree: MctsTree::new(state.clone(), untried),
            evaluator,
            config,
            perspective: state.active_player(),
        }
    }

    /// Run the search for the configured number of simulations or until the
    /// deadline. Never fails; the best root child so far is returned.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> SearchResult {
        let start = Instant::now();
        let deadline = self.config.time_limit.map(|limit| start + limit);
        let root = self.tree.get(self.tree.root());

        let mut stop_reason = StopReason::Completed;
        let mut simulations = 0;

        if root.is_terminal || root.untried.is_empty() {
            stop_reason = StopReason::BudgetExhausted;
        } else {
            while simulations < self.config.num_simulations {
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    stop_reason = StopReason::Deadline;
                    break;
                }
                self.simulate(rng);
                simulations += 1;
            }
        }

        let root = self.tree.get(self.tree.root());
        let (action, value) = match root.best_child_by_visits(self.tree.arena()) {
            Some((action, child)) => (action, child.mean_value() as f32),
            None => (
                Action::Wait,
                logistic(self.score(&root.state)) as f32,
            ),
        };
        let stats = self.tree.stats();

        let result = SearchResult {
            action,
            value,
            simulations,
            visits: root.visit_distribution(self.tree.arena()),
            tree_size: stats.total_nodes,
            max_depth: stats.max_depth,
            stop_reason,
            elapsed: start.elapsed(),
        };
        debug!(
            agent = %self.perspective,
            action = %result.action,
            value = result.value,
            simulations,
            tree_size = result.tree_size,
            ?stop_reason,
            "mcts search finished"
        );
        result
    }

    /// Run a single simulation (select -> expand -> rollout -> backpropagate).
    fn simulate(&mut self, rng: &mut ChaCha20Rng) {
        let leaf_id = self.select();
        let node_id = self.expand(leaf_id, rng);
        let reward = self.rollout(node_id, rng);
        self.tree.backpropagate(node_id, reward, self.perspective);

        trace!(leaf = node_id.0, reward, "MCTS simulation complete");
    }

    /// Descend by UCB1 while the node is non-terminal, fully expanded and
    /// has children.
    fn select(&self) -> NodeId {
        let mut current = self.tree.root();
        loop {
            let node = self.tree.get(current);
            if node.is_terminal || !node.is_fully_expanded() || !node.is_expanded() {
                return current;
            }
            match self.tree.select_child(current, self.config.exploration) {
                Some(child_id) => current = child_id,
                None => return current,
            }
        }
    }

    /// Pop one untried action of `node_id` and add the resulting child.
    /// Returns `node_id` itself when there is nothing left to expand.
    fn expand(&mut self, node_id: NodeId, rng: &mut ChaCha20Rng) -> NodeId {
        let node = self.tree.get_mut(node_id);
        if node.is_terminal {
            return node_id;
        }
        let Some(action) = node.untried.pop() else {
            return node_id;
        };

        let mover = node.state.active_player();
        let mut child_state = node.state.clone();
        if child_state.apply(action, mover).is_err() {
            return node_id;
        }
        let untried = shuffled_actions(&child_state, rng);
        self.tree.add_child(node_id, action, mover, child_state, untried)
    }

    /// Random playout from `node_id`; reward for the searching agent.
    fn rollout(&self, node_id: NodeId, rng: &mut ChaCha20Rng) -> f64 {
        let mut state = self.tree.get(node_id).state.clone();
        for _ in 0..self.config.rollout_depth {
            if state.is_terminal() {
                break;
            }
            let mover = state.active_player();
            let legal = state.legal_actions(mover);
            let Some(&action) = legal.choose(rng) else {
                break;
            };
            if state.apply(action, mover).is_err() {
                break;
            }
        }
        logistic(self.score(&state))
    }

    fn score(&self, state: &GameState) -> f32 {
        self.evaluator.evaluate(state, self.perspective) / self.config.reward_scale
    }
}

/// Convenience function to run a single search.
pub fn run_mcts<E: Evaluator>(
    evaluator: &E,
    config: MctsConfig,
    state: &GameState,
    rng: &mut ChaCha20Rng,
) -> SearchResult {
    MctsSearch::new(evaluator, config, state, rng).run(rng)
}
