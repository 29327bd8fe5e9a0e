//! Depth-limited minimax with alpha-beta pruning.
//!
//! The searching agent maximises and its opponent minimises. Every ply
//! works on a fresh clone of the state, so the caller's state is never
//! touched. Ties are broken toward the first action in enumeration order.

use std::time::{Duration, Instant};

use engine_core::{Action, AgentId, Evaluator, GameState, StopReason};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::MinimaxConfig;
use crate::ordering::ordered_actions;

/// Result of a minimax search.
#[derive(Debug, Clone)]
pub struct MinimaxResult {
    /// Best action found (first maximal one in enumeration order)
    pub action: Action,

    /// Backed-up value of `action` from the searching agent's view
    pub value: f32,

    /// Number of states visited, root included
    pub nodes_visited: u64,

    /// Deepest fully completed iteration
    pub depth_reached: u32,

    pub stop_reason: StopReason,

    /// Value of every root action searched at `depth_reached`, in
    /// enumeration order. Exact only when pruning is disabled or the
    /// root was searched in parallel.
    pub root_values: Vec<(Action, f32)>,

    pub elapsed: Duration,
}

/// Outcome of one full pass at a fixed depth.
struct RootPass {
    action: Action,
    value: f32,
    root_values: Vec<(Action, f32)>,
}

/// Recursive searcher. One per thread when the root is split.
struct Worker<'a, E: Evaluator> {
    evaluator: &'a E,
    perspective: AgentId,
    pruning: bool,
    move_ordering: bool,
    deadline: Option<Instant>,
    nodes: u64,
}

impl<E: Evaluator> Worker<'_, E> {
    fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Value of `state` searched `depth` more plies. `None` when the
    /// deadline passed mid-search.
    fn alphabeta(&mut self, state: &GameState, depth: u32, mut alpha: f32, mut beta: f32) -> Option<f32> {
        self.nodes += 1;
        if self.expired() {
            return None;
        }
        if depth == 0 || state.is_terminal() {
            return Some(self.evaluator.evaluate(state, self.perspective));
        }

        let mover = state.active_player();
        let maximizing = mover == self.perspective;
        let mut best = if maximizing {
            f32::NEG_INFINITY
        } else {
            f32::INFINITY
        };

        for action in ordered_actions(state, self.move_ordering) {
            let mut child = state.clone();
            if child.apply(action, mover).is_err() {
                continue;
            }
            let value = self.alphabeta(&child, depth - 1, alpha, beta)?;

            if maximizing {
                best = best.max(value);
                alpha = alpha.max(best);
            } else {
                best = best.min(value);
                beta = beta.min(best);
            }
            if self.pruning && alpha >= beta {
                break;
            }
        }

        Some(best)
    }

    /// Search one root child with a full window.
    fn search_child(&mut self, state: &GameState, action: Action, depth: u32) -> Option<f32> {
        let mut child = state.clone();
        child.apply(action, self.perspective).ok()?;
        self.alphabeta(&child, depth - 1, f32::NEG_INFINITY, f32::INFINITY)
    }
}

/// Minimax search for the agent to move in the given state.
pub struct MinimaxSearch<'a, E: Evaluator> {
    evaluator: &'a E,
    config: MinimaxConfig,
}

impl<'a, E: Evaluator> MinimaxSearch<'a, E> {
    pub fn new(evaluator: &'a E, config: MinimaxConfig) -> Self {
        Self { evaluator, config }
    }

    pub fn config(&self) -> &MinimaxConfig {
        &self.config
    }

    fn worker(&self, perspective: AgentId, deadline: Option<Instant>) -> Worker<'a, E> {
        Worker {
            evaluator: self.evaluator,
            perspective,
            pruning: self.config.pruning,
            move_ordering: self.config.move_ordering,
            deadline,
            nodes: 0,
        }
    }

    /// Run the search. Never fails: with no legal alternative or an
    /// exhausted budget the best answer found so far is returned.
    pub fn run(&self, state: &GameState) -> MinimaxResult {
        let start = Instant::now();
        let perspective = state.active_player();
        let actions = ordered_actions(state, self.config.move_ordering);
        let mut nodes_visited = 1;

        if state.is_terminal() || self.config.depth == 0 {
            return MinimaxResult {
                action: Action::Wait,
                value: self.evaluator.evaluate(state, perspective),
                nodes_visited,
                depth_reached: 0,
                stop_reason: StopReason::BudgetExhausted,
                root_values: Vec::new(),
                elapsed: start.elapsed(),
            };
        }

        let deadline = self.config.time_limit.map(|limit| start + limit);
        let depths = match deadline {
            Some(_) => 1..=self.config.depth,
            None => self.config.depth..=self.config.depth,
        };

        let mut best: Option<RootPass> = None;
        let mut depth_reached = 0;
        let mut stop_reason = StopReason::Completed;

        for depth in depths {
            let (pass, nodes) = self.search_root(state, &actions, perspective, depth, deadline);
            nodes_visited += nodes;
            match pass {
                Some(pass) => {
                    trace!(depth, action = %pass.action, value = pass.value, "completed depth");
                    best = Some(pass);
                    depth_reached = depth;
                }
                None => {
                    stop_reason = StopReason::Deadline;
                    break;
                }
            }
        }

        let (action, value, root_values) = match best {
            Some(pass) => (pass.action, pass.value, pass.root_values),
            None => {
                // Deadline hit before depth 1 finished.
                let action = actions.first().copied().unwrap_or(Action::Wait);
                (action, self.evaluator.evaluate(state, perspective), Vec::new())
            }
        };

        let result = MinimaxResult {
            action,
            value,
            nodes_visited,
            depth_reached,
            stop_reason,
            root_values,
            elapsed: start.elapsed(),
        };
        debug!(
            agent = %perspective,
            action = %result.action,
            value = result.value,
            nodes = result.nodes_visited,
            depth = result.depth_reached,
            ?stop_reason,
            "minimax search finished"
        );
        result
    }

    fn search_root(
        &self,
        state: &GameState,
        actions: &[Action],
        perspective: AgentId,
        depth: u32,
        deadline: Option<Instant>,
    ) -> (Option<RootPass>, u64) {
        if self.config.parallel_root {
            self.search_root_parallel(state, actions, perspective, depth, deadline)
        } else {
            self.search_root_sequential(state, actions, perspective, depth, deadline)
        }
    }

    fn search_root_sequential(
        &self,
        state: &GameState,
        actions: &[Action],
        perspective: AgentId,
        depth: u32,
        deadline: Option<Instant>,
    ) -> (Option<RootPass>, u64) {
        let mut worker = self.worker(perspective, deadline);
        let mut alpha = f32::NEG_INFINITY;
        let mut best: Option<(Action, f32)> = None;
        let mut root_values = Vec::with_capacity(actions.len());

        for &action in actions {
            let mut child = state.clone();
            if child.apply(action, perspective).is_err() {
                continue;
            }
            let Some(value) = worker.alphabeta(&child, depth - 1, alpha, f32::INFINITY) else {
                return (None, worker.nodes);
            };
            root_values.push((action, value));

            if best.map_or(true, |(_, b)| value > b) {
                best = Some((action, value));
            }
            if self.config.pruning {
                alpha = alpha.max(value);
            }
        }

        let pass = best.map(|(action, value)| RootPass {
            action,
            value,
            root_values,
        });
        (pass, worker.nodes)
    }

    fn search_root_parallel(
        &self,
        state: &GameState,
        actions: &[Action],
        perspective: AgentId,
        depth: u32,
        deadline: Option<Instant>,
    ) -> (Option<RootPass>, u64) {
        let branches: Vec<(Action, Option<f32>, u64)> = actions
            .par_iter()
            .map(|&action| {
                let mut worker = self.worker(perspective, deadline);
                let value = worker.search_child(state, action, depth);
                (action, value, worker.nodes)
            })
            .collect();

        let nodes = branches.iter().map(|(_, _, n)| n).sum();
        let mut best: Option<(Action, f32)> = None;
        let mut root_values = Vec::with_capacity(branches.len());

        // Ordered reduction keeps the sequential tie-break.
        for (action, value, _) in branches {
            let Some(value) = value else {
                return (None, nodes);
            };
            root_values.push((action, value));
            if best.map_or(true, |(_, b)| value > b) {
                best = Some((action, value));
            }
        }

        let pass = best.map(|(action, value)| RootPass {
            action,
            value,
            root_values,
        });
        (pass, nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{
        Action, Direction, HeuristicEvaluator, Layout, RandomPolicy, RulesConfig, DecisionPolicy,
    };

    /// Generated board advanced a few random plies so positions vary.
    fn midgame(seed: u64, plies: usize) -> GameState {
        let mut state = GameState::generate(&RulesConfig::default(), seed).unwrap();
        let mut policy = RandomPolicy::with_seed(seed);
        for _ in 0..plies {
            if state.is_terminal() {
                break;
            }
            let action = policy.choose_action(&state).action;
            let agent = state.active_player();
            state.apply(action, agent).unwrap();
        }
        state
    }

    fn on_node() -> GameState {
        let mut state = Layout::parse(
            "
            . N . .
            . S . .
            . . . N
            . . . R
            ",
        )
        .unwrap()
        .into_state(&RulesConfig::default())
        .unwrap();
        state.apply(Action::Move(Direction::North), AgentId::Strategist).unwrap();
        state.apply(Action::Wait, AgentId::Reactive).unwrap();
        state
    }

    #[test]
    fn test_takes_free_node() {
        let eval = HeuristicEvaluator::default();
        let state = on_node();
        for depth in 1..=3 {
            let result = MinimaxSearch::new(&eval, MinimaxConfig::default().with_depth(depth)).run(&state);
            assert_eq!(result.action, Action::ControlNode, "depth {depth}");
            assert_eq!(result.depth_reached, depth);
            assert_eq!(result.stop_reason, StopReason::Completed);
        }
    }

    #[test]
    fn test_search_does_not_mutate_state() {
        let eval = HeuristicEvaluator::default();
        let state = on_node();
        let before = engine_core::render(&state);
        let _ = MinimaxSearch::new(&eval, MinimaxConfig::default()).run(&state);
        assert_eq!(engine_core::render(&state), before);
        assert_eq!(state.turn(), 2);
    }

    #[test]
    fn test_alpha_beta_matches_plain_minimax() {
        let eval = HeuristicEvaluator::default();
        for seed in 0..6 {
            let state = midgame(seed, (seed as usize) * 3);
            for ordering in [false, true] {
                let base = MinimaxConfig::default().with_depth(3).with_move_ordering(ordering);
                let plain = MinimaxSearch::new(&eval, base.clone().with_pruning(false)).run(&state);
                let pruned = MinimaxSearch::new(&eval, base.with_pruning(true)).run(&state);

                assert_eq!(pruned.value, plain.value, "seed {seed}");
                let max = plain
                    .root_values
                    .iter()
                    .map(|(_, v)| *v)
                    .fold(f32::NEG_INFINITY, f32::max);
                let chosen = plain
                    .root_values
                    .iter()
                    .find(|(a, _)| *a == pruned.action)
                    .map(|(_, v)| *v);
                assert_eq!(chosen, Some(max), "seed {seed}");
                assert_eq!(pruned.action, plain.action, "seed {seed}");
                assert!(pruned.nodes_visited <= plain.nodes_visited);
            }
        }
    }

    #[test]
    fn test_move_ordering_keeps_value() {
        let eval = HeuristicEvaluator::default();
        let state = midgame(3, 6);
        let unordered = MinimaxSearch::new(&eval, MinimaxConfig::default().with_move_ordering(false)).run(&state);
        let ordered = MinimaxSearch::new(&eval, MinimaxConfig::default()).run(&state);
        assert_eq!(unordered.value, ordered.value);
    }

    #[test]
    fn test_parallel_root_matches_sequential() {
        let eval = HeuristicEvaluator::default();
        for seed in 0..4 {
            let state = midgame(seed, 4);
            let sequential = MinimaxSearch::new(&eval, MinimaxConfig::default()).run(&state);
            let parallel =
                MinimaxSearch::new(&eval, MinimaxConfig::default().with_parallel_root(true)).run(&state);
            assert_eq!(parallel.action, sequential.action, "seed {seed}");
            assert_eq!(parallel.value, sequential.value, "seed {seed}");
        }
    }

    #[test]
    fn test_deterministic() {
        let eval = HeuristicEvaluator::default();
        let state = midgame(8, 5);
        let a = MinimaxSearch::new(&eval, MinimaxConfig::default()).run(&state);
        let b = MinimaxSearch::new(&eval, MinimaxConfig::default()).run(&state);
        assert_eq!(a.action, b.action);
        assert_eq!(a.value, b.value);
        assert_eq!(a.nodes_visited, b.nodes_visited);
    }

    #[test]
    fn test_terminal_root_waits() {
        let eval = HeuristicEvaluator::default();
        let mut state = GameState::generate(&RulesConfig::default().with_max_turns(2), 0).unwrap();
        state.apply(Action::Wait, AgentId::Strategist).unwrap();
        state.apply(Action::Wait, AgentId::Reactive).unwrap();
        let result = MinimaxSearch::new(&eval, MinimaxConfig::default()).run(&state);
        assert_eq!(result.action, Action::Wait);
        assert_eq!(result.stop_reason, StopReason::BudgetExhausted);
        assert_eq!(result.nodes_visited, 1);
    }

    #[test]
    fn test_expired_deadline_still_answers() {
        let eval = HeuristicEvaluator::default();
        let state = midgame(2, 2);
        let config = MinimaxConfig::default().with_time_limit(Some(Duration::ZERO));
        let result = MinimaxSearch::new(&eval, config).run(&state);
        assert_eq!(result.stop_reason, StopReason::Deadline);
        assert_eq!(result.depth_reached, 0);
        assert!(state.is_legal(state.active_player(), result.action));
    }

    #[test]
    fn test_generous_deadline_completes_every_depth() {
        let eval = HeuristicEvaluator::default();
        let state = on_node();
        let config = MinimaxConfig::default()
            .with_depth(2)
            .with_time_limit(Some(Duration::from_secs(30)));
        let result = MinimaxSearch::new(&eval, config).run(&state);
        assert_eq!(result.stop_reason, StopReason::Completed);
        assert_eq!(result.depth_reached, 2);
        assert_eq!(result.action, Action::ControlNode);
    }
}
