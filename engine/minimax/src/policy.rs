//! `DecisionPolicy` adapter for the minimax search.

use engine_core::{Decision, DecisionPolicy, GameState, HeuristicEvaluator, SearchDiagnostics};

use crate::config::MinimaxConfig;
use crate::search::MinimaxSearch;

/// Plays the agent to move with a fresh minimax search every turn.
pub struct MinimaxPolicy {
    evaluator: HeuristicEvaluator,
    config: MinimaxConfig,
}

impl MinimaxPolicy {
    pub fn new(evaluator: HeuristicEvaluator, config: MinimaxConfig) -> Self {
        Self { evaluator, config }
    }

    pub fn config(&self) -> &MinimaxConfig {
        &self.config
    }
}

impl DecisionPolicy for MinimaxPolicy {
    fn name(&self) -> &str {
        "minimax"
    }

    fn choose_action(&mut self, state: &GameState) -> Decision {
        let result = MinimaxSearch::new(&self.evaluator, self.config.clone()).run(state);
        Decision {
            action: result.action,
            diagnostics: SearchDiagnostics {
                algorithm: self.name().to_string(),
                explored: result.nodes_visited,
                value: result.value,
                elapsed_us: result.elapsed.as_micros() as u64,
                stop_reason: result.stop_reason,
                depth_reached: Some(result.depth_reached),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{RulesConfig, StopReason};

    #[test]
    fn test_policy_reports_diagnostics() {
        let state = GameState::generate(&RulesConfig::default(), 4).unwrap();
        let mut policy = MinimaxPolicy::new(HeuristicEvaluator::default(), MinimaxConfig::for_testing());
        let decision = policy.choose_action(&state);

        assert!(state.is_legal(state.active_player(), decision.action));
        assert_eq!(decision.diagnostics.algorithm, "minimax");
        assert_eq!(decision.diagnostics.depth_reached, Some(2));
        assert_eq!(decision.diagnostics.stop_reason, StopReason::Completed);
        assert!(decision.diagnostics.explored > 1);
    }
}
