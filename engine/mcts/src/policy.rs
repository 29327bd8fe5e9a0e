//! `DecisionPolicy` adapter for the MCTS search.

use engine_core::{Decision, DecisionPolicy, GameState, HeuristicEvaluator, SearchDiagnostics};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::config::MctsConfig;
use crate::search::run_mcts;

/// Plays the agent to move with a fresh tree every turn. The RNG persists
/// across turns, so a seeded policy replays the same match.
pub struct MctsPolicy {
    evaluator: HeuristicEvaluator,
    config: MctsConfig,
    rng: ChaCha20Rng,
}

impl MctsPolicy {
    pub fn new(evaluator: HeuristicEvaluator, config: MctsConfig) -> Self {
        Self {
            evaluator,
            config,
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    pub fn with_seed(evaluator: HeuristicEvaluator, config: MctsConfig, seed: u64) -> Self {
        Self {
            evaluator,
            config,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }
}

impl DecisionPolicy for MctsPolicy {
    fn name(&self) -> &str {
        "mcts"
    }

    fn choose_action(&mut self, state: &GameState) -> Decision {
        let result = run_mcts(&self.evaluator, self.config.clone(), state, &mut self.rng);
        Decision {
            action: result.action,
            diagnostics: SearchDiagnostics {
                algorithm: self.name().to_string(),
                explored: result.simulations as u64,
                value: result.value,
                elapsed_us: result.elapsed.as_micros() as u64,
                stop_reason: result.stop_reason,
                depth_reached: Some(result.max_depth),
            },
        }
    }
}
