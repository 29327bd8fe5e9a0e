//! Match setup resolved from the central configuration.

use std::time::Duration;

use engine_config::CentralConfig;
use engine_core::{RulesConfig, ScoringWeights};
use mcts::MctsConfig;
use minimax::MinimaxConfig;

/// Rules, evaluation weights and both search configurations for a match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSetup {
    pub rules: RulesConfig,
    pub weights: ScoringWeights,
    pub minimax: MinimaxConfig,
    pub mcts: MctsConfig,
    /// Seed used when a match is started without one.
    pub seed: u64,
}

impl Default for MatchSetup {
    fn default() -> Self {
        Self::from_central(&CentralConfig::default())
    }
}

impl MatchSetup {
    pub fn from_central(config: &CentralConfig) -> Self {
        let game = &config.game;
        let fuel = &config.fuel;
        let rules = RulesConfig {
            grid_size: game.grid_size,
            max_turns: game.max_turns,
            early_victory: game.early_victory,
            num_walls: game.num_walls,
            num_doors: game.num_doors,
            num_windows: game.num_windows,
            num_trees: game.num_trees,
            num_fuel_stations: game.num_fuel_stations,
            num_light_nodes: game.num_light_nodes,
            min_spacing: game.min_spacing,
            agent_clearance: game.agent_clearance,
            initial_fuel: fuel.initial,
            max_fuel: fuel.max,
            move_cost: fuel.move_cost,
            control_cost: fuel.control_cost,
            capture_cost: fuel.capture_cost,
            refuel_amount: fuel.refuel_amount,
            station_capacity: fuel.station_capacity,
            regen_interval: fuel.regen_interval,
            regen_amount: fuel.regen_amount,
        };

        let scoring = &config.scoring;
        let weights = ScoringWeights {
            node: scoring.node_weight,
            fuel: scoring.fuel_weight,
            proximity: scoring.proximity_weight,
            sight: scoring.sight_weight,
            outcome: scoring.outcome_weight,
        };

        let minimax = MinimaxConfig {
            depth: config.minimax.depth,
            pruning: config.minimax.pruning,
            move_ordering: config.minimax.move_ordering,
            parallel_root: config.minimax.parallel_root,
            time_limit: millis(config.minimax.time_limit_ms),
        };

        let mcts = MctsConfig {
            num_simulations: config.mcts.num_simulations,
            exploration: config.mcts.exploration,
            rollout_depth: config.mcts.rollout_depth,
            reward_scale: config.mcts.reward_scale,
            time_limit: millis(config.mcts.time_limit_ms),
        };

        Self {
            rules,
            weights,
            minimax,
            mcts,
            seed: config.common.seed,
        }
    }

    /// Small board, short match and cheap searches.
    pub fn for_testing() -> Self {
        Self {
            rules: RulesConfig::default().with_max_turns(12),
            minimax: MinimaxConfig::for_testing(),
            mcts: MctsConfig::for_testing(),
            ..Self::default()
        }
    }

    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Zero means "no limit".
fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_setup_matches_component_defaults() {
        let setup = MatchSetup::default();
        assert_eq!(setup.rules, RulesConfig::default());
        assert_eq!(setup.minimax, MinimaxConfig::default());
        assert_eq!(setup.mcts, MctsConfig::default());
        assert_eq!(setup.seed, 42);
        assert!((setup.weights.node - ScoringWeights::default().node).abs() < f32::EPSILON);
    }

    #[test]
    fn test_time_limits_convert_from_millis() {
        let mut central = CentralConfig::default();
        central.minimax.time_limit_ms = 250;
        central.fuel.move_cost = 3;

        let setup = MatchSetup::from_central(&central);
        assert_eq!(setup.minimax.time_limit, Some(Duration::from_millis(250)));
        assert_eq!(setup.mcts.time_limit, None);
        assert_eq!(setup.rules.move_cost, 3);
    }
}
