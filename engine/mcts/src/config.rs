//! MCTS configuration parameters.

use std::time::Duration;

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Number of simulations to run per search.
    pub num_simulations: u32,

    /// Exploration constant C in UCB1 (`mean + C * sqrt(ln N / n)`).
    /// sqrt(2) is the textbook value for rewards in [0, 1].
    pub exploration: f64,

    /// Maximum number of random turns played out from a new node.
    pub rollout_depth: u32,

    /// Divisor applied to the heuristic before squashing it into (0, 1).
    /// Larger values flatten the reward curve.
    pub reward_scale: f32,

    /// Optional wall-clock budget checked between simulations.
    pub time_limit: Option<Duration>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: 100,
            exploration: 1.414,
            rollout_depth: 10,
            reward_scale: 10.0,
            time_limit: None,
        }
    }
}

impl MctsConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            num_simulations: 50,
            rollout_depth: 4,
            ..Self::default()
        }
    }

    /// Builder pattern: set number of simulations.
    pub fn with_simulations(mut self, n: u32) -> Self {
        self.num_simulations = n;
        self
    }

    /// Builder pattern: set the UCB1 exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    pub fn with_rollout_depth(mut self, depth: u32) -> Self {
        self.rollout_depth = depth;
        self
    }

    pub fn with_reward_scale(mut self, scale: f32) -> Self {
        self.reward_scale = scale;
        self
    }

    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.num_simulations, 100);
        assert!((config.exploration - 1.414).abs() < 1e-9);
        assert_eq!(config.rollout_depth, 10);
        assert!(config.time_limit.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_simulations(400)
            .with_exploration(0.5)
            .with_rollout_depth(0);

        assert_eq!(config.num_simulations, 400);
        assert!((config.exploration - 0.5).abs() < 1e-9);
        assert_eq!(config.rollout_depth, 0);
    }
}
