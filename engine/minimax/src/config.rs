//! Minimax configuration parameters.

use std::time::Duration;

/// Configuration for the alpha-beta search.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimaxConfig {
    /// Plies searched below the root.
    pub depth: u32,

    /// Cut off branches once `alpha >= beta`.
    /// Disabling it makes every root value exact (useful for verification).
    pub pruning: bool,

    /// Stable reordering of actions so likely-good ones are tried first.
    pub move_ordering: bool,

    /// Search root children on the rayon pool, each with a full window.
    pub parallel_root: bool,

    /// Wall-clock budget. When set, the search deepens iteratively and
    /// returns the deepest fully completed answer.
    pub time_limit: Option<Duration>,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            pruning: true,
            move_ordering: true,
            parallel_root: false,
            time_limit: None,
        }
    }
}

impl MinimaxConfig {
    /// Create a shallow config for testing.
    pub fn for_testing() -> Self {
        Self {
            depth: 2,
            ..Self::default()
        }
    }

    /// Builder pattern: set search depth.
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }

    pub fn with_move_ordering(mut self, move_ordering: bool) -> Self {
        self.move_ordering = move_ordering;
        self
    }

    pub fn with_parallel_root(mut self, parallel_root: bool) -> Self {
        self.parallel_root = parallel_root;
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
        let config = MinimaxConfig::default();
        assert_eq!(config.depth, 3);
        assert!(config.pruning);
        assert!(config.move_ordering);
        assert!(!config.parallel_root);
        assert!(config.time_limit.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MinimaxConfig::for_testing()
            .with_depth(4)
            .with_pruning(false)
            .with_time_limit(Some(Duration::from_millis(50)));
        assert_eq!(config.depth, 4);
        assert!(!config.pruning);
        assert_eq!(config.time_limit, Some(Duration::from_millis(50)));
    }
}
