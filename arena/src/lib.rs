//! Fuel Dominion arena.
//!
//! Drives matches between the minimax Strategist and the MCTS Reactive agent:
//! - `Orchestrator`: owns the live state, applies one decision per `step`
//! - `MatchEvent`/`MatchObserver`: the outbound stream (JSON lines, logs, metrics)
//! - `play_match`: async pacing and shutdown handling for the binary

pub mod config;
pub mod events;
pub mod metrics;
pub mod observer;
pub mod orchestrator;
pub mod runner;
pub mod setup;

pub use config::Config;
pub use events::{MatchEvent, Scores};
pub use observer::{EventLog, JsonLinesObserver, MatchObserver, MetricsObserver, TracingObserver};
pub use orchestrator::{
    default_policies, Command, MatchSummary, Orchestrator, PolicyFactory, TurnRecord,
};
pub use runner::{play_match, MatchEnd};
pub use setup::MatchSetup;
