//! Prometheus metrics for the arena.
//!
//! Match outcomes, match length and per-algorithm search effort. The binary
//! prints the text exposition on exit when asked; nothing is served over HTTP.

use engine_core::{AgentId, Outcome, SearchDiagnostics};
use lazy_static::lazy_static;
use prometheus::{
    core::Collector, Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec,
    Opts, Registry, TextEncoder,
};
use std::sync::Once;
use tracing::warn;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ========== Match Counters ==========

    /// Total number of matches played to the end
    pub static ref MATCHES_TOTAL: IntCounter = IntCounter::with_opts(
        Opts::new("arena_matches_total", "Total number of matches played to the end")
    ).unwrap();

    /// Finished matches by winner (strategist, reactive, draw)
    pub static ref MATCH_OUTCOMES: IntCounterVec = IntCounterVec::new(
        Opts::new("arena_match_outcomes_total", "Finished matches by winner"),
        &["winner"]
    ).unwrap();

    /// Matches aborted because an agent chose an illegal action
    pub static ref ILLEGAL_ACTIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("arena_illegal_actions_total", "Illegal actions returned by a policy"),
        &["agent"]
    ).unwrap();

    /// Total turns applied across all matches
    pub static ref TURNS_TOTAL: IntCounter = IntCounter::with_opts(
        Opts::new("arena_turns_total", "Total turns applied across all matches")
    ).unwrap();

    // ========== Histograms ==========

    /// Number of turns per finished match
    pub static ref MATCH_TURNS: Histogram = Histogram::with_opts(
        HistogramOpts::new("arena_match_turns", "Number of turns per finished match")
            .buckets(vec![5.0, 10.0, 20.0, 40.0, 60.0, 80.0, 100.0, 150.0, 200.0])
    ).unwrap();

    /// States explored per decision (minimax nodes, MCTS simulations)
    pub static ref SEARCH_EXPLORED: HistogramVec = HistogramVec::new(
        HistogramOpts::new("arena_search_explored", "States explored per decision")
            .buckets(vec![1.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0, 10000.0, 50000.0]),
        &["algorithm"]
    ).unwrap();

    /// Wall-clock time per decision (seconds)
    pub static ref SEARCH_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new("arena_search_seconds", "Wall-clock time per decision")
            .buckets(vec![0.0001, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        &["algorithm"]
    ).unwrap();
}

static INIT: Once = Once::new();

/// Register every metric with the registry.
/// Safe to call multiple times - only initializes once.
pub fn init_metrics() {
    INIT.call_once(|| {
        let collectors: Vec<Box<dyn Collector>> = vec![
            Box::new(MATCHES_TOTAL.clone()),
            Box::new(MATCH_OUTCOMES.clone()),
            Box::new(ILLEGAL_ACTIONS.clone()),
            Box::new(TURNS_TOTAL.clone()),
            Box::new(MATCH_TURNS.clone()),
            Box::new(SEARCH_EXPLORED.clone()),
            Box::new(SEARCH_SECONDS.clone()),
        ];
        for collector in collectors {
            if let Err(e) = REGISTRY.register(collector) {
                warn!("Failed to register metric: {}", e);
            }
        }
    });
}

/// Record one applied decision.
pub fn record_decision(diagnostics: &SearchDiagnostics) {
    TURNS_TOTAL.inc();
    SEARCH_EXPLORED
        .with_label_values(&[diagnostics.algorithm.as_str()])
        .observe(diagnostics.explored as f64);
    SEARCH_SECONDS
        .with_label_values(&[diagnostics.algorithm.as_str()])
        .observe(diagnostics.elapsed_us as f64 / 1_000_000.0);
}

/// Record a finished match.
pub fn record_match(winner: Outcome, turns: u32) {
    MATCHES_TOTAL.inc();
    MATCH_OUTCOMES.with_label_values(&[winner.as_str()]).inc();
    MATCH_TURNS.observe(turns as f64);
}

pub fn record_illegal_action(agent: AgentId) {
    ILLEGAL_ACTIONS
        .with_label_values(&[agent.to_string().as_str()])
        .inc();
}

/// Encode all registered metrics in the Prometheus text format.
pub fn gather_text() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
