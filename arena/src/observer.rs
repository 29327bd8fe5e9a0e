//! Match observers.
//!
//! The orchestrator hands every event to each registered observer after the
//! state change it describes is complete.

use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::events::MatchEvent;
use crate::metrics;

pub trait MatchObserver: Send {
    fn on_event(&mut self, event: &MatchEvent);
}

/// Writes one JSON object per line. Write errors are logged, not raised,
/// so a broken pipe never stops a match.
pub struct JsonLinesObserver<W: Write> {
    writer: W,
    written: u64,
}

impl<W: Write> JsonLinesObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of events written successfully.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_event(&mut self, event: &MatchEvent) -> Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> MatchObserver for JsonLinesObserver<W> {
    fn on_event(&mut self, event: &MatchEvent) {
        match self.write_event(event) {
            Ok(()) => self.written += 1,
            Err(e) => warn!(kind = event.kind(), "Failed to write event: {}", e),
        }
    }
}

/// In-memory event list. Clones share the same storage, so a test can keep
/// one handle and give the other to the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<MatchEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<MatchEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn events(&self) -> Vec<MatchEvent> {
        self.lock().clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.lock().iter().map(MatchEvent::kind).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl MatchObserver for EventLog {
    fn on_event(&mut self, event: &MatchEvent) {
        self.lock().push(event.clone());
    }
}

/// Structured log lines: match lifecycle at info, every turn at debug and a
/// progress line every `log_interval` turns (0 disables it).
pub struct TracingObserver {
    log_interval: u32,
}

impl TracingObserver {
    pub fn new(log_interval: u32) -> Self {
        Self { log_interval }
    }
}

impl MatchObserver for TracingObserver {
    fn on_event(&mut self, event: &MatchEvent) {
        match event {
            MatchEvent::GameStart {
                match_id,
                seed,
                snapshot,
            } => {
                info!(
                    match_id,
                    seed,
                    size = snapshot.size,
                    nodes = snapshot.nodes.len(),
                    stations = snapshot.stations.len(),
                    max_turns = snapshot.max_turns,
                    "Match started"
                );
            }
            MatchEvent::Action {
                match_id,
                turn,
                agent,
                action,
                diagnostics,
                snapshot,
                ..
            } => {
                debug!(
                    match_id,
                    turn,
                    %agent,
                    %action,
                    explored = diagnostics.explored,
                    value = diagnostics.value,
                    elapsed_us = diagnostics.elapsed_us,
                    "Turn applied"
                );
                if self.log_interval > 0 && turn % self.log_interval == 0 {
                    let standing: Vec<String> = snapshot
                        .agents
                        .iter()
                        .map(|a| format!("{} nodes={} fuel={}", a.id, a.nodes_controlled, a.fuel))
                        .collect();
                    info!(
                        match_id,
                        "Turn {}/{}: {}",
                        turn,
                        snapshot.max_turns,
                        standing.join(", ")
                    );
                }
            }
            MatchEvent::GameOver {
                match_id,
                winner,
                snapshot,
                scores,
            } => {
                info!(
                    match_id,
                    winner = winner.as_str(),
                    turns = snapshot.turn,
                    strategist_score = scores.strategist,
                    reactive_score = scores.reactive,
                    "Match finished"
                );
            }
        }
    }
}

/// Feeds the Prometheus counters and histograms.
#[derive(Debug, Default)]
pub struct MetricsObserver;

impl MatchObserver for MetricsObserver {
    fn on_event(&mut self, event: &MatchEvent) {
        match event {
            MatchEvent::GameStart { .. } => {}
            MatchEvent::Action { diagnostics, .. } => metrics::record_decision(diagnostics),
            MatchEvent::GameOver {
                winner, snapshot, ..
            } => metrics::record_match(*winner, snapshot.turn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{GameState, HeuristicEvaluator, Outcome, RulesConfig, Snapshot};

    use crate::events::Scores;

    fn start_event(match_id: u64) -> MatchEvent {
        let state = GameState::generate(&RulesConfig::default(), match_id).unwrap();
        MatchEvent::GameStart {
            match_id,
            seed: match_id,
            snapshot: Snapshot::capture(&state, &HeuristicEvaluator::default()),
        }
    }

    /// Writer that always fails.
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_json_lines_one_object_per_line() {
        let mut observer = JsonLinesObserver::new(Vec::new());
        observer.on_event(&start_event(1));
        observer.on_event(&start_event(2));
        assert_eq!(observer.written(), 2);

        let text = String::from_utf8(observer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        for (i, line) in lines.iter().enumerate() {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["type"], "game_start");
            assert_eq!(value["match_id"], i as u64 + 1);
        }
    }

    #[test]
    fn test_json_lines_survives_write_errors() {
        let mut observer = JsonLinesObserver::new(Broken);
        observer.on_event(&start_event(1));
        assert_eq!(observer.written(), 0);
    }

    #[test]
    fn test_event_log_clones_share_storage() {
        let log = EventLog::new();
        let mut handle = log.clone();
        assert!(log.is_empty());

        handle.on_event(&start_event(4));
        assert_eq!(log.len(), 1);
        assert_eq!(log.kinds(), vec!["game_start"]);
        assert_eq!(log.events()[0].match_id(), 4);

        log.clear();
        assert!(handle.is_empty());
    }

    #[test]
    fn test_metrics_observer_counts_finished_matches() {
        metrics::init_metrics();
        let before = metrics::MATCH_OUTCOMES.with_label_values(&["strategist"]).get();

        let snapshot = start_event(5).snapshot().clone();
        let mut observer = MetricsObserver;
        observer.on_event(&MatchEvent::GameOver {
            match_id: 5,
            winner: Outcome::Strategist,
            snapshot,
            scores: Scores {
                strategist: 1.0,
                reactive: 0.0,
            },
        });

        assert!(metrics::MATCH_OUTCOMES.with_label_values(&["strategist"]).get() > before);
    }

    #[test]
    fn test_tracing_observer_handles_every_kind() {
        let mut observer = TracingObserver::new(1);
        let event = start_event(6);
        observer.on_event(&event);
        observer.on_event(&MatchEvent::GameOver {
            match_id: 6,
            winner: Outcome::Draw,
            snapshot: event.snapshot().clone(),
            scores: Scores {
                strategist: 0.0,
                reactive: 0.0,
            },
        });
    }
}
