//! Async match driver: paces `Orchestrator::step` calls and honours a
//! shutdown flag between turns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::orchestrator::{Command, MatchSummary, Orchestrator};

/// How one paced match ended.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchEnd {
    Finished(MatchSummary),
    /// Shutdown was requested before the match ended.
    Interrupted { match_id: u64, turn: u32 },
}

/// Play one match from `seed`, sleeping `turn_delay` between turns.
///
/// The delay only spaces out `step` calls; outcomes are the same with or
/// without it. Errors from `step` abort the match and are returned.
pub async fn play_match(
    orchestrator: &mut Orchestrator,
    seed: u64,
    turn_delay: Duration,
    shutdown: &AtomicBool,
) -> Result<MatchEnd> {
    let match_id = orchestrator.handle(Command::Start { seed: Some(seed) })?;

    while orchestrator.is_running() {
        if shutdown.load(Ordering::Relaxed) {
            let turn = orchestrator.state().map_or(0, |s| s.turn());
            info!(match_id, turn, "Shutdown requested, stopping match");
            orchestrator.abandon();
            return Ok(MatchEnd::Interrupted { match_id, turn });
        }

        let record = orchestrator.step()?;
        if !record.terminal && !turn_delay.is_zero() {
            tokio::time::sleep(turn_delay).await;
        }
    }

    match orchestrator.summary() {
        Some(summary) => Ok(MatchEnd::Finished(summary)),
        None => Err(anyhow::anyhow!("match {match_id} vanished before it ended")),
    }
}
