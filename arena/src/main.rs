//! Arena - Fuel Dominion match runner
//!
//! A process that:
//! 1. Loads rules and search settings (config.toml, env, CLI)
//! 2. Plays the requested number of seeded matches, one turn at a time
//! 3. Streams every event to the log and optionally to a JSON-lines file
//! 4. Stops cleanly between turns on Ctrl+C

use anyhow::{Context, Result};
use arena::{
    metrics, play_match, Config, JsonLinesObserver, MatchEnd, MetricsObserver, Orchestrator,
    TracingObserver,
};
use clap::Parser;
use engine_core::Outcome;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

fn progress_bar(matches: u32) -> Option<ProgressBar> {
    if matches < 2 || !std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        return None;
    }
    let pb = ProgressBar::new(matches as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} matches ({eta})")
        .map(|style| style.progress_chars("#>-"));
    match style {
        Ok(style) => pb.set_style(style),
        Err(e) => warn!("Invalid progress template: {}", e),
    }
    Some(pb)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse and validate configuration
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;
    metrics::init_metrics();
    info!(log_level = %config.log_level, "Tracing initialized");

    let setup = config.match_setup();
    info!(
        grid_size = setup.rules.grid_size,
        max_turns = setup.rules.max_turns,
        depth = setup.minimax.depth,
        simulations = setup.mcts.num_simulations,
        matches = config.matches,
        seed = config.seed,
        "Arena starting"
    );

    let mut orchestrator = Orchestrator::new(setup);
    orchestrator.add_observer(Box::new(TracingObserver::new(config.log_interval)));
    orchestrator.add_observer(Box::new(MetricsObserver));
    if let Some(path) = config.events_path() {
        let file = File::create(&path)
            .with_context(|| format!("failed to create events file {}", path.display()))?;
        info!("Writing match events to {}", path.display());
        orchestrator.add_observer(Box::new(JsonLinesObserver::new(BufWriter::new(file))));
    }

    // Setup graceful shutdown
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = Arc::clone(&shutdown);
    let shutdown_handle = tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received, finishing current turn...");
                shutdown_flag.store(true, Ordering::Relaxed);
            }
            Err(e) => warn!("Failed to listen for ctrl+c: {}", e),
        }
    });

    let progress = progress_bar(config.matches);
    let mut outcomes: HashMap<Outcome, u32> = HashMap::new();
    let mut failures = 0u32;

    for index in 0..config.matches {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }
        let seed = config.seed.wrapping_add(index as u64);

        match play_match(&mut orchestrator, seed, config.turn_delay(), &shutdown).await {
            Ok(MatchEnd::Finished(summary)) => {
                *outcomes.entry(summary.winner).or_default() += 1;
                let line = serde_json::to_string(&summary)?;
                match progress {
                    Some(ref pb) => pb.suspend(|| info!("Match summary: {}", line)),
                    None => info!("Match summary: {}", line),
                }
            }
            Ok(MatchEnd::Interrupted { match_id, turn }) => {
                info!(match_id, turn, "Match interrupted");
                break;
            }
            Err(e) => {
                failures += 1;
                error!(seed, "Match failed: {:#}", e);
            }
        }

        if let Some(ref pb) = progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_with_message("done");
    }
    shutdown_handle.abort();

    info!(
        strategist = outcomes.get(&Outcome::Strategist).copied().unwrap_or(0),
        reactive = outcomes.get(&Outcome::Reactive).copied().unwrap_or(0),
        draws = outcomes.get(&Outcome::Draw).copied().unwrap_or(0),
        failures,
        "Arena finished"
    );

    if config.print_metrics {
        info!("Metrics:\n{}", metrics::gather_text());
    }

    Ok(())
}
