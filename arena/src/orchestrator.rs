//! Turn orchestrator.
//!
//! Owns the live `GameState` and both agents' policies. Each `step` asks the
//! agent to move for a decision, applies it, checks the state invariants and
//! only then notifies observers. Pacing is left to the caller.

use anyhow::{anyhow, bail, Context, Result};
use engine_core::{
    Action, ActionResult, AgentId, DecisionPolicy, GameError, GameState, HeuristicEvaluator,
    Outcome, SearchDiagnostics, Snapshot,
};
use mcts::MctsPolicy;
use minimax::MinimaxPolicy;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::events::{MatchEvent, Scores};
use crate::metrics;
use crate::observer::MatchObserver;
use crate::setup::MatchSetup;

/// Mixed into the match seed so the MCTS rollouts do not replay the board
/// generator's random stream.
const REACTIVE_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Builds the policy for one agent of a match from the match seed.
pub type PolicyFactory = Box<dyn Fn(AgentId, u64) -> Box<dyn DecisionPolicy> + Send>;

/// Minimax for the Strategist, seeded MCTS for the Reactive agent.
pub fn default_policies(setup: &MatchSetup) -> PolicyFactory {
    let evaluator = HeuristicEvaluator::new(setup.weights);
    let minimax = setup.minimax.clone();
    let mcts = setup.mcts.clone();
    Box::new(move |agent, seed| -> Box<dyn DecisionPolicy> {
        match agent {
            AgentId::Strategist => Box::new(MinimaxPolicy::new(evaluator, minimax.clone())),
            AgentId::Reactive => Box::new(MctsPolicy::with_seed(
                evaluator,
                mcts.clone(),
                seed ^ REACTIVE_SEED_SALT,
            )),
        }
    })
}

/// Inbound control commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Discard any current match and generate a new one. `None` draws a
    /// random seed.
    Start { seed: Option<u64> },
    /// Restart the current (or last) match from its seed.
    Reset,
}

/// What happened in one call to `step`.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRecord {
    pub match_id: u64,
    /// Turn counter after the action.
    pub turn: u32,
    pub agent: AgentId,
    pub action: Action,
    pub result: ActionResult,
    pub diagnostics: SearchDiagnostics,
    /// The match ended with this action.
    pub terminal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub match_id: u64,
    pub seed: u64,
    pub winner: Outcome,
    pub turns: u32,
    pub scores: Scores,
    /// Indexed by `AgentId::index`.
    pub nodes_controlled: [u32; 2],
    pub fuel: [u32; 2],
    /// Total states explored by each agent's searches.
    pub explored: [u64; 2],
}

struct LiveMatch {
    id: u64,
    seed: u64,
    state: GameState,
    policies: [Box<dyn DecisionPolicy>; 2],
    explored: [u64; 2],
    over: bool,
}

impl LiveMatch {
    fn scores(&self, evaluator: &HeuristicEvaluator) -> Scores {
        Scores {
            strategist: evaluator.agent_score(&self.state, AgentId::Strategist),
            reactive: evaluator.agent_score(&self.state, AgentId::Reactive),
        }
    }

    fn summary(&self, evaluator: &HeuristicEvaluator) -> MatchSummary {
        let agents = self.state.agents();
        MatchSummary {
            match_id: self.id,
            seed: self.seed,
            winner: self.state.winner(),
            turns: self.state.turn(),
            scores: self.scores(evaluator),
            nodes_controlled: [agents[0].nodes_controlled, agents[1].nodes_controlled],
            fuel: [agents[0].fuel, agents[1].fuel],
            explored: self.explored,
        }
    }
}

fn emit(observers: &mut [Box<dyn MatchObserver>], event: MatchEvent) {
    for observer in observers.iter_mut() {
        observer.on_event(&event);
    }
}

pub struct Orchestrator {
    setup: MatchSetup,
    evaluator: HeuristicEvaluator,
    factory: PolicyFactory,
    observers: Vec<Box<dyn MatchObserver>>,
    current: Option<LiveMatch>,
    last_seed: Option<u64>,
    matches_started: u64,
}

impl Orchestrator {
    pub fn new(setup: MatchSetup) -> Self {
        let factory = default_policies(&setup);
        Self::with_policy_factory(setup, factory)
    }

    pub fn with_policy_factory(setup: MatchSetup, factory: PolicyFactory) -> Self {
        Self {
            evaluator: HeuristicEvaluator::new(setup.weights),
            setup,
            factory,
            observers: Vec::new(),
            current: None,
            last_seed: None,
            matches_started: 0,
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn MatchObserver>) {
        self.observers.push(observer);
    }

    pub fn setup(&self) -> &MatchSetup {
        &self.setup
    }

    /// Live state of the current match, if any.
    pub fn state(&self) -> Option<&GameState> {
        self.current.as_ref().map(|m| &m.state)
    }

    pub fn match_id(&self) -> Option<u64> {
        self.current.as_ref().map(|m| m.id)
    }

    /// A match exists and has not ended.
    pub fn is_running(&self) -> bool {
        self.current.as_ref().is_some_and(|m| !m.over)
    }

    pub fn handle(&mut self, command: Command) -> Result<u64> {
        let seed = match command {
            Command::Start { seed } => seed.unwrap_or_else(rand::random),
            Command::Reset => self
                .current
                .as_ref()
                .map(|m| m.seed)
                .or(self.last_seed)
                .unwrap_or(self.setup.seed),
        };
        let state = GameState::generate(&self.setup.rules, seed)
            .with_context(|| format!("failed to build a match from seed {seed}"))?;
        Ok(self.load(state, seed))
    }

    /// Start a match from a prepared state (for example a parsed layout).
    /// Returns the new match id.
    pub fn load(&mut self, state: GameState, seed: u64) -> u64 {
        if let Some(old) = self.current.take() {
            if !old.over {
                info!(match_id = old.id, turn = old.state.turn(), "Discarding unfinished match");
            }
        }

        self.matches_started += 1;
        let id = self.matches_started;
        let policies = [
            (self.factory)(AgentId::Strategist, seed),
            (self.factory)(AgentId::Reactive, seed),
        ];
        let snapshot = Snapshot::capture(&state, &self.evaluator);
        let over = state.is_terminal();

        self.current = Some(LiveMatch {
            id,
            seed,
            state,
            policies,
            explored: [0, 0],
            over,
        });
        self.last_seed = Some(seed);

        emit(
            &mut self.observers,
            MatchEvent::GameStart {
                match_id: id,
                seed,
                snapshot: snapshot.clone(),
            },
        );

        // A state that is already decided ends the match on arrival.
        if let Some(live) = self.current.as_ref().filter(|m| m.over) {
            let summary = live.summary(&self.evaluator);
            info!(match_id = id, winner = ?summary.winner, "Loaded match is already over");
            emit(
                &mut self.observers,
                MatchEvent::GameOver {
                    match_id: id,
                    winner: summary.winner,
                    snapshot,
                    scores: summary.scores,
                },
            );
        }
        id
    }

    /// Advance the current match by one action.
    ///
    /// An illegal action or a broken invariant aborts the match: it is
    /// dropped and the error returned.
    pub fn step(&mut self) -> Result<TurnRecord> {
        let live = self
            .current
            .as_mut()
            .ok_or_else(|| anyhow!("no match in progress"))?;
        if live.over {
            bail!("match {} is over", live.id);
        }

        let match_id = live.id;
        let agent = live.state.active_player();
        let decision = live.policies[agent.index()].choose_action(&live.state);

        let applied = live
            .state
            .apply(decision.action, agent)
            .and_then(|result| live.state.check_invariants().map(|()| result));
        let result = match applied {
            Ok(result) => result,
            Err(e) => {
                if matches!(e, GameError::IllegalAction { .. }) {
                    metrics::record_illegal_action(agent);
                }
                error!(
                    match_id,
                    %agent,
                    action = %decision.action,
                    error = %e,
                    "Aborting match"
                );
                self.current = None;
                return Err(anyhow::Error::new(e).context(format!("match {match_id} aborted")));
            }
        };

        live.explored[agent.index()] += decision.diagnostics.explored;
        let turn = live.state.turn();
        let terminal = live.state.is_terminal();
        live.over = terminal;

        debug!(
            match_id,
            turn,
            %agent,
            action = %decision.action,
            policy = live.policies[agent.index()].name(),
            "Applied decision"
        );

        let snapshot = Snapshot::capture(&live.state, &self.evaluator);
        let record = TurnRecord {
            match_id,
            turn,
            agent,
            action: decision.action,
            result: result.clone(),
            diagnostics: decision.diagnostics.clone(),
            terminal,
        };

        if terminal {
            let summary = live.summary(&self.evaluator);
            emit(
                &mut self.observers,
                MatchEvent::Action {
                    match_id,
                    turn,
                    agent,
                    action: decision.action,
                    result,
                    snapshot: snapshot.clone(),
                    diagnostics: decision.diagnostics,
                },
            );
            emit(
                &mut self.observers,
                MatchEvent::GameOver {
                    match_id,
                    winner: summary.winner,
                    snapshot,
                    scores: summary.scores,
                },
            );
        } else {
            emit(
                &mut self.observers,
                MatchEvent::Action {
                    match_id,
                    turn,
                    agent,
                    action: decision.action,
                    result,
                    snapshot,
                    diagnostics: decision.diagnostics,
                },
            );
        }

        Ok(record)
    }

    /// Step until the current match ends.
    pub fn run_to_completion(&mut self) -> Result<MatchSummary> {
        while self.is_running() {
            self.step()?;
        }
        self.summary()
            .ok_or_else(|| anyhow!("no match in progress"))
    }

    /// Standing of the current match, finished or not.
    pub fn summary(&self) -> Option<MatchSummary> {
        self.current.as_ref().map(|m| m.summary(&self.evaluator))
    }

    /// Drop the current match without emitting anything.
    pub fn abandon(&mut self) {
        if let Some(old) = self.current.take() {
            warn!(match_id = old.id, turn = old.state.turn(), "Match abandoned");
        }
    }
}
