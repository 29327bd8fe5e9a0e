//! Outbound match events.
//!
//! Every event serializes as one JSON object whose `type` field names the
//! variant (`game_start`, `action`, `game_over`).

use engine_core::{Action, ActionResult, AgentId, Outcome, SearchDiagnostics, Snapshot};
use serde::{Deserialize, Serialize};

/// Final heuristic score of each agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub strategist: f32,
    pub reactive: f32,
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    GameStart {
        match_id: u64,
        seed: u64,
        snapshot: Snapshot,
    },
    Action {
        match_id: u64,
        /// Turn counter after the action (1 for the opening move).
        turn: u32,
        agent: AgentId,
        action: Action,
        result: ActionResult,
        snapshot: Snapshot,
        diagnostics: SearchDiagnostics,
    },
    GameOver {
        match_id: u64,
        winner: Outcome,
        snapshot: Snapshot,
        scores: Scores,
    },
}

impl MatchEvent {
    pub fn match_id(&self) -> u64 {
        match self {
            MatchEvent::GameStart { match_id, .. }
            | MatchEvent::Action { match_id, .. }
            | MatchEvent::GameOver { match_id, .. } => *match_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MatchEvent::GameStart { .. } => "game_start",
            MatchEvent::Action { .. } => "action",
            MatchEvent::GameOver { .. } => "game_over",
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        match self {
            MatchEvent::GameStart { snapshot, .. }
            | MatchEvent::Action { snapshot, .. }
            | MatchEvent::GameOver { snapshot, .. } => snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{Direction, GameState, HeuristicEvaluator, Position, RulesConfig, StopReason};

    fn snapshot() -> Snapshot {
        let state = GameState::generate(&RulesConfig::default(), 11).unwrap();
        Snapshot::capture(&state, &HeuristicEvaluator::default())
    }

    #[test]
    fn test_game_start_json_shape() {
        let event = MatchEvent::GameStart {
            match_id: 1,
            seed: 11,
            snapshot: snapshot(),
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "game_start");
        assert_eq!(json["match_id"], 1);
        assert_eq!(json["seed"], 11);
        assert_eq!(json["snapshot"]["size"], 12);
        assert_eq!(json["snapshot"]["agents"].as_array().unwrap().len(), 2);
        assert_eq!(event.kind(), "game_start");
    }

    #[test]
    fn test_action_json_shape() {
        let from = Position::new(1, 1);
        let event = MatchEvent::Action {
            match_id: 3,
            turn: 1,
            agent: AgentId::Strategist,
            action: Action::Move(Direction::East),
            result: ActionResult::Moved {
                from,
                to: from.step(Direction::East),
                fuel_cost: 1,
                fuel_after: 9,
            },
            snapshot: snapshot(),
            diagnostics: SearchDiagnostics::new("minimax", StopReason::Completed),
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "action");
        assert_eq!(json["agent"], "strategist");
        assert_eq!(json["action"]["move"], "east");
        assert_eq!(json["result"]["kind"], "moved");
        assert_eq!(json["result"]["fuel_after"], 9);
        assert_eq!(json["diagnostics"]["algorithm"], "minimax");
        assert_eq!(json["diagnostics"]["stop_reason"], "completed");
        assert_eq!(event.match_id(), 3);
    }

    #[test]
    fn test_game_over_round_trips() {
        let event = MatchEvent::GameOver {
            match_id: 2,
            winner: Outcome::Draw,
            snapshot: snapshot(),
            scores: Scores {
                strategist: 12.5,
                reactive: 4.0,
            },
        };
        let line = serde_json::to_string(&event).unwrap();
        assert!(line.contains(r#""type":"game_over""#));
        assert!(line.contains(r#""winner":"draw""#));

        let back: MatchEvent = serde_json::from_str(&line).unwrap();
        assert_eq!(back, event);
    }
}
