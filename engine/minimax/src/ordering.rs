//! Action ordering heuristic.
//!
//! Captures first, then moves that bring the agent closer to a node it does
//! not own, then refuelling, then waiting. The sort is stable, so ties keep
//! the canonical `legal_actions` order and the search stays deterministic.

use engine_core::{Action, GameState};

fn priority(state: &GameState, action: Action) -> (u8, u32) {
    let mover = state.active_player();
    match action {
        Action::ControlNode => (0, 0),
        Action::Move(dir) => {
            let dest = state.agent(mover).position.step(dir);
            let dist = state
                .target_distance_from(dest, mover)
                .unwrap_or(u32::MAX);
            (1, dist)
        }
        Action::Refuel => (2, 0),
        Action::Wait => (3, 0),
    }
}

/// Legal actions of the player to move, optionally reordered.
pub fn ordered_actions(state: &GameState, reorder: bool) -> Vec<Action> {
    let mut actions = state.legal_actions(state.active_player());
    if reorder {
        actions.sort_by_key(|&a| priority(state, a));
    }
    actions
}
