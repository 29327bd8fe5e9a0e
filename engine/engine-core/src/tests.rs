//! Rule scenarios exercised through the public `GameState` API.

use super::*;

fn rules() -> RulesConfig {
    RulesConfig::default().with_regen(0, 0)
}

fn load(map: &str) -> GameState {
    Layout::parse(map).unwrap().into_state(&rules()).unwrap()
}

fn play(state: &mut GameState, actions: &[Action]) {
    for &action in actions {
        let agent = state.active_player();
        state
            .apply(action, agent)
            .unwrap_or_else(|e| panic!("{action} failed: {e}"));
    }
}

const N: Action = Action::Move(Direction::North);
const E: Action = Action::Move(Direction::East);
const S: Action = Action::Move(Direction::South);
const W: Action = Action::Move(Direction::West);

#[test]
fn test_canonical_action_order() {
    let mut state = load(
        "
        . . . . .
        . . N . .
        . . S . .
        . . . . .
        . . . . R
        ",
    );
    play(&mut state, &[N, Action::Wait]);
    assert_eq!(
        state.legal_actions(AgentId::Strategist),
        vec![Action::ControlNode, N, E, S, W, Action::Wait]
    );
}

#[test]
fn test_blocking_terrain() {
    let state = load(
        "
        . W .
        T S #
        . . R
        ",
    );
    assert_eq!(
        state.legal_actions(AgentId::Strategist),
        vec![S, Action::Wait]
    );
}

#[test]
fn test_cannot_move_onto_opponent() {
    let mut state = load(
        "
        S R .
        . . .
        . . .
        ",
    );
    assert!(!state.legal_actions(AgentId::Strategist).contains(&E));
    let err = state.apply(E, AgentId::Strategist).unwrap_err();
    assert!(matches!(err, GameError::IllegalAction { .. }));
    assert_eq!(state.turn(), 0);
}

#[test]
fn test_wrong_turn_is_rejected() {
    let mut state = load("S . .\n. . .\n. . R");
    let err = state.apply(Action::Wait, AgentId::Reactive).unwrap_err();
    assert!(err.to_string().contains("turn"));
    assert_eq!(state.turn(), 0);
    assert_eq!(state.active_player(), AgentId::Strategist);
}

#[test]
fn test_move_costs_fuel_and_alternates() {
    let mut state = load("S . .\n. . .\n. . R");
    let result = state.apply(E, AgentId::Strategist).unwrap();
    assert_eq!(
        result,
        ActionResult::Moved {
            from: Position::new(0, 0),
            to: Position::new(1, 0),
            fuel_cost: 1,
            fuel_after: 9,
        }
    );
    assert_eq!(state.turn(), 1);
    assert_eq!(state.active_player(), AgentId::Reactive);
    assert_eq!(state.agent(AgentId::Reactive).fuel, 10);
}

#[test]
fn test_door_opens_then_admits() {
    let mut state = load(
        "
        S D .
        . # .
        . . R
        ",
    );
    let door = Position::new(1, 0);
    assert!(!state.has_line_of_sight(Position::new(0, 0), Position::new(2, 0)));

    let result = state.apply(E, AgentId::Strategist).unwrap();
    assert_eq!(
        result,
        ActionResult::DoorOpened {
            door,
            fuel_cost: 1,
            fuel_after: 9,
        }
    );
    assert_eq!(state.agent(AgentId::Strategist).position, Position::new(0, 0));
    assert!(state.is_door_open(door));
    assert!(state.has_line_of_sight(Position::new(0, 0), Position::new(2, 0)));

    play(&mut state, &[Action::Wait, E]);
    assert_eq!(state.agent(AgentId::Strategist).position, door);
    assert_eq!(state.agent(AgentId::Strategist).fuel, 8);
}

#[test]
fn test_refuel_transfers_bounded_amount() {
    let mut state = Layout::parse("S F .\n. . .\n. . R")
        .unwrap()
        .with_fuel(AgentId::Strategist, 8)
        .into_state(&rules())
        .unwrap();
    play(&mut state, &[E, Action::Wait]);
    let result = state.apply(Action::Refuel, AgentId::Strategist).unwrap();
    assert_eq!(
        result,
        ActionResult::Refueled {
            station: Position::new(1, 0),
            amount: 5,
            fuel_after: 12,
            station_remaining: 10,
        }
    );
}

#[test]
fn test_refuel_capped_by_tank() {
    let mut state = Layout::parse("S F .\n. . .\n. . R")
        .unwrap()
        .with_fuel(AgentId::Strategist, 19)
        .into_state(&rules())
        .unwrap();
    play(&mut state, &[E, Action::Wait, Action::Refuel]);
    assert_eq!(state.agent(AgentId::Strategist).fuel, 20);
    assert_eq!(state.stations()[0].current, 13);
}

#[test]
fn test_empty_station_cannot_refuel() {
    let rules = RulesConfig {
        station_capacity: 3,
        ..rules()
    };
    let mut state = Layout::parse("S F .\n. . .\n. . R")
        .unwrap()
        .with_fuel(AgentId::Strategist, 5)
        .into_state(&rules)
        .unwrap();
    play(&mut state, &[E, Action::Wait, Action::Refuel, Action::Wait]);
    assert_eq!(state.agent(AgentId::Strategist).fuel, 7);
    assert!(!state.stations()[0].is_active());
    assert!(!state
        .legal_actions(AgentId::Strategist)
        .contains(&Action::Refuel));
    assert!(state.apply(Action::Refuel, AgentId::Strategist).is_err());
}

#[test]
fn test_station_regeneration_is_capped() {
    let rules = RulesConfig {
        station_capacity: 3,
        ..RulesConfig::default().with_regen(2, 1)
    };
    let mut state = Layout::parse("S F .\n. . .\n. . R")
        .unwrap()
        .into_state(&rules)
        .unwrap();

    play(&mut state, &[E, Action::Wait]);
    assert_eq!(state.stations()[0].current, 3);

    play(&mut state, &[Action::Refuel]);
    assert_eq!(state.stations()[0].current, 0);

    let mut seen = Vec::new();
    for _ in 0..8 {
        play(&mut state, &[Action::Wait]);
        seen.push(state.stations()[0].current);
    }
    // turns 4..=11: regen on even turns only
    assert_eq!(seen, vec![1, 1, 2, 2, 3, 3, 3, 3]);
}

#[test]
fn test_immediate_capture_changes_only_ownership() {
    let mut state = load(
        "
        S N .
        . . .
        N . R
        ",
    );
    play(&mut state, &[E, Action::Wait]);
    let before = state.clone();

    let result = state.apply(Action::ControlNode, AgentId::Strategist).unwrap();
    assert_eq!(
        result,
        ActionResult::NodeControlled {
            node: Position::new(1, 0),
            previous_owner: None,
            new_owner: AgentId::Strategist,
            fuel_cost: 0,
            fuel_after: 9,
        }
    );

    let me = state.agent(AgentId::Strategist);
    assert_eq!(me.nodes_controlled, 1);
    assert_eq!(me.fuel, before.agent(AgentId::Strategist).fuel);
    assert_eq!(me.position, before.agent(AgentId::Strategist).position);
    assert_eq!(state.agent(AgentId::Reactive), before.agent(AgentId::Reactive));
    assert_eq!(state.stations(), before.stations());
    assert_eq!(state.doors(), before.doors());
    assert_eq!(state.nodes()[1], before.nodes()[1]);
    assert_eq!(state.nodes()[0].controlled_by, Some(AgentId::Strategist));
    assert!(!state.is_terminal());
}

#[test]
fn test_capture_from_opponent() {
    let mut state = Layout::parse("S N .\n. . .\nN . R")
        .unwrap()
        .with_owner(Position::new(1, 0), AgentId::Reactive)
        .into_state(&rules())
        .unwrap();
    assert_eq!(state.agent(AgentId::Reactive).nodes_controlled, 1);

    play(&mut state, &[E, Action::Wait]);
    let result = state.apply(Action::ControlNode, AgentId::Strategist).unwrap();
    assert!(matches!(
        result,
        ActionResult::NodeControlled {
            previous_owner: Some(AgentId::Reactive),
            fuel_cost: 1,
            fuel_after: 8,
            ..
        }
    ));
    assert_eq!(state.agent(AgentId::Strategist).nodes_controlled, 1);
    assert_eq!(state.agent(AgentId::Reactive).nodes_controlled, 0);
}

#[test]
fn test_own_node_cannot_be_controlled_again() {
    let mut state = load("S N .\n. . .\nN . R");
    play(&mut state, &[E, Action::Wait, Action::ControlNode, Action::Wait]);
    assert!(!state
        .legal_actions(AgentId::Strategist)
        .contains(&Action::ControlNode));
}

#[test]
fn test_stranded_agent_can_only_wait() {
    let mut state = Layout::parse("S N .\n. . .\nN . R")
        .unwrap()
        .with_fuel(AgentId::Strategist, 0)
        .into_state(&rules())
        .unwrap();
    assert_eq!(state.legal_actions(AgentId::Strategist), vec![Action::Wait]);

    let err = state.apply(E, AgentId::Strategist).unwrap_err();
    assert!(matches!(err, GameError::IllegalAction { .. }));
    assert_eq!(state.agent(AgentId::Strategist).fuel, 0);
    assert_eq!(state.turn(), 0);

    state.apply(Action::Wait, AgentId::Strategist).unwrap();
    assert_eq!(state.turn(), 1);
}

#[test]
fn test_stranded_agent_cannot_capture() {
    let mut state = Layout::parse("S N .\n. . .\nN . R")
        .unwrap()
        .with_fuel(AgentId::Strategist, 1)
        .with_owner(Position::new(1, 0), AgentId::Reactive)
        .into_state(&rules())
        .unwrap();
    play(&mut state, &[E, Action::Wait]);
    assert_eq!(state.agent(AgentId::Strategist).fuel, 0);
    assert_eq!(state.legal_actions(AgentId::Strategist), vec![Action::Wait]);
}

#[test]
fn test_terminates_after_max_turns() {
    let rules = RulesConfig::default().with_max_turns(4);
    let mut state = GameState::generate(&rules, 1).unwrap();
    let mut applied = 0;
    while !state.is_terminal() {
        let agent = state.active_player();
        state.apply(Action::Wait, agent).unwrap();
        applied += 1;
    }
    assert_eq!(applied, 4);
    assert_eq!(state.turn(), 4);
    let agent = state.active_player();
    assert!(state.apply(Action::Wait, agent).is_err());
}

#[test]
fn test_early_victory() {
    let mut state = load("S N .\n. . .\n. . R");
    play(&mut state, &[E, Action::Wait, Action::ControlNode]);
    assert!(state.is_terminal());
    assert_eq!(state.dominant_agent(), Some(AgentId::Strategist));
    assert_eq!(state.winner(), Outcome::Strategist);
    assert!(state.apply(Action::Wait, AgentId::Reactive).is_err());

    let rules = rules().with_early_victory(false);
    let mut state = Layout::parse("S N .\n. . .\n. . R")
        .unwrap()
        .into_state(&rules)
        .unwrap();
    play(&mut state, &[E, Action::Wait, Action::ControlNode]);
    assert!(!state.is_terminal());
}

#[test]
fn test_winner_tie_breaks() {
    let map = "S N .\n. . .\nN . R";
    let by_fuel = Layout::parse(map)
        .unwrap()
        .with_fuel(AgentId::Strategist, 12)
        .into_state(&rules())
        .unwrap();
    assert_eq!(by_fuel.winner(), Outcome::Strategist);

    let draw = load(map);
    assert_eq!(draw.winner(), Outcome::Draw);

    let by_nodes = Layout::parse(map)
        .unwrap()
        .with_fuel(AgentId::Strategist, 20)
        .with_owner(Position::new(0, 2), AgentId::Reactive)
        .into_state(&rules())
        .unwrap();
    assert_eq!(by_nodes.winner(), Outcome::Reactive);
}

#[test]
fn test_clone_isolation() {
    let original = GameState::generate(&RulesConfig::default(), 9).unwrap();
    let mut copy = original.clone();
    let action = copy.legal_actions(AgentId::Strategist)[0];
    copy.apply(action, AgentId::Strategist).unwrap();

    assert_eq!(original.turn(), 0);
    assert_eq!(original.active_player(), AgentId::Strategist);
    assert_eq!(original.agent(AgentId::Strategist).fuel, 10);
    assert_ne!(copy.turn(), original.turn());
}

fn random_playout(seed: u64) -> (GameState, Vec<Action>) {
    let mut state = GameState::generate(&RulesConfig::default(), seed).unwrap();
    let mut policy = RandomPolicy::with_seed(seed);
    let mut history = Vec::new();
    while !state.is_terminal() {
        let decision = policy.choose_action(&state);
        let agent = state.active_player();
        state.apply(decision.action, agent).unwrap();
        state.check_invariants().unwrap();
        history.push(decision.action);
    }
    (state, history)
}

#[test]
fn test_seeded_playout_is_deterministic() {
    let (a, ha) = random_playout(21);
    let (b, hb) = random_playout(21);
    assert_eq!(ha, hb);
    assert_eq!(render(&a), render(&b));
    assert_eq!(a.agents(), b.agents());
    assert_eq!(a.nodes(), b.nodes());
}

#[test]
fn test_invariants_hold_under_random_play() {
    for seed in 0..10 {
        let (state, history) = random_playout(seed);
        assert_eq!(history.len() as u32, state.turn());
        let owned = state
            .nodes()
            .iter()
            .filter(|n| n.controlled_by.is_some())
            .count() as u32;
        let cached: u32 = state.agents().iter().map(|a| a.nodes_controlled).sum();
        assert_eq!(owned, cached);
        assert!(cached as usize <= state.nodes().len());
        for agent in state.agents() {
            assert!(agent.fuel <= state.rules().max_fuel);
        }
    }
}
