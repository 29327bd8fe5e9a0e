//! Tests for the configuration module.

use super::*;
use tempfile::tempdir;

#[test]
fn test_default_config() {
    let config = CentralConfig::default();
    assert_eq!(config.common.log_level, "info");
    assert_eq!(config.common.seed, 42);
    assert_eq!(config.game.grid_size, 12);
    assert_eq!(config.game.max_turns, 100);
    assert_eq!(config.minimax.depth, 3);
    assert_eq!(config.mcts.num_simulations, 100);
    assert_eq!(config.arena.matches, 1);
}

#[test]
fn test_game_defaults() {
    let config = CentralConfig::default();
    assert!(config.game.early_victory);
    assert_eq!(config.game.num_walls, 15);
    assert_eq!(config.game.num_doors, 5);
    assert_eq!(config.game.num_windows, 8);
    assert_eq!(config.game.num_trees, 6);
    assert_eq!(config.game.num_fuel_stations, 4);
    assert_eq!(config.game.num_light_nodes, 10);
    assert_eq!(config.game.min_spacing, 1);
    assert_eq!(config.game.agent_clearance, 3);
}

#[test]
fn test_fuel_defaults() {
    let config = CentralConfig::default();
    assert_eq!(config.fuel.initial, 10);
    assert_eq!(config.fuel.max, 20);
    assert_eq!(config.fuel.move_cost, 1);
    assert_eq!(config.fuel.control_cost, 0);
    assert_eq!(config.fuel.capture_cost, 1);
    assert_eq!(config.fuel.refuel_amount, 5);
    assert_eq!(config.fuel.station_capacity, 15);
    assert_eq!(config.fuel.regen_interval, 5);
    assert_eq!(config.fuel.regen_amount, 1);
}

#[test]
fn test_scoring_defaults() {
    let config = CentralConfig::default();
    assert!((config.scoring.node_weight - 10.0).abs() < f32::EPSILON);
    assert!((config.scoring.fuel_weight - 2.0).abs() < f32::EPSILON);
    assert!((config.scoring.proximity_weight - 1.0).abs() < f32::EPSILON);
    assert!((config.scoring.sight_weight - 0.5).abs() < f32::EPSILON);
    assert!((config.scoring.outcome_weight - 100.0).abs() < f32::EPSILON);
}

#[test]
fn test_search_defaults() {
    let config = CentralConfig::default();
    assert!(config.minimax.pruning);
    assert!(config.minimax.move_ordering);
    assert!(!config.minimax.parallel_root);
    assert_eq!(config.minimax.time_limit_ms, 0);
    assert!((config.mcts.exploration - 1.414).abs() < f64::EPSILON);
    assert_eq!(config.mcts.rollout_depth, 10);
    assert!((config.mcts.reward_scale - 10.0).abs() < f32::EPSILON);
    assert_eq!(config.mcts.time_limit_ms, 0);
}

#[test]
fn test_arena_defaults() {
    let config = CentralConfig::default();
    assert_eq!(config.arena.turn_delay_ms, 0);
    assert!(config.arena.events_path.is_empty());
    assert_eq!(config.arena.log_interval, 10);
}

#[test]
fn test_dominion_env_overrides() {
    std::env::set_var("DOMINION_GAME_GRID_SIZE", "16");
    std::env::set_var("DOMINION_GAME_EARLY_VICTORY", "false");
    std::env::set_var("DOMINION_FUEL_MOVE_COST", "2");
    std::env::set_var("DOMINION_MCTS_EXPLORATION", "0.5");
    std::env::set_var("DOMINION_ARENA_EVENTS_PATH", "events.jsonl");
    std::env::set_var("DOMINION_MINIMAX_DEPTH", "not-a-number");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.game.grid_size, 16);
    assert!(!config.game.early_victory);
    assert_eq!(config.fuel.move_cost, 2);
    assert!((config.mcts.exploration - 0.5).abs() < f64::EPSILON);
    assert_eq!(config.arena.events_path, "events.jsonl");
    // Unparseable values leave the default in place.
    assert_eq!(config.minimax.depth, 3);

    std::env::remove_var("DOMINION_GAME_GRID_SIZE");
    std::env::remove_var("DOMINION_GAME_EARLY_VICTORY");
    std::env::remove_var("DOMINION_FUEL_MOVE_COST");
    std::env::remove_var("DOMINION_MCTS_EXPLORATION");
    std::env::remove_var("DOMINION_ARENA_EVENTS_PATH");
    std::env::remove_var("DOMINION_MINIMAX_DEPTH");
}

#[test]
fn test_parse_config_toml() {
    let toml_content = r#"
[common]
seed = 7

[game]
grid_size = 10
num_light_nodes = 3

[fuel]
initial = 5
max = 8

[minimax]
depth = 5
parallel_root = true

[arena]
matches = 4
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.common.seed, 7);
    assert_eq!(config.game.grid_size, 10);
    assert_eq!(config.game.num_light_nodes, 3);
    assert_eq!(config.fuel.initial, 5);
    assert_eq!(config.fuel.max, 8);
    assert_eq!(config.minimax.depth, 5);
    assert!(config.minimax.parallel_root);
    assert_eq!(config.arena.matches, 4);
}

#[test]
fn test_partial_config() {
    let toml_content = r#"
[game]
max_turns = 40
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.game.max_turns, 40);
    assert_eq!(config.game.grid_size, 12); // Default
    assert_eq!(config.fuel.max, 20); // Default
    assert_eq!(config.common.log_level, "info"); // Default
}

#[test]
fn test_load_from_path_reads_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[mcts]\nnum_simulations = 321\n").unwrap();

    let config = load_from_path(&path);
    assert_eq!(config.mcts.num_simulations, 321);
    assert_eq!(config.mcts.rollout_depth, 10);
}

#[test]
fn test_load_from_path_falls_back_on_bad_input() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    assert_eq!(load_from_path(&missing).fuel.max, 20);

    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[game\ngrid_size = ").unwrap();
    assert_eq!(load_from_path(&path).game.max_turns, 100);
}

#[test]
fn test_config_clone() {
    let config = CentralConfig::default();
    let cloned = config.clone();
    assert_eq!(config.common.seed, cloned.common.seed);
    assert_eq!(config.arena.events_path, cloned.arena.events_path);
}
