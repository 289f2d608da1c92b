use std::time::{Duration, Instant};

use board_core::testing::{LineBoard, NimBoard, NimMove};
use board_core::{BoardState, Engine, SearchLimits, spawn_search};
use mcts_engine::{FinalSelection, MctsConfig, MctsEngine, PruneRule, UniformPlayout, search_mcts};

#[test]
fn test_single_legal_move_returned_without_search() {
    let board = LineBoard::new("line-2");
    let mut engine = MctsEngine::new(UniformPlayout);
    let result = engine.search(&board, SearchLimits::default()).unwrap();
    assert_eq!(result.best_move.unwrap().to_string(), "A->B");
    assert_eq!(result.nodes, 0);
}

/// Run `search_mcts` `runs` times; returns the shortest and longest wall time.
fn timed_runs<B: BoardState>(board: &B, budget_ms: u64, config: &MctsConfig, runs: usize) -> (Duration, Duration) {
    let mut fastest = Duration::MAX;
    let mut slowest = Duration::ZERO;
    for _ in 0..runs {
        let start = Instant::now();
        let mv = search_mcts(board, UniformPlayout, budget_ms, config.clone()).unwrap();
        let elapsed = start.elapsed();
        assert!(board.legal_moves().contains(&mv));
        fastest = fastest.min(elapsed);
        slowest = slowest.max(elapsed);
    }
    (fastest, slowest)
}

#[test]
fn test_search_mcts_respects_time_budget() {
    let board = LineBoard::new("line-16");
    let (_, slowest) = timed_runs(&board, 100, &MctsConfig::default(), 5);
    assert!(slowest < Duration::from_millis(600), "worst run took {slowest:?}");
}

#[test]
fn test_search_mcts_time_bound_with_pruning_disabled() {
    let board = NimBoard::new("nim-40");
    let config = MctsConfig {
        kill_hopeless_children_share: 0.0,
        ..MctsConfig::default()
    };
    let (fastest, slowest) = timed_runs(&board, 80, &config, 5);
    assert!(fastest >= Duration::from_millis(80), "best run took {fastest:?}");
    assert!(slowest < Duration::from_millis(580), "worst run took {slowest:?}");
}

#[test]
fn test_engine_plays_legal_game() {
    let mut board = NimBoard::new("nim-21");
    let mut engine = MctsEngine::with_config(UniformPlayout, MctsConfig::deterministic(300, 11));
    while !board.game_over() {
        let result = engine.search(&board, SearchLimits::default()).unwrap();
        let mv = result.best_move.unwrap();
        assert!(board.legal_moves().contains(&mv));
        board.execute(&mv).unwrap();
    }
    let finished = engine.search(&board, SearchLimits::default()).unwrap();
    assert!(finished.best_move.is_none());
}

#[test]
fn test_reproducible_with_seed() {
    let board = LineBoard::new("line-10");
    let config = MctsConfig {
        kill_hopeless_children_share: 0.0,
        ..MctsConfig::deterministic(500, 21)
    };
    let mut a = MctsEngine::with_config(UniformPlayout, config.clone());
    let mut b = MctsEngine::with_config(UniformPlayout, config);
    let ra = a.search(&board, SearchLimits::default()).unwrap();
    let rb = b.search(&board, SearchLimits::default()).unwrap();
    assert_eq!(ra.best_move, rb.best_move);
    assert_eq!(ra.nodes, 500);
    assert_eq!(ra.score, rb.score);
}

#[test]
fn test_root_parallel_engine() {
    let board = NimBoard::new("nim-7");
    let config = MctsConfig {
        threads: 3,
        ..MctsConfig::deterministic(1500, 5)
    };
    let mut engine = MctsEngine::with_config(UniformPlayout, config);
    let result = engine.search(&board, SearchLimits::default()).unwrap();
    assert_eq!(result.best_move, Some(NimMove { player: 0, take: 3 }));
}

#[test]
fn test_abort_from_another_thread() {
    let board = NimBoard::new("nim-60");
    let config = MctsConfig {
        time_per_move_ms: 60_000,
        ..MctsConfig::default()
    };
    let engine = MctsEngine::with_config(UniformPlayout, config);
    let start = Instant::now();
    let handle = spawn_search(engine, &board, SearchLimits::default());
    std::thread::sleep(Duration::from_millis(30));
    handle.abort();
    let finished = handle.join();
    let result = finished.result.unwrap();
    assert!(result.stopped);
    assert!(result.best_move.is_some());
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_config_from_toml() {
    let config: MctsConfig = toml::from_str(
        r#"
            exploration = 0.7
            node_expansion_rate = 1.0
            final_selection = "best_value"
            max_simulations = 2000
            threads = 2
        "#,
    )
    .unwrap();
    assert_eq!(config.exploration, 0.7);
    assert_eq!(config.final_selection, FinalSelection::BestValue);
    assert_eq!(config.max_simulations, Some(2000));
    assert_eq!(config.uct_tree_depth, 3);
    assert_eq!(config.stored_child_limit, 100_000);
}

#[test]
fn test_pruning_and_jitter_from_toml() {
    let config: MctsConfig = toml::from_str(
        r#"
            prune_rule = "win_rate"
            win_randomization = 2.0
            only_child_optimization = false
        "#,
    )
    .unwrap();
    assert_eq!(config.prune_rule, PruneRule::WinRate);
    assert_eq!(config.win_randomization, 2.0);
    assert!(!config.only_child_optimization);
    assert!(MctsConfig::default().only_child_optimization);
    assert_eq!(MctsConfig::default().prune_rule, PruneRule::Visits);
}

#[test]
fn test_randomized_engine_varies_but_stays_legal() {
    let board = NimBoard::new("nim-9");
    let mut picks = std::collections::HashSet::new();
    for seed in 0..12 {
        let config = MctsConfig {
            win_randomization: 3.0,
            ..MctsConfig::deterministic(300, seed)
        };
        let mut engine = MctsEngine::with_config(UniformPlayout, config);
        let result = engine.search(&board, SearchLimits::default()).unwrap();
        let mv = result.best_move.unwrap();
        assert!(board.legal_moves().contains(&mv));
        picks.insert(mv.take);
    }
    assert!(picks.len() > 1);
}

#[test]
fn test_winning_move_ends_search_early() {
    let board = NimBoard::new("nim-2");
    let mut engine = MctsEngine::with_config(UniformPlayout, MctsConfig::deterministic(5000, 8));
    let result = engine.search(&board, SearchLimits::default()).unwrap();
    assert_eq!(result.best_move, Some(NimMove { player: 0, take: 2 }));
    assert!(result.nodes < 5000);
}
