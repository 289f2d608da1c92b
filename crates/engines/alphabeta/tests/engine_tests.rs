use std::time::{Duration, Instant};

use alphabeta_engine::{AlphaBetaConfig, AlphaBetaEngine, Difficulty, search_alpha_beta};
use board_core::testing::{LineBoard, NimBoard, NimMove, line_eval, nim_eval};
use board_core::{
    BoardState, ConfigError, ConsistencyError, Engine, InvariantViolation, PlayerId,
    SearchLimits, spawn_search,
};

// =============================================================================
// Entry point
// =============================================================================

#[test]
fn test_search_alpha_beta_single_move() {
    let board = LineBoard::new("line-2");
    let mv = search_alpha_beta(&board, line_eval, 1, 0).unwrap();
    assert_eq!(mv.to_string(), "A->B");
}

#[test]
fn test_search_alpha_beta_returns_legal_moves() {
    let mut board = LineBoard::new("line-9");
    while !board.game_over() {
        let mv = search_alpha_beta(&board, line_eval, 3, 2).unwrap();
        assert!(board.legal_moves().contains(&mv));
        board.execute(&mv).unwrap();
    }
    assert!(board.win_for_player(0) ^ board.win_for_player(1));
}

#[test]
fn test_engine_reports_statistics() {
    let board = NimBoard::new("nim-9");
    let mut engine = AlphaBetaEngine::with_config(nim_eval, AlphaBetaConfig::with_depth(6));
    let result = engine.search(&board, SearchLimits::depth(6)).unwrap();
    assert_eq!(result.best_move, Some(NimMove { player: 0, take: 1 }));
    assert!(result.nodes > 0);
    assert!(!result.stopped);
    assert!(result.depth >= 1);
}

#[test]
fn test_limits_depth_caps_config_depth() {
    let board = NimBoard::new("nim-9");
    let mut engine = AlphaBetaEngine::with_config(nim_eval, AlphaBetaConfig::with_depth(7));
    let result = engine.search(&board, SearchLimits::depth(2)).unwrap();
    assert_eq!(result.depth, 2);
}

#[test]
fn test_time_limited_search_returns_promptly() {
    // Too deep to finish: iterative deepening must be cut by the clock
    let board = NimBoard::new("nim-64");
    let config = AlphaBetaConfig {
        depth: 40,
        check_interval: 64,
        verify_unmake: false,
        ..AlphaBetaConfig::default()
    };
    let mut engine = AlphaBetaEngine::with_config(nim_eval, config);
    let start = Instant::now();
    let result = engine
        .search(&board, SearchLimits::time(Duration::from_millis(50)))
        .unwrap();
    assert!(start.elapsed() < Duration::from_millis(1000));
    assert!(result.stopped);
    assert!(result.best_move.is_some());
}

#[test]
fn test_abort_from_another_thread() {
    let board = NimBoard::new("nim-64");
    let config = AlphaBetaConfig {
        depth: 40,
        check_interval: 64,
        ..AlphaBetaConfig::default()
    };
    let engine = AlphaBetaEngine::with_config(nim_eval, config);
    let limits = SearchLimits::depth(40);
    let handle = spawn_search(engine, &board, limits);
    std::thread::sleep(Duration::from_millis(30));
    handle.abort();
    let finished = handle.join();
    let result = finished.result.unwrap();
    assert!(result.stopped);
    assert!(finished.engine.is_some());
}

#[test]
fn test_difficulty_depths() {
    assert_eq!(Difficulty::Easy.depth(), 3);
    assert_eq!(Difficulty::Medium.depth(), 5);
    assert_eq!(Difficulty::Hard.depth(), 6);
    assert_eq!(Difficulty::Expert.depth(), 7);
}

#[test]
fn test_config_from_toml() {
    let config: AlphaBetaConfig = toml::from_str(
        r#"
            difficulty = "hard"
            random_plies = 4
            seed = 11
        "#,
    )
    .unwrap();
    assert_eq!(config.effective_depth(), 6);
    assert_eq!(config.random_plies, 4);
    assert_eq!(config.seed, Some(11));
    assert_eq!(config.check_interval, 1024);
}

// =============================================================================
// Contract violations
// =============================================================================

/// Nim whose unmake forgets to restore the heap when taking three.
#[derive(Debug, Clone, PartialEq)]
struct SloppyNim(NimBoard);

impl BoardState for SloppyNim {
    type Move = NimMove;
    type Undo = ();

    fn init(&mut self, game_type: &str, seed: u64) -> Result<(), ConfigError> {
        self.0.init(game_type, seed)
    }
    fn game_type(&self) -> &str {
        self.0.game_type()
    }
    fn random_seed(&self) -> u64 {
        self.0.random_seed()
    }
    fn num_players(&self) -> usize {
        2
    }
    fn whose_turn(&self) -> PlayerId {
        self.0.whose_turn()
    }
    fn move_number(&self) -> u32 {
        self.0.move_number()
    }
    fn game_over(&self) -> bool {
        self.0.game_over()
    }
    fn win_for_player(&self, player: PlayerId) -> bool {
        self.0.win_for_player(player)
    }
    fn digest(&self) -> u64 {
        self.0.digest()
    }
    fn same_state(&self, other: &Self) -> bool {
        self == other
    }
    fn legal_moves_into(&self, moves: &mut Vec<NimMove>) {
        self.0.legal_moves_into(moves)
    }
    fn make_move(&mut self, mv: &NimMove) {
        self.0.make_move(mv)
    }
    fn unmake_move(&mut self, mv: &NimMove, undo: ()) {
        if mv.take == 3 {
            let partial = NimMove { take: 2, ..*mv };
            self.0.unmake_move(&partial, undo)
        } else {
            self.0.unmake_move(mv, undo)
        }
    }
}

/// Nim that claims to be in progress with no moves left.
#[derive(Debug, Clone, PartialEq)]
struct StuckNim(NimBoard);

impl BoardState for StuckNim {
    type Move = NimMove;
    type Undo = ();

    fn init(&mut self, game_type: &str, seed: u64) -> Result<(), ConfigError> {
        self.0.init(game_type, seed)
    }
    fn game_type(&self) -> &str {
        self.0.game_type()
    }
    fn random_seed(&self) -> u64 {
        self.0.random_seed()
    }
    fn num_players(&self) -> usize {
        2
    }
    fn whose_turn(&self) -> PlayerId {
        self.0.whose_turn()
    }
    fn move_number(&self) -> u32 {
        self.0.move_number()
    }
    fn game_over(&self) -> bool {
        false
    }
    fn win_for_player(&self, player: PlayerId) -> bool {
        self.0.win_for_player(player)
    }
    fn digest(&self) -> u64 {
        self.0.digest()
    }
    fn same_state(&self, other: &Self) -> bool {
        self == other
    }
    fn legal_moves_into(&self, moves: &mut Vec<NimMove>) {
        self.0.legal_moves_into(moves)
    }
    fn make_move(&mut self, mv: &NimMove) {
        self.0.make_move(mv)
    }
    fn unmake_move(&mut self, mv: &NimMove, undo: ()) {
        self.0.unmake_move(mv, undo)
    }
}

#[test]
fn test_verify_unmake_reports_round_trip_failure() {
    let board = SloppyNim(NimBoard::new("nim-8"));
    let config = AlphaBetaConfig {
        verify_unmake: true,
        ..AlphaBetaConfig::with_depth(2)
    };
    let mut engine = AlphaBetaEngine::with_config(
        |b: &SloppyNim, p: PlayerId| nim_eval(&b.0, p),
        config,
    );
    let err = engine.search(&board, SearchLimits::depth(2)).unwrap_err();
    assert!(matches!(
        err,
        InvariantViolation::Inconsistent(ConsistencyError::RoundTrip { .. })
    ));
}

#[test]
fn test_missing_moves_at_live_node_is_violation() {
    // Every line empties the heap within four plies
    let board = StuckNim(NimBoard::new("nim-4"));
    let mut engine = AlphaBetaEngine::with_config(
        |b: &StuckNim, p: PlayerId| nim_eval(&b.0, p),
        AlphaBetaConfig::with_depth(4),
    );
    let err = engine.search(&board, SearchLimits::depth(4)).unwrap_err();
    assert!(matches!(err, InvariantViolation::NoLegalMoves { .. }));
}
