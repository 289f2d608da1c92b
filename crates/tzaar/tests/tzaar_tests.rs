//! Contract-level tests of the Tzaar board together with the search drivers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

use alphabeta_engine::{AlphaBetaConfig, AlphaBetaEngine, search_alpha_beta};
use board_core::{
    BoardState, Engine, GameSession, MoveRecord, SearchLimits, perft, round_trip, verify,
};
use mcts_engine::{MctsConfig, MctsEngine, search_mcts};
use random_engine::RandomEngine;
use tzaar::{
    ChipCatalog, TzaarBoard, TzaarEvaluator, TzaarMove, TzaarPlayout, VARIANT_FIXED,
    VARIANT_RANDOM,
};

// =============================================================================
// Digest
// =============================================================================

#[test]
fn test_no_collisions_among_single_move_perturbations() {
    const TARGET: usize = 10_000;
    let mut seen: HashMap<u64, TzaarBoard> = HashMap::with_capacity(TARGET);
    let mut perturbations = 0;
    let mut seed = 0;

    while perturbations < TARGET {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = TzaarBoard::new(VARIANT_RANDOM, seed).unwrap();
        seed += 1;
        while !board.game_over() && perturbations < TARGET {
            let base = board.digest();
            let moves = board.legal_moves();
            for mv in &moves {
                let mut next = board.clone();
                next.make_move(mv);
                let d = next.digest();
                assert_ne!(d, base, "{mv} did not change the digest");
                if let Some(prev) = seen.get(&d) {
                    assert!(prev.same_state(&next), "digest collision {d:#018x}");
                } else {
                    seen.insert(d, next);
                }
                perturbations += 1;
            }
            let mv = moves.choose(&mut rng).copied().unwrap();
            board.make_move(&mv);
        }
    }
    assert!(seen.len() > TARGET / 2);
}

#[test]
fn test_digest_is_reproducible_across_catalogs() {
    let shared = Arc::new(ChipCatalog::new());
    let a = TzaarBoard::with_catalog(shared.clone(), VARIANT_RANDOM, 99).unwrap();
    let b = TzaarBoard::new(VARIANT_RANDOM, 99).unwrap();
    assert_eq!(a.digest(), b.digest());
    assert_eq!(a.digest(), a.clone().digest());
    assert_eq!(Arc::strong_count(&shared), 2);
}

// =============================================================================
// Copy/verify harness
// =============================================================================

#[test]
fn test_perft_with_round_trips() {
    let mut board = TzaarBoard::new(VARIANT_FIXED, 0).unwrap();
    let before = board.digest();
    assert_eq!(perft(&mut board, 1).unwrap(), board.legal_moves().len() as u64);
    let deep = perft(&mut board, 3).unwrap();
    assert!(deep > 0);
    assert_eq!(board.digest(), before);
}

#[test]
fn test_random_games_replay_cleanly() {
    (0..32u64).into_par_iter().for_each(|seed| {
        let variant = if seed % 2 == 0 { VARIANT_FIXED } else { VARIANT_RANDOM };
        let mut session = GameSession::new(TzaarBoard::new(variant, seed).unwrap());
        let mut engine = RandomEngine::seeded(seed);
        while !session.board().game_over() {
            let board = session.search_copy();
            let mover = board.whose_turn();
            assert!(board.legal_moves().iter().all(|m| m.player() == mover));
            let mv = engine
                .search(&board, SearchLimits::default())
                .unwrap()
                .best_move
                .unwrap();
            round_trip(session.board(), &mv).unwrap();
            session.apply(mv).unwrap();
        }
        session.verify().unwrap();
        let finished = session.board().clone();
        assert!(finished.win_for_player(0) ^ finished.win_for_player(1));
        assert_eq!(finished.chip_count(), 18);

        while session.undo().is_some() {}
        assert!(session.board().same_state(&TzaarBoard::new(variant, seed).unwrap()));
    });
}

#[test]
fn test_undo_redo_through_session() {
    let mut session = GameSession::new(TzaarBoard::new(VARIANT_FIXED, 0).unwrap());
    for _ in 0..4 {
        let mv = session.board().legal_moves()[0];
        session.apply(mv).unwrap();
    }
    let end = session.board().digest();
    session.undo();
    session.undo();
    assert_eq!(session.history().len(), 2);
    session.redo().unwrap();
    session.redo().unwrap();
    assert_eq!(session.board().digest(), end);
    assert!(!session.can_redo());
    let (board, history) = session.into_parts();
    verify(&board, &history).unwrap();
}

#[test]
fn test_resignation_replays() {
    let mut board = TzaarBoard::new(VARIANT_FIXED, 0).unwrap();
    let first = board.legal_moves()[0];
    board.execute(&first).unwrap();
    let resign = TzaarMove::Resign { player: 1 };
    board.execute(&resign).unwrap();
    assert!(board.win_for_player(0));
    verify(&board, &[first, resign]).unwrap();
}

// =============================================================================
// Search drivers on Tzaar
// =============================================================================

#[test]
fn test_alpha_beta_plays_legal_moves() {
    let mut board = TzaarBoard::new(VARIANT_FIXED, 0).unwrap();
    let mut history = Vec::new();
    for _ in 0..6 {
        if board.game_over() {
            break;
        }
        let mv = search_alpha_beta(&board, TzaarEvaluator, 2, 0).unwrap();
        assert!(board.legal_moves().contains(&mv));
        board.execute(&mv).unwrap();
        history.push(mv);
    }
    verify(&board, &history).unwrap();
}

#[test]
fn test_alpha_beta_randomized_opening() {
    let board = TzaarBoard::new(VARIANT_FIXED, 0).unwrap();
    let config = AlphaBetaConfig {
        depth: 1,
        random_plies: 4,
        seed: Some(5),
        ..AlphaBetaConfig::default()
    };
    let mut engine = AlphaBetaEngine::with_config(TzaarEvaluator, config);
    let result = engine.search(&board, SearchLimits::depth(1)).unwrap();
    assert!(board.legal_moves().contains(&result.best_move.unwrap()));
}

#[test]
fn test_mcts_returns_within_budget() {
    let board = TzaarBoard::new(VARIANT_RANDOM, 4).unwrap();
    let start = Instant::now();
    let mv = search_mcts(&board, TzaarPlayout::default(), 150, MctsConfig::default());
    let elapsed = start.elapsed();
    if board.game_over() {
        assert!(mv.is_none());
    } else {
        assert!(board.legal_moves().contains(&mv.unwrap()));
    }
    assert!(elapsed < Duration::from_millis(650), "took {elapsed:?}");
}

#[test]
fn test_mcts_plays_a_full_game() {
    let mut board = TzaarBoard::new(VARIANT_FIXED, 0).unwrap();
    let mut engine = MctsEngine::with_config(
        TzaarPlayout::default(),
        MctsConfig {
            playout_depth_limit: 12,
            ..MctsConfig::deterministic(200, 17)
        },
    );
    let mut history = Vec::new();
    while !board.game_over() {
        let mv = engine
            .search(&board, SearchLimits::default())
            .unwrap()
            .best_move
            .unwrap();
        board.execute(&mv).unwrap();
        history.push(mv);
    }
    verify(&board, &history).unwrap();
}
