use super::*;
use board_core::testing::{LineBoard, NimBoard, NimMove, line_eval, nim_eval};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn run<B, E>(board: &B, evaluator: E, config: &AlphaBetaConfig, depth: u32) -> SearchOutcome<B::Move>
where
    B: BoardState,
    E: Evaluator<B>,
{
    let mut nodes = 0;
    let tc = TimeControl::new(None);
    tc.start();
    let mut rng = StdRng::seed_from_u64(7);
    pick_best_move(board, &evaluator, config, depth, &mut nodes, &tc, &mut rng).unwrap()
}

#[test]
fn test_pick_best_move_single_legal_move() {
    let board = LineBoard::new("line-2");
    let outcome = run(&board, line_eval, &AlphaBetaConfig::default(), 1);
    let (mv, _) = outcome.best_move.unwrap();
    assert_eq!(mv.to_string(), "A->B");
}

#[test]
fn test_pick_best_move_takes_immediate_win() {
    let board = NimBoard::new("nim-3");
    let outcome = run(&board, nim_eval, &AlphaBetaConfig::default(), 3);
    let (mv, score) = outcome.best_move.unwrap();
    assert_eq!(mv, NimMove { player: 0, take: 3 });
    assert!(is_win(score));
    // A forced win ends iterative deepening after the first iteration
    assert_eq!(outcome.depth, 1);
}

#[test]
fn test_pick_best_move_leaves_multiple_of_four() {
    for (stones, take) in [(5, 1), (6, 2), (7, 3), (9, 1)] {
        let board = NimBoard::new(&format!("nim-{stones}"));
        let outcome = run(&board, nim_eval, &AlphaBetaConfig::default(), 6);
        let (mv, score) = outcome.best_move.unwrap();
        assert_eq!(mv.take, take, "nim-{stones}");
        assert!(is_win(score));
    }
}

#[test]
fn test_prefers_shallower_win() {
    // line-5: 0->2 then 2->4 wins; the slow path 0->1 also wins later
    let board = LineBoard::new("line-5");
    let outcome = run(&board, line_eval, &AlphaBetaConfig::default(), 3);
    let (mv, score) = outcome.best_move.unwrap();
    assert_eq!(mv.to, 2);
    assert!(is_win(score));
}

#[test]
fn test_game_over_returns_nothing() {
    let mut board = NimBoard::new("nim-1");
    board.execute(&NimMove { player: 0, take: 1 }).unwrap();
    let outcome = run(&board, nim_eval, &AlphaBetaConfig::default(), 3);
    assert!(outcome.best_move.is_none());
    assert!(!outcome.stopped);
}

#[test]
fn test_stopped_before_first_iteration() {
    let board = NimBoard::new("nim-20");
    let mut nodes = 0;
    let tc = TimeControl::new(None);
    tc.stop();
    let mut rng = StdRng::seed_from_u64(1);
    let outcome = pick_best_move(
        &board,
        &nim_eval,
        &AlphaBetaConfig::default(),
        8,
        &mut nodes,
        &tc,
        &mut rng,
    )
    .unwrap();
    assert!(outcome.stopped);
    assert!(outcome.best_move.is_none());
}

#[test]
fn test_randomized_opening_stays_within_top_candidates() {
    let board = NimBoard::new("nim-6");
    let config = AlphaBetaConfig {
        random_plies: 3,
        ..AlphaBetaConfig::default()
    };
    let mut seen = std::collections::HashSet::new();
    for seed in 0..32 {
        let mut nodes = 0;
        let tc = TimeControl::new(None);
        let mut rng = StdRng::seed_from_u64(seed);
        let outcome =
            pick_best_move(&board, &nim_eval, &config, 6, &mut nodes, &tc, &mut rng).unwrap();
        let (mv, score) = outcome.best_move.unwrap();
        // Only "take 2" wins, and a forced win is never traded away
        assert_eq!(mv.take, 2);
        assert!(is_win(score));
        seen.insert(mv.take);
    }
    assert_eq!(seen.len(), 1);
}

#[test]
fn test_randomized_opening_varies_without_forced_win() {
    let board = LineBoard::new("line-12");
    let config = AlphaBetaConfig {
        random_plies: 4,
        ..AlphaBetaConfig::default()
    };
    let mut seen = std::collections::HashSet::new();
    for seed in 0..64 {
        let mut nodes = 0;
        let tc = TimeControl::new(None);
        let mut rng = StdRng::seed_from_u64(seed);
        let outcome =
            pick_best_move(&board, &line_eval, &config, 2, &mut nodes, &tc, &mut rng).unwrap();
        seen.insert(outcome.best_move.unwrap().0.to);
    }
    assert_eq!(seen.len(), 2);
}

#[test]
fn test_margin_excludes_weak_candidates() {
    let scored = vec![("a", 10.0), ("b", 9.5), ("c", 2.0)];
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..32 {
        let (mv, _) = choose_randomized(scored.clone(), 3, 1.0, &mut rng).unwrap();
        assert_ne!(mv, "c");
    }
}
