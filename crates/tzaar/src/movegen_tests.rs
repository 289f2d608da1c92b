use super::*;
use crate::board::VARIANT_FIXED;
use board_core::{BoardState, MoveRecord, neighbors};

#[test]
fn test_opening_captures_are_adjacent_enemy_pairs() {
    let board = TzaarBoard::new(VARIANT_FIXED, 0).unwrap();
    let grid = board.grid();
    // On a full board every first occupied cell is a neighbor
    let expected: usize = grid
        .cells()
        .filter(|&c| board.owner(c) == Some(0))
        .map(|c| neighbors(grid, c).filter(|&n| board.owner(n) == Some(1)).count())
        .sum();
    let moves = board.legal_moves();
    assert_eq!(moves.len(), expected);
    assert!(has_capture(&board, 0));
    assert!(has_capture(&board, 1));
}

#[test]
fn test_generation_order_is_stable() {
    let board = TzaarBoard::new(VARIANT_FIXED, 0).unwrap();
    let mut a = Vec::new();
    let mut b = Vec::new();
    generate(&board, &mut a);
    generate(&board.clone(), &mut b);
    assert_eq!(a, b);
    let froms: Vec<CellId> = a.iter().filter_map(|m| m.from_to()).map(|(f, _)| f).collect();
    assert!(froms.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_moves_from_empty_cell() {
    let mut board = TzaarBoard::new(VARIANT_FIXED, 0).unwrap();
    let mv = board.legal_moves()[0];
    board.make_move(&mv);
    let (from, _) = mv.from_to().unwrap();
    let mut out = Vec::new();
    moves_from(&board, from, true, &mut out);
    assert!(out.is_empty());
}

#[test]
fn test_every_generated_move_is_accepted() {
    let mut board = TzaarBoard::new(crate::board::VARIANT_RANDOM, 3).unwrap();
    for step in 0..40 {
        if board.game_over() {
            break;
        }
        let moves = board.legal_moves();
        for mv in &moves {
            assert_eq!(mv.player(), board.whose_turn());
            let mut copy = board.clone();
            copy.execute(mv).unwrap();
        }
        board.make_move(&moves[step % moves.len()]);
    }
}
