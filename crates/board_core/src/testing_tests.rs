use super::*;
use crate::verify::{round_trip_all, verify};

#[test]
fn test_line_two_has_single_move() {
    let board = LineBoard::new("line-2");
    let moves = board.legal_moves();
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].to_string(), "A->B");
}

#[test]
fn test_line_stacking_preserves_order_on_unmake() {
    let mut board = LineBoard::new("line-5");
    let history = [
        LineMove { player: 0, from: 0, to: 2 },
        LineMove { player: 1, from: 4, to: 2 },
    ];
    for mv in &history {
        board.execute(mv).unwrap();
    }
    assert_eq!(board.stack(2), &[0, 1]);

    // player 0 lifts out from under player 1's piece
    let mv = LineMove { player: 0, from: 2, to: 4 };
    let before = board.clone();
    let undo = board.make_move(&mv);
    assert!(board.win_for_player(0));
    board.unmake_move(&mv, undo);
    assert_eq!(board, before);
    assert_eq!(board.digest(), before.digest());
}

#[test]
fn test_unknown_game_type_rejected() {
    let mut board = LineBoard::new("line-3");
    assert!(matches!(
        board.init("line-99", 0),
        Err(ConfigError::UnknownGameType(_))
    ));
    let mut nim = NimBoard::new("nim-3");
    assert!(nim.init("chess", 0).is_err());
}

#[test]
fn test_nim_moves_and_win() {
    let mut board = NimBoard::new("nim-2");
    assert_eq!(board.legal_moves().len(), 2);
    board.execute(&NimMove { player: 0, take: 2 }).unwrap();
    assert!(board.game_over());
    assert!(board.win_for_player(0));
    assert!(board.legal_moves().is_empty());
    assert_eq!(nim_eval(&board, 0), WIN_THRESHOLD);
}

#[test]
fn test_toy_boards_round_trip_and_replay() {
    let mut line = LineBoard::new("line-6");
    let mut history = Vec::new();
    while !line.game_over() {
        round_trip_all(&line).unwrap();
        let mv = line.legal_moves()[0];
        line.execute(&mv).unwrap();
        history.push(mv);
    }
    verify(&line, &history).unwrap();

    let mut nim = NimBoard::new("nim-9");
    let mut history = Vec::new();
    while !nim.game_over() {
        round_trip_all(&nim).unwrap();
        let moves = nim.legal_moves();
        let mv = moves[moves.len() - 1];
        nim.execute(&mv).unwrap();
        history.push(mv);
    }
    verify(&nim, &history).unwrap();
}

#[test]
fn test_line_eval_prefers_progress() {
    let mut board = LineBoard::new("line-5");
    assert_eq!(line_eval(&board, 0), 0.0);
    board.execute(&LineMove { player: 0, from: 0, to: 2 }).unwrap();
    assert!(line_eval(&board, 0) > 0.0);
    assert!(line_eval(&board, 1) < 0.0);
}

#[test]
fn test_moves_are_generated_for_the_player_to_move() {
    let mut nim = NimBoard::new("nim-7");
    let mut line = LineBoard::new("line-7");
    for _ in 0..4 {
        let turn = nim.whose_turn();
        let moves = nim.legal_moves();
        assert!(moves.iter().all(|m| m.player() == turn));
        nim.execute(&moves[0]).unwrap();

        let turn = line.whose_turn();
        let moves = line.legal_moves();
        assert!(moves.iter().all(|m| m.player() == turn));
        line.execute(&moves[0]).unwrap();
    }
    assert_eq!(nim.whose_turn(), 0);
}
