//! Move generation.
//!
//! A stack moves in a straight line over empty cells to the first occupied
//! cell. It captures that stack if it belongs to the opponent and is no
//! taller; during the second action it may also land on an own stack.

use board_core::{BoardState, CellId, Direction, PlayerId, ray};

use crate::board::{Phase, TzaarBoard};
use crate::moves::TzaarMove;

/// Append the legal moves of the player to move, in cell then direction
/// order, with `Pass` last when allowed.
pub fn generate(board: &TzaarBoard, out: &mut Vec<TzaarMove>) {
    let player = board.whose_turn();
    let stacking = match board.phase() {
        Phase::GameOver => return,
        Phase::Capture => false,
        Phase::SecondAction => true,
    };
    for from in board.grid().cells() {
        if board.owner(from) == Some(player) {
            moves_from(board, from, stacking, out);
        }
    }
    if stacking {
        out.push(TzaarMove::Pass { player });
    }
}

/// Moves of the stack on `from`, which must belong to the player to move.
pub fn moves_from(board: &TzaarBoard, from: CellId, stacking: bool, out: &mut Vec<TzaarMove>) {
    let Some(player) = board.owner(from) else {
        return;
    };
    let height = board.height(from);
    let grid = board.grid();
    for dir in 0..grid.num_directions() {
        let Some(to) = first_occupied(board, from, dir) else {
            continue;
        };
        if board.owner(to) == Some(player) {
            if stacking {
                out.push(TzaarMove::Stack { player, from, to });
            }
        } else if board.height(to) <= height {
            out.push(TzaarMove::Capture { player, from, to });
        }
    }
}

/// Whether `player` has at least one capture available.
pub fn has_capture(board: &TzaarBoard, player: PlayerId) -> bool {
    let grid = board.grid();
    grid.cells()
        .filter(|&from| board.owner(from) == Some(player))
        .any(|from| {
            let height = board.height(from);
            (0..grid.num_directions()).any(|dir| {
                first_occupied(board, from, dir)
                    .is_some_and(|to| board.owner(to) != Some(player) && board.height(to) <= height)
            })
        })
}

fn first_occupied(board: &TzaarBoard, from: CellId, dir: Direction) -> Option<CellId> {
    ray(board.grid(), from, dir).find(|&c| board.height(c) > 0)
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
