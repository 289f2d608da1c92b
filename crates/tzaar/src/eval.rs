use board_core::{BoardState, Evaluator, PlayerId, WIN_THRESHOLD};

use crate::board::TzaarBoard;
use crate::chip::NUM_KINDS;

const SUM_WEIGHT: f64 = 5.0;
const TOTAL_WEIGHT: f64 = 0.10;
const MAX_WEIGHT: f64 = 0.5;

/// Positional strength of `player`, always non-negative.
///
/// Grows with the number of stacks of the weakest kind, with tall stacks
/// (fourth power of the tallest per kind), with the chips under control and
/// with stacks beyond the weakest kind's count.
pub fn score_for_player(board: &TzaarBoard, player: PlayerId) -> f64 {
    let mut tallest = [0usize; NUM_KINDS];
    let mut power = [0usize; NUM_KINDS];
    let mut count = [0usize; NUM_KINDS];

    for cell in board.grid().cells() {
        if let Some(top) = board.top(cell)
            && top.owner == player
        {
            let kind = top.kind.index();
            let height = board.height(cell);
            count[kind] += 1;
            power[kind] += height;
            tallest[kind] = tallest[kind].max(height * height);
        }
    }

    let low = count.iter().copied().min().unwrap_or(0);
    let mut score = SUM_WEIGHT * (low * low) as f64;
    for kind in 0..NUM_KINDS {
        let t = tallest[kind] as f64;
        let excess = (count[kind] - low) as f64;
        score += MAX_WEIGHT * t * t
            + TOTAL_WEIGHT * (power[kind] * count[kind]) as f64
            + SUM_WEIGHT * excess / (count[kind] + 1) as f64;
    }
    score
}

/// Static evaluator for alpha-beta: own strength minus the opponent's, or a
/// forced win/loss once the game is decided.
#[derive(Debug, Clone, Copy, Default)]
pub struct TzaarEvaluator;

impl Evaluator<TzaarBoard> for TzaarEvaluator {
    fn evaluate(&self, board: &TzaarBoard, player: PlayerId) -> f64 {
        if board.win_for_player(player) {
            return WIN_THRESHOLD;
        }
        if board.win_for_player(1 - player) {
            return -WIN_THRESHOLD;
        }
        score_for_player(board, player) - score_for_player(board, 1 - player)
    }
}
