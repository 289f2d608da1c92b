//! Playout knowledge for the MCTS driver.

use board_core::{BoardState, PlayerId};
use mcts_engine::{PlayoutPolicy, terminal_score};
use serde::{Deserialize, Serialize};

use crate::board::{Phase, TzaarBoard};
use crate::chip::NUM_KINDS;
use crate::eval::score_for_player;
use crate::movegen;
use crate::moves::TzaarMove;

/// Which legal moves random playouts skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InhibitionConfig {
    /// Skip stacking that covers the last stack topped by one of the mover's kinds
    pub protect_last_of_kind: bool,
    /// Skip stacking that builds a stack taller than this (0 = no cap)
    pub max_stack_height: usize,
    /// Skip `Pass` while a capture is available
    pub capture_over_pass: bool,
}

impl Default for InhibitionConfig {
    fn default() -> Self {
        Self {
            protect_last_of_kind: true,
            max_stack_height: 5,
            capture_over_pass: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TzaarPlayout {
    pub inhibition: InhibitionConfig,
}

impl TzaarPlayout {
    pub fn new(inhibition: InhibitionConfig) -> Self {
        Self { inhibition }
    }
}

impl PlayoutPolicy<TzaarBoard> for TzaarPlayout {
    /// Terminal results are ±1; unfinished playouts compare evaluator
    /// strength, `(mine - theirs) / (mine + theirs + 1)`.
    fn normalized_score(&self, board: &TzaarBoard, player: PlayerId) -> f64 {
        if board.game_over() {
            return terminal_score(board, player);
        }
        let mine = score_for_player(board, player);
        let theirs = score_for_player(board, 1 - player);
        (mine - theirs) / (mine + theirs + 1.0)
    }

    fn inhibit(&self, board: &TzaarBoard, candidates: &mut Vec<TzaarMove>) {
        if board.phase() != Phase::SecondAction {
            return;
        }
        let cfg = &self.inhibition;
        let player = board.whose_turn();

        let mut tops = [0usize; NUM_KINDS];
        if cfg.protect_last_of_kind {
            for cell in board.grid().cells() {
                if let Some(top) = board.top(cell)
                    && top.owner == player
                {
                    tops[top.kind.index()] += 1;
                }
            }
        }
        let capture_available = cfg.capture_over_pass && movegen::has_capture(board, player);

        candidates.retain(|mv| match *mv {
            TzaarMove::Stack { from, to, .. } => {
                if cfg.max_stack_height > 0
                    && board.height(from) + board.height(to) > cfg.max_stack_height
                {
                    return false;
                }
                if cfg.protect_last_of_kind
                    && let (Some(buried), Some(moving)) = (board.top(to), board.top(from))
                    && buried.kind != moving.kind
                    && tops[buried.kind.index()] == 1
                {
                    return false;
                }
                true
            }
            TzaarMove::Pass { .. } => !capture_available,
            TzaarMove::Capture { .. } | TzaarMove::Resign { .. } => true,
        });
    }
}

#[cfg(test)]
#[path = "playout_tests.rs"]
mod playout_tests;
