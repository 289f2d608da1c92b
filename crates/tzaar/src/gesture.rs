//! Pick-and-drop input kept beside the board.
//!
//! A front end translates clicks into a [`PendingTransaction`]; only a
//! completed drop produces a [`TzaarMove`] for the board. The board itself
//! never holds a half-made move.

use board_core::{BoardState, CellId};
use thiserror::Error;

use crate::board::{Phase, TzaarBoard};
use crate::chip::Chip;
use crate::movegen;
use crate::moves::{TzaarMove, cell_name};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GestureError {
    #[error("already holding the stack from {0}")]
    AlreadyHolding(String),

    #[error("nothing is being held")]
    NotHolding,

    #[error("no movable stack of the player to move on {0}")]
    NothingToPick(String),

    #[error("{to} is not reachable from {from}")]
    NotADestination { from: String, to: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingTransaction {
    #[default]
    Empty,
    Holding { chip: Chip, source: CellId },
}

impl PendingTransaction {
    pub fn is_holding(&self) -> bool {
        matches!(self, PendingTransaction::Holding { .. })
    }

    /// Lift the stack on `cell`.
    pub fn pick(&mut self, board: &TzaarBoard, cell: CellId) -> Result<(), GestureError> {
        if let PendingTransaction::Holding { source, .. } = *self {
            return Err(GestureError::AlreadyHolding(cell_name(source)));
        }
        let chip = board
            .top(cell)
            .filter(|c| c.owner == board.whose_turn() && !board.game_over())
            .filter(|_| !moves_from(board, cell).is_empty())
            .ok_or_else(|| GestureError::NothingToPick(cell_name(cell)))?;
        *self = PendingTransaction::Holding { chip, source: cell };
        Ok(())
    }

    /// Cells the held stack may be dropped on, besides its source.
    pub fn destinations(&self, board: &TzaarBoard) -> Vec<CellId> {
        match *self {
            PendingTransaction::Empty => Vec::new(),
            PendingTransaction::Holding { source, .. } => moves_from(board, source)
                .iter()
                .filter_map(|m| m.from_to().map(|(_, to)| to))
                .collect(),
        }
    }

    /// Drop the held stack on `dest`.
    ///
    /// Dropping back on the source cancels and yields `None`. An unreachable
    /// destination keeps the stack held.
    pub fn drop_at(
        &mut self,
        board: &TzaarBoard,
        dest: CellId,
    ) -> Result<Option<TzaarMove>, GestureError> {
        let PendingTransaction::Holding { source, .. } = *self else {
            return Err(GestureError::NotHolding);
        };
        if dest == source {
            *self = PendingTransaction::Empty;
            return Ok(None);
        }
        let mv = moves_from(board, source)
            .into_iter()
            .find(|m| m.from_to() == Some((source, dest)))
            .ok_or_else(|| GestureError::NotADestination {
                from: cell_name(source),
                to: cell_name(dest),
            })?;
        *self = PendingTransaction::Empty;
        Ok(Some(mv))
    }

    pub fn cancel(&mut self) {
        *self = PendingTransaction::Empty;
    }
}

fn moves_from(board: &TzaarBoard, cell: CellId) -> Vec<TzaarMove> {
    let mut out = Vec::new();
    movegen::moves_from(board, cell, board.phase() == Phase::SecondAction, &mut out);
    out
}

#[cfg(test)]
#[path = "gesture_tests.rs"]
mod gesture_tests;
