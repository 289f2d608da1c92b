//! Live game state owned by the application: the board plus its move history
//! with undo and redo.

use tracing::debug;

use crate::board::BoardState;
use crate::error::{ConsistencyError, IllegalMoveError};
use crate::verify;

/// One game in progress.
///
/// Every applied move keeps its undo payload so [`GameSession::undo`] can
/// reverse it exactly. Applying a new move discards the redo list.
pub struct GameSession<B: BoardState> {
    board: B,
    history: Vec<B::Move>,
    undos: Vec<B::Undo>,
    redo: Vec<B::Move>,
}

impl<B: BoardState> GameSession<B> {
    pub fn new(board: B) -> Self {
        Self {
            board,
            history: Vec::new(),
            undos: Vec::new(),
            redo: Vec::new(),
        }
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    /// Moves applied since the start of the game, oldest first.
    pub fn history(&self) -> &[B::Move] {
        &self.history
    }

    /// Private copy for a search driver.
    pub fn search_copy(&self) -> B {
        self.board.clone()
    }

    /// Apply a move after checking its legality.
    pub fn apply(&mut self, mv: B::Move) -> Result<(), IllegalMoveError> {
        self.push(mv)?;
        self.redo.clear();
        Ok(())
    }

    /// Take back the last move. Returns it, or `None` at the start.
    pub fn undo(&mut self) -> Option<B::Move> {
        let mv = self.history.pop()?;
        let undo = self.undos.pop()?;
        self.board.unmake_move(&mv, undo);
        debug!(mv = %mv, ply = self.history.len(), "undo");
        self.redo.push(mv.clone());
        Some(mv)
    }

    /// Replay the most recently undone move.
    pub fn redo(&mut self) -> Result<Option<B::Move>, IllegalMoveError> {
        let Some(mv) = self.redo.pop() else {
            return Ok(None);
        };
        if let Err(e) = self.push(mv.clone()) {
            self.redo.push(mv);
            return Err(e);
        }
        debug!(mv = %mv, ply = self.history.len(), "redo");
        Ok(Some(mv))
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Replay the history on a fresh board and compare with the live one.
    pub fn verify(&self) -> Result<(), ConsistencyError> {
        verify::verify(&self.board, &self.history)
    }

    pub fn into_parts(self) -> (B, Vec<B::Move>) {
        (self.board, self.history)
    }

    fn push(&mut self, mv: B::Move) -> Result<(), IllegalMoveError> {
        let undo = self.board.execute(&mv)?;
        self.history.push(mv);
        self.undos.push(undo);
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
