use std::fmt::{Debug, Display};

use crate::error::{ConfigError, IllegalMoveError};

/// Index of a player, `0..num_players()`.
pub type PlayerId = usize;

/// One transition between two board states.
///
/// Records are produced by the move generator and consumed by
/// [`BoardState::make_move`]. The undo payload lives beside the record (see
/// [`BoardState::Undo`]) so the record itself stays a plain value that can be
/// compared, printed and stored in a game history.
pub trait MoveRecord: Clone + Debug + Display + PartialEq + Send + 'static {
    /// Player making this move
    fn player(&self) -> PlayerId;
}

/// The contract every searchable game board implements.
///
/// Search drivers only ever touch a private clone of the live board and
/// mutate it through strictly nested `make_move` / `unmake_move` pairs.
pub trait BoardState: Clone + Send + 'static {
    type Move: MoveRecord;
    /// Information needed to reverse one `make_move` exactly.
    type Undo: Send + 'static;

    /// Reset to the canonical starting position of `game_type`.
    fn init(&mut self, game_type: &str, random_seed: u64) -> Result<(), ConfigError>;

    fn game_type(&self) -> &str;
    fn random_seed(&self) -> u64;

    fn num_players(&self) -> usize;
    fn whose_turn(&self) -> PlayerId;
    /// Number of moves made since `init`
    fn move_number(&self) -> u32;
    fn game_over(&self) -> bool;
    fn win_for_player(&self, player: PlayerId) -> bool;

    /// Deterministic fingerprint of the logical content of the board.
    fn digest(&self) -> u64;

    /// Deep structural equality, used to cross-check [`BoardState::digest`].
    fn same_state(&self, other: &Self) -> bool;

    /// Append the legal moves for [`BoardState::whose_turn`].
    ///
    /// Only the player to move is ever generated for; every appended record
    /// has `player() == whose_turn()`. Nothing is appended once the game is
    /// over. Callers wanting another player's options must reach a position
    /// where that player is to move.
    fn legal_moves_into(&self, moves: &mut Vec<Self::Move>);

    /// Apply a move the caller knows to be legal.
    fn make_move(&mut self, mv: &Self::Move) -> Self::Undo;

    /// Reverse the most recent `make_move`.
    fn unmake_move(&mut self, mv: &Self::Move, undo: Self::Undo);

    fn legal_moves(&self) -> Vec<Self::Move> {
        let mut moves = Vec::with_capacity(32);
        self.legal_moves_into(&mut moves);
        moves
    }

    /// Apply a move after checking it against the legal-move set.
    ///
    /// The board is unchanged when an error is returned.
    fn execute(&mut self, mv: &Self::Move) -> Result<Self::Undo, IllegalMoveError> {
        if self.game_over() {
            return Err(IllegalMoveError::new(mv, mv.player(), "game is over"));
        }
        if mv.player() != self.whose_turn() {
            return Err(IllegalMoveError::new(
                mv,
                mv.player(),
                format!("player {} is to move", self.whose_turn()),
            ));
        }
        if !self.legal_moves().contains(mv) {
            return Err(IllegalMoveError::new(mv, mv.player(), "not in the legal move set"));
        }
        Ok(self.make_move(mv))
    }
}

/// Static evaluation of a position from `player`'s point of view.
///
/// Values at or above [`WIN_THRESHOLD`] are forced wins, values at or below
/// its negation forced losses.
pub trait Evaluator<B: BoardState>: Send {
    fn evaluate(&self, board: &B, player: PlayerId) -> f64;
}

impl<B, F> Evaluator<B> for F
where
    B: BoardState,
    F: Fn(&B, PlayerId) -> f64 + Send,
{
    fn evaluate(&self, board: &B, player: PlayerId) -> f64 {
        self(board, player)
    }
}

/// Evaluations at or beyond this magnitude are treated as decided games.
pub const WIN_THRESHOLD: f64 = 1.0e6;

/// True if `score` marks a forced win.
#[inline]
pub fn is_win(score: f64) -> bool {
    score >= WIN_THRESHOLD
}

/// True if `score` marks a forced loss.
#[inline]
pub fn is_loss(score: f64) -> bool {
    score <= -WIN_THRESHOLD
}
