use board_core::{BoardState, PlayerId};

/// Game-supplied knowledge used during random playouts.
///
/// Shared by reference between root-parallel workers, so it must be `Sync`.
pub trait PlayoutPolicy<B: BoardState>: Send + Sync {
    /// Value of `board` for `player` in `[-1, 1]`.
    ///
    /// Called when a playout ends, either at game over or at the playout depth
    /// limit.
    fn normalized_score(&self, board: &B, player: PlayerId) -> f64;

    /// Remove legal but unpromising moves from the random candidate list.
    ///
    /// Only ever applied to playout candidates, never to the tree. If this
    /// empties the list the driver falls back to the full list.
    fn inhibit(&self, _board: &B, _candidates: &mut Vec<B::Move>) {}
}

/// Win/loss score from the board's own result flags.
pub fn terminal_score<B: BoardState>(board: &B, player: PlayerId) -> f64 {
    if board.win_for_player(player) {
        1.0
    } else if (0..board.num_players()).any(|p| p != player && board.win_for_player(p)) {
        -1.0
    } else {
        0.0
    }
}

/// Uniform random playouts scored by [`terminal_score`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformPlayout;

impl<B: BoardState> PlayoutPolicy<B> for UniformPlayout {
    fn normalized_score(&self, board: &B, player: PlayerId) -> f64 {
        terminal_score(board, player)
    }
}
