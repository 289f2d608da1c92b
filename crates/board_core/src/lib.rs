pub mod board;
pub mod digest;
pub mod error;
pub mod grid;
pub mod invariant;
pub mod perft;
pub mod session;
pub mod time_control;
pub mod verify;
pub mod worker;

#[doc(hidden)]
pub mod testing;

// Re-export the contract and harness (not engine-specific)
pub use board::*;
pub use digest::{DIGEST_SEED, DigestKeys, Digester, mix64};
pub use error::*;
pub use grid::{CellId, Direction, Geometry, Grid, Hex, Rect, exit_to, neighbors, opposite, ray};
pub use invariant::{ViolationPolicy, settle};
pub use perft::perft;
pub use session::GameSession;
pub use time_control::*;
pub use verify::{round_trip, verify};
pub use worker::{Finished, SearchHandle, fallback_move, spawn_search};

// =============================================================================
// Engine trait, implemented by every search driver (alpha-beta, MCTS, random)
// =============================================================================

/// Result of a search operation
#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    /// The best move found (None if no legal moves or aborted before any
    /// iteration completed)
    pub best_move: Option<M>,
    /// Score from the searching player's perspective
    pub score: f64,
    /// Depth reached (iterations for alpha-beta, tree depth for MCTS)
    pub depth: u32,
    /// Number of nodes (or simulations) searched
    pub nodes: u64,
    /// Whether search was stopped early by the time control
    pub stopped: bool,
}

impl<M> SearchResult<M> {
    /// Result for a position with nothing to search.
    pub fn empty() -> Self {
        Self {
            best_move: None,
            score: 0.0,
            depth: 0,
            nodes: 0,
            stopped: false,
        }
    }
}

/// Trait that all search engines implement.
///
/// Engines are generic over the board, so one driver can play any game that
/// implements [`BoardState`].
pub trait Engine<B: BoardState>: Send {
    /// Search `board` within `limits`.
    ///
    /// The engine works on its own clone; `board` is never mutated.
    /// An `Err` means the board broke its contract during search.
    fn search(
        &mut self,
        board: &B,
        limits: SearchLimits,
    ) -> Result<SearchResult<B::Move>, InvariantViolation>;

    /// Returns the engine's display name
    fn name(&self) -> &str;

    /// Reset internal state for a new game
    fn new_game(&mut self) {}
}

impl<B: BoardState, E: Engine<B> + ?Sized> Engine<B> for Box<E> {
    fn search(
        &mut self,
        board: &B,
        limits: SearchLimits,
    ) -> Result<SearchResult<B::Move>, InvariantViolation> {
        (**self).search(board, limits)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn new_game(&mut self) {
        (**self).new_game()
    }
}
