//! Random Move Engine
//!
//! A simple engine that selects moves uniformly at random from all legal moves.
//! Useful for:
//! - Baseline comparisons (any real engine should easily beat this)
//! - Stress testing move generation and make/unmake through the arena

use board_core::{BoardState, Engine, InvariantViolation, SearchLimits, SearchResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;


/// An engine that plays random legal moves.
///
/// This engine provides no evaluation - it simply picks a random move
/// from all available legal moves. Works with any board.
#[derive(Debug, Clone)]
pub struct RandomEngine {
    rng: StdRng,
    nodes: u64,
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomEngine {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            nodes: 0,
        }
    }

    /// Reproducible move sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            nodes: 0,
        }
    }
}

impl<B: BoardState> Engine<B> for RandomEngine {
    fn search(
        &mut self,
        board: &B,
        _limits: SearchLimits,
    ) -> Result<SearchResult<B::Move>, InvariantViolation> {
        if board.game_over() {
            return Ok(SearchResult::empty());
        }

        let moves = board.legal_moves();
        if moves.is_empty() {
            return Err(InvariantViolation::NoLegalMoves {
                digest: board.digest(),
                ply: 0,
            });
        }

        self.nodes = 1;
        let best_move = moves.choose(&mut self.rng).cloned();

        Ok(SearchResult {
            best_move,
            score: 0.0,
            depth: 1,
            nodes: self.nodes,
            stopped: false,
        })
    }

    fn name(&self) -> &str {
        "Random"
    }

    fn new_game(&mut self) {
        self.nodes = 0;
    }
}
