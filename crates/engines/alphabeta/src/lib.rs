//! Alpha-Beta Search Engine
//!
//! Iterative-deepening minimax with alpha-beta pruning over any
//! [`BoardState`]. Position knowledge comes from a pluggable [`Evaluator`].

mod config;
mod search;

use board_core::{
    BoardState, Engine, Evaluator, InvariantViolation, SearchLimits, SearchResult,
    ViolationPolicy, settle,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

pub use config::{AlphaBetaConfig, Difficulty};
pub use search::{SearchOutcome, pick_best_move};

/// Alpha-beta engine using a caller-supplied evaluator.
///
/// This engine uses:
/// - Minimax relative to the root player with alpha-beta pruning
/// - Iterative deepening with best-first root ordering
/// - Randomized choice among the top moves early in the game
/// - Time control support for move time limits
pub struct AlphaBetaEngine<E> {
    evaluator: E,
    config: AlphaBetaConfig,
    rng: StdRng,
    /// Node counter for statistics
    nodes: u64,
}

impl<E> AlphaBetaEngine<E> {
    pub fn new(evaluator: E) -> Self {
        Self::with_config(evaluator, AlphaBetaConfig::default())
    }

    pub fn with_config(evaluator: E, config: AlphaBetaConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            evaluator,
            config,
            rng,
            nodes: 0,
        }
    }

    pub fn config(&self) -> &AlphaBetaConfig {
        &self.config
    }
}

impl<B, E> Engine<B> for AlphaBetaEngine<E>
where
    B: BoardState,
    E: Evaluator<B>,
{
    fn search(
        &mut self,
        board: &B,
        limits: SearchLimits,
    ) -> Result<SearchResult<B::Move>, InvariantViolation> {
        self.nodes = 0;
        limits.start();

        let depth = limits.depth.min(self.config.effective_depth());
        let tc = limits
            .time_control
            .clone()
            .with_check_interval(self.config.check_interval);

        let outcome = search::pick_best_move(
            board,
            &self.evaluator,
            &self.config,
            depth,
            &mut self.nodes,
            &tc,
            &mut self.rng,
        )?;

        let score = outcome.best_move.as_ref().map_or(0.0, |(_, s)| *s);
        debug!(
            depth = outcome.depth,
            nodes = self.nodes,
            score,
            stopped = outcome.stopped,
            elapsed_ms = tc.elapsed().as_millis() as u64,
            "alpha-beta search finished"
        );

        Ok(SearchResult {
            best_move: outcome.best_move.map(|(mv, _)| mv),
            score,
            depth: outcome.depth,
            nodes: self.nodes,
            stopped: outcome.stopped,
        })
    }

    fn name(&self) -> &str {
        "AlphaBeta"
    }

    fn new_game(&mut self) {
        self.nodes = 0;
    }
}

/// Search `board` to `depth` plies and return the chosen move.
///
/// The first `random_plies` moves of a game are drawn from the top
/// candidates. Returns `None` when the game is over; contract violations are
/// settled with the default [`ViolationPolicy`].
pub fn search_alpha_beta<B, E>(
    board: &B,
    evaluator: E,
    depth: u32,
    random_plies: u32,
) -> Option<B::Move>
where
    B: BoardState,
    E: Evaluator<B>,
{
    let config = AlphaBetaConfig {
        depth,
        random_plies,
        ..AlphaBetaConfig::default()
    };
    let mut engine = AlphaBetaEngine::with_config(evaluator, config);
    let result = engine.search(board, SearchLimits::depth(depth));
    settle(result, ViolationPolicy::default()).and_then(|r| r.best_move)
}
