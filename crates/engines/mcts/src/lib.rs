//! Monte-Carlo Tree Search Engine
//!
//! UCT search over any [`BoardState`]:
//! - UCT selection with a tunable exploration constant
//! - Throttled leaf expansion below a guaranteed-expansion depth
//! - Pruning of root children that can no longer catch the leader, by
//!   visits or by win rate
//! - Winning moves become the only child of their parent
//! - Optional jitter in the final move choice
//! - Random playouts filtered by a game-supplied [`PlayoutPolicy`]
//! - Optional root-parallel search with one independent tree per worker
//!
//! The tree lives for one search call only.

mod config;
mod policy;
mod search;
mod tree;

use std::time::Duration;

use board_core::{
    BoardState, Engine, InvariantViolation, SearchLimits, SearchResult, ViolationPolicy, settle,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

pub use config::{FinalSelection, MctsConfig, PruneRule};
pub use policy::{PlayoutPolicy, UniformPlayout, terminal_score};
pub use search::{RootChild, TreeOutcome, grow_tree, run_search};
pub use tree::{Node, NodeId, ROOT, Tree};

/// MCTS engine using a caller-supplied playout policy.
pub struct MctsEngine<P> {
    policy: P,
    config: MctsConfig,
    rng: StdRng,
    /// Simulations run by the last search
    simulations: u64,
}

impl<P> MctsEngine<P> {
    pub fn new(policy: P) -> Self {
        Self::with_config(policy, MctsConfig::default())
    }

    pub fn with_config(policy: P, config: MctsConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            policy,
            config,
            rng,
            simulations: 0,
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }
}

impl<B, P> Engine<B> for MctsEngine<P>
where
    B: BoardState,
    P: PlayoutPolicy<B>,
{
    /// `limits.depth` is not used; the tree grows until time, the
    /// simulation cap or the node limit stops it. Without a caller time
    /// limit or simulation cap, `time_per_move_ms` applies.
    fn search(
        &mut self,
        board: &B,
        limits: SearchLimits,
    ) -> Result<SearchResult<B::Move>, InvariantViolation> {
        self.simulations = 0;
        limits.start();

        if board.game_over() {
            return Ok(SearchResult::empty());
        }
        let mut moves = board.legal_moves();
        match moves.len() {
            0 => {
                return Err(InvariantViolation::NoLegalMoves {
                    digest: board.digest(),
                    ply: 0,
                });
            }
            1 => {
                return Ok(SearchResult {
                    best_move: moves.pop(),
                    score: 0.0,
                    depth: 0,
                    nodes: 0,
                    stopped: false,
                });
            }
            _ => {}
        }

        let mut tc = limits.time_control.clone();
        if tc.time_limit().is_none() && self.config.max_simulations.is_none() {
            tc = tc.with_time_limit(Some(Duration::from_millis(self.config.time_per_move_ms)));
        }

        let seed = self.rng.r#gen::<u64>();
        let outcome = search::run_search(board, &self.policy, &self.config, &tc, seed)?;
        self.simulations = outcome.simulations;

        let chosen = if self.config.win_randomization > 0.0 {
            outcome.choose_randomized(self.config.win_randomization, &mut self.rng)
        } else {
            outcome.choose(self.config.final_selection)
        };
        let score = chosen.map_or(0.0, RootChild::mean);
        debug!(
            simulations = outcome.simulations,
            stored_nodes = outcome.stored_nodes,
            max_depth = outcome.max_depth,
            decided = outcome.decided,
            score,
            elapsed_ms = tc.elapsed().as_millis() as u64,
            "mcts search finished"
        );

        Ok(SearchResult {
            best_move: chosen.map(|c| c.mv.clone()),
            score,
            depth: outcome.max_depth,
            nodes: outcome.simulations,
            stopped: limits.time_control.is_stopped(),
        })
    }

    fn name(&self) -> &str {
        "MCTS"
    }

    fn new_game(&mut self) {
        self.simulations = 0;
    }
}

/// Search `board` for `time_budget_ms` milliseconds and return the chosen
/// move. Returns `None` when the game is over; contract violations are
/// settled with the default [`ViolationPolicy`].
pub fn search_mcts<B, P>(
    board: &B,
    policy: P,
    time_budget_ms: u64,
    config: MctsConfig,
) -> Option<B::Move>
where
    B: BoardState,
    P: PlayoutPolicy<B>,
{
    let mut engine = MctsEngine::with_config(policy, config);
    let limits = SearchLimits::time(Duration::from_millis(time_budget_ms));
    let result = engine.search(board, limits);
    settle(result, ViolationPolicy::default()).and_then(|r| r.best_move)
}
