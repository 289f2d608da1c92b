//! Iterative-deepening minimax with alpha-beta pruning.
//!
//! Scores are always from the root player's point of view: nodes where the
//! root player is to move maximize, all others minimize. This keeps games
//! with several actions per turn correct without negation tricks.

use board_core::{
    BoardState, ConsistencyError, Evaluator, InvariantViolation, PlayerId, TimeControl, is_loss,
    is_win,
};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::trace;

use crate::config::AlphaBetaConfig;

/// Scale of the bonus that makes shallower wins score higher.
const WIN_BONUS: f64 = 1000.0;

/// Result from pick_best_move indicating whether search completed or was stopped.
pub struct SearchOutcome<M> {
    /// Chosen move and its score (None if nothing was searched to completion)
    pub best_move: Option<(M, f64)>,
    /// Deepest fully completed iteration
    pub depth: u32,
    /// True if search was stopped early
    pub stopped: bool,
}

impl<M> SearchOutcome<M> {
    fn nothing(stopped: bool) -> Self {
        Self {
            best_move: None,
            depth: 0,
            stopped,
        }
    }
}

/// Why a subtree search unwound early.
enum Halt {
    Stopped,
    Violation(InvariantViolation),
}

impl From<InvariantViolation> for Halt {
    fn from(v: InvariantViolation) -> Self {
        Halt::Violation(v)
    }
}

/// Searches `board` up to `depth` plies and returns the chosen move.
///
/// Moves are re-ordered best-first between iterations. When the game is
/// still inside its first `random_plies` moves the result is drawn uniformly
/// from the top `random_plies - move_number` root moves, and every root move
/// is searched with a full window so those scores are exact.
pub fn pick_best_move<B, E, R>(
    board: &B,
    evaluator: &E,
    config: &AlphaBetaConfig,
    depth: u32,
    nodes: &mut u64,
    tc: &TimeControl,
    rng: &mut R,
) -> Result<SearchOutcome<B::Move>, InvariantViolation>
where
    B: BoardState,
    E: Evaluator<B>,
    R: Rng + ?Sized,
{
    let mut tmp = board.clone();
    if tmp.game_over() {
        return Ok(SearchOutcome::nothing(false));
    }

    let mut moves = tmp.legal_moves();
    match moves.len() {
        0 => {
            return Err(InvariantViolation::NoLegalMoves {
                digest: tmp.digest(),
                ply: 0,
            });
        }
        1 => {
            return Ok(SearchOutcome {
                best_move: moves.pop().map(|mv| (mv, 0.0)),
                depth: 0,
                stopped: false,
            });
        }
        _ => {}
    }

    let top_n = config.random_plies.saturating_sub(tmp.move_number()) as usize;
    let randomize = top_n > 1;

    let mut searcher = Searcher {
        evaluator,
        root_player: tmp.whose_turn(),
        tc,
        verify_unmake: config.verify_unmake,
        nodes,
    };

    let mut completed: Option<Vec<(B::Move, f64)>> = None;
    let mut reached = 0;
    let mut stopped = false;

    for d in 1..=depth.max(1) {
        if tc.check_time() {
            stopped = true;
            break;
        }
        match searcher.search_root(&mut tmp, &moves, d, randomize) {
            Ok(scored) => {
                let best = scored[0].1;
                trace!(depth = d, best = %scored[0].0, score = best, nodes = *searcher.nodes, "iteration complete");
                moves = scored.iter().map(|(mv, _)| mv.clone()).collect();
                completed = Some(scored);
                reached = d;
                if is_win(best) {
                    break;
                }
            }
            Err(Halt::Stopped) => {
                stopped = true;
                break;
            }
            Err(Halt::Violation(v)) => return Err(v),
        }
    }

    let Some(scored) = completed else {
        return Ok(SearchOutcome::nothing(stopped));
    };
    let best_move = if randomize {
        choose_randomized(scored, top_n, config.random_margin, rng)
    } else {
        scored.into_iter().next()
    };

    Ok(SearchOutcome {
        best_move,
        depth: reached,
        stopped,
    })
}

/// Pick uniformly among the top `top_n` candidates (scored best-first),
/// skipping those more than `margin` below the best. A forced win is never
/// traded for a non-winning move.
fn choose_randomized<M: Clone, R: Rng + ?Sized>(
    scored: Vec<(M, f64)>,
    top_n: usize,
    margin: f64,
    rng: &mut R,
) -> Option<(M, f64)> {
    let best = scored.first()?.1;
    let candidates: Vec<(M, f64)> = scored
        .into_iter()
        .take(top_n)
        .filter(|(_, s)| !is_win(best) || is_win(*s))
        .filter(|(_, s)| margin <= 0.0 || best - s <= margin)
        .collect();
    candidates.choose(rng).cloned()
}

struct Searcher<'a, E> {
    evaluator: &'a E,
    root_player: PlayerId,
    tc: &'a TimeControl,
    verify_unmake: bool,
    nodes: &'a mut u64,
}

impl<E> Searcher<'_, E> {
    /// Score every root move at `depth`, best first.
    fn search_root<B>(
        &mut self,
        board: &mut B,
        moves: &[B::Move],
        depth: u32,
        full_window: bool,
    ) -> Result<Vec<(B::Move, f64)>, Halt>
    where
        B: BoardState,
        E: Evaluator<B>,
    {
        let mut alpha = f64::NEG_INFINITY;
        let mut scored = Vec::with_capacity(moves.len());

        for mv in moves {
            let window = if full_window { f64::NEG_INFINITY } else { alpha };
            let score = self.child(board, mv, depth - 1, window, f64::INFINITY, 1)?;
            if score > alpha {
                alpha = score;
            }
            scored.push((mv.clone(), score));
        }

        // Stable: among equal scores the earlier (chosen) move stays first
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(scored)
    }

    /// Make `mv`, search below it, unmake.
    fn child<B>(
        &mut self,
        board: &mut B,
        mv: &B::Move,
        depth: u32,
        alpha: f64,
        beta: f64,
        ply: u32,
    ) -> Result<f64, Halt>
    where
        B: BoardState,
        E: Evaluator<B>,
    {
        let before = self.verify_unmake.then(|| board.digest());
        let undo = board.make_move(mv);
        let result = self.minimax(board, depth, alpha, beta, ply);
        board.unmake_move(mv, undo);

        if let Some(before) = before {
            let after = board.digest();
            if before != after {
                let err = ConsistencyError::RoundTrip {
                    mv: mv.to_string(),
                    before,
                    after,
                };
                return Err(InvariantViolation::from(err).into());
            }
        }
        result
    }

    fn minimax<B>(
        &mut self,
        board: &mut B,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        ply: u32,
    ) -> Result<f64, Halt>
    where
        B: BoardState,
        E: Evaluator<B>,
    {
        *self.nodes += 1;
        // Check time periodically
        if self.tc.should_check_time(*self.nodes) && self.tc.check_time() {
            return Err(Halt::Stopped);
        }

        if depth == 0 || board.game_over() {
            return Ok(self.leaf_score(board, ply));
        }

        let moves = board.legal_moves();
        if moves.is_empty() {
            return Err(InvariantViolation::NoLegalMoves {
                digest: board.digest(),
                ply,
            }
            .into());
        }

        let maximizing = board.whose_turn() == self.root_player;
        let mut best = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };

        for mv in &moves {
            let score = self.child(board, mv, depth - 1, alpha, beta, ply + 1)?;
            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
                if is_win(best) {
                    break;
                }
            } else {
                best = best.min(score);
                beta = beta.min(best);
                if is_loss(best) {
                    break;
                }
            }
            if alpha >= beta {
                break; // cutoff
            }
        }

        Ok(best)
    }

    fn leaf_score<B>(&self, board: &B, ply: u32) -> f64
    where
        B: BoardState,
        E: Evaluator<B>,
    {
        let v = self.evaluator.evaluate(board, self.root_player);
        let bonus = WIN_BONUS / ply.max(1) as f64;
        if is_win(v) {
            v + bonus
        } else if is_loss(v) {
            v - bonus
        } else {
            v
        }
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
