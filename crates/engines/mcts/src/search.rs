//! Select, expand, simulate, backpropagate.
//!
//! One simulation descends the tree on the worker's private board with
//! make/unmake, plays random moves to the end of the game (or the playout
//! depth limit), scores the result for every player and unwinds. The clock
//! is read between simulations only.

use board_core::{BoardState, InvariantViolation, MoveRecord, TimeControl};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use tracing::trace;

use crate::config::{FinalSelection, MctsConfig, PruneRule};
use crate::policy::PlayoutPolicy;
use crate::tree::{NodeId, ROOT, Tree};

/// Statistics of one root move after search.
#[derive(Debug, Clone)]
pub struct RootChild<M> {
    pub mv: M,
    pub visits: u32,
    pub value: f64,
    pub pruned: bool,
}

impl<M> RootChild<M> {
    pub fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value / self.visits as f64
        }
    }
}

/// Result of searching one or more trees from the same root.
#[derive(Debug, Clone)]
pub struct TreeOutcome<M> {
    /// Root moves in legal-move order
    pub children: Vec<RootChild<M>>,
    pub simulations: u64,
    pub max_depth: u32,
    pub stored_nodes: usize,
    /// Pruning left a single active root move
    pub decided: bool,
}

impl<M: Clone> TreeOutcome<M> {
    /// Root children still in contention: the unpruned ones, or all of
    /// them if pruning left none.
    fn contenders(&self) -> Vec<&RootChild<M>> {
        let active: Vec<_> = self.children.iter().filter(|c| !c.pruned).collect();
        if active.is_empty() {
            self.children.iter().collect()
        } else {
            active
        }
    }

    /// Pick the root move according to `selection`.
    pub fn choose(&self, selection: FinalSelection) -> Option<&RootChild<M>> {
        let contenders = self.contenders();
        match selection {
            FinalSelection::MostVisited => contenders.into_iter().max_by(|a, b| {
                a.visits
                    .cmp(&b.visits)
                    .then_with(|| a.mean().total_cmp(&b.mean()))
            }),
            FinalSelection::BestValue => contenders
                .into_iter()
                .filter(|c| c.visits > 0)
                .max_by(|a, b| a.mean().total_cmp(&b.mean())),
        }
    }

    /// Pick the root move with jitter.
    ///
    /// With `randomization > 1` one of the top `k` most visited children is
    /// drawn, `k` itself uniform in `1..=randomization`. Otherwise each
    /// visited child's win rate `(mean + 1) / 2` gets up to `randomization`
    /// of uniform noise and the highest wins.
    pub fn choose_randomized<R: Rng + ?Sized>(
        &self,
        randomization: f64,
        rng: &mut R,
    ) -> Option<&RootChild<M>> {
        let mut contenders = self.contenders();
        if randomization > 1.0 {
            contenders.sort_by(|a, b| b.visits.cmp(&a.visits));
            let top = rng.gen_range(1..=randomization as usize).min(contenders.len());
            contenders[..top].choose(rng).copied()
        } else {
            contenders
                .into_iter()
                .filter(|c| c.visits > 0)
                .map(|c| {
                    let rate = (c.mean() + 1.0) / 2.0 + rng.r#gen::<f64>() * randomization;
                    (c, rate)
                })
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(c, _)| c)
        }
    }

    /// Sum root statistics of independent trees grown from the same root.
    fn merge(mut outcomes: Vec<TreeOutcome<M>>) -> Option<TreeOutcome<M>> {
        let mut merged = outcomes.pop()?;
        for other in outcomes {
            for (mine, theirs) in merged.children.iter_mut().zip(other.children) {
                mine.visits += theirs.visits;
                mine.value += theirs.value;
                mine.pruned &= theirs.pruned;
            }
            merged.simulations += other.simulations;
            merged.max_depth = merged.max_depth.max(other.max_depth);
            merged.stored_nodes += other.stored_nodes;
            merged.decided &= other.decided;
        }
        Some(merged)
    }
}

/// Run `config.threads` independent trees and merge their root statistics.
pub fn run_search<B, P>(
    board: &B,
    policy: &P,
    config: &MctsConfig,
    tc: &TimeControl,
    seed: u64,
) -> Result<TreeOutcome<B::Move>, InvariantViolation>
where
    B: BoardState,
    P: PlayoutPolicy<B>,
{
    let threads = config.threads.max(1);
    if threads == 1 {
        return grow_tree(board.clone(), policy, config, tc, seed);
    }

    let boards: Vec<B> = (0..threads).map(|_| board.clone()).collect();
    let outcomes = boards
        .into_par_iter()
        .enumerate()
        .map(|(i, b)| grow_tree(b, policy, config, tc, seed.wrapping_add(i as u64)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TreeOutcome::merge(outcomes).unwrap_or_else(|| TreeOutcome {
        children: Vec::new(),
        simulations: 0,
        max_depth: 0,
        stored_nodes: 0,
        decided: false,
    }))
}

/// Grow one tree on a private board until a stop condition holds.
pub fn grow_tree<B, P>(
    mut board: B,
    policy: &P,
    config: &MctsConfig,
    tc: &TimeControl,
    seed: u64,
) -> Result<TreeOutcome<B::Move>, InvariantViolation>
where
    B: BoardState,
    P: PlayoutPolicy<B>,
{
    let mut rng = StdRng::seed_from_u64(seed);
    let mut tree = Tree::new(board.whose_turn());
    let root_moves = board.legal_moves();
    if root_moves.is_empty() && !board.game_over() {
        return Err(InvariantViolation::NoLegalMoves {
            digest: board.digest(),
            ply: 0,
        });
    }
    let root_choices = root_moves.len();
    tree.expand(ROOT, root_moves);

    let mut sim = Simulation {
        policy,
        config,
        path: Vec::with_capacity(64),
        scores: vec![0.0; board.num_players()],
        candidates: Vec::with_capacity(64),
    };

    let mut simulations = 0u64;
    let mut decided = false;

    loop {
        if config.max_simulations.is_some_and(|max| simulations >= max) {
            break;
        }
        if tc.check_time() {
            break;
        }
        if config.stop_at_child_limit && tree.len() >= config.stored_child_limit {
            trace!(nodes = tree.len(), "stored child limit reached");
            break;
        }

        let leaf = sim.run(&mut board, &mut tree, &mut rng)?;
        tree.backpropagate(leaf, &sim.scores);
        simulations += 1;

        if root_choices > 1 && tree.active_count(ROOT) == 1 {
            trace!(simulations, "single root move left");
            decided = true;
            break;
        }

        if config.kill_hopeless_children_share > 0.0
            && config.win_randomization <= 0.0
            && config.prune_interval > 0
            && simulations.is_multiple_of(config.prune_interval)
        {
            let part_done = progress(tc, config, simulations);
            if part_done > 0.1 {
                let power = config.kill_hopeless_children_share;
                let killed = match config.prune_rule {
                    PruneRule::Visits => {
                        tree.prune_hopeless(ROOT, part_done, power, config.node_expansion_rate)
                    }
                    PruneRule::WinRate => tree.prune_hopeless_by_rate(ROOT, part_done, power),
                };
                if killed > 0 {
                    trace!(killed, part_done, simulations, "pruned hopeless children");
                }
                if tree.active_count(ROOT) == 1 {
                    decided = true;
                    break;
                }
            }
        }
    }

    let children = tree
        .node(ROOT)
        .children
        .iter()
        .filter_map(|&id| {
            let node = tree.node(id);
            node.mv.clone().map(|mv| RootChild {
                mv,
                visits: node.visits,
                value: node.value,
                pruned: node.pruned,
            })
        })
        .collect();

    Ok(TreeOutcome {
        children,
        simulations,
        max_depth: tree.max_depth(),
        stored_nodes: tree.len(),
        decided,
    })
}

/// Finished fraction of the search, by clock or by simulation count.
fn progress(tc: &TimeControl, config: &MctsConfig, simulations: u64) -> f64 {
    let by_time = if tc.time_limit().is_some() {
        tc.fraction_used()
    } else {
        0.0
    };
    let by_count = config
        .max_simulations
        .map_or(0.0, |max| simulations as f64 / max.max(1) as f64);
    by_time.max(by_count)
}

/// Scratch buffers reused across simulations.
struct Simulation<'a, B: BoardState, P> {
    policy: &'a P,
    config: &'a MctsConfig,
    /// Moves made since the root, with their undo payloads
    path: Vec<(B::Move, B::Undo)>,
    /// Playout result per player
    scores: Vec<f64>,
    candidates: Vec<B::Move>,
}

impl<B, P> Simulation<'_, B, P>
where
    B: BoardState,
    P: PlayoutPolicy<B>,
{
    /// One full simulation. Leaves `board` as it found it and the per-player
    /// result in `self.scores`; returns the tree leaf to backpropagate from.
    fn run(
        &mut self,
        board: &mut B,
        tree: &mut Tree<B::Move>,
        rng: &mut StdRng,
    ) -> Result<NodeId, InvariantViolation> {
        let leaf = self.descend(board, tree, rng)?;
        self.playout(board, rng)?;
        for (player, score) in self.scores.iter_mut().enumerate() {
            *score = self.policy.normalized_score(board, player).clamp(-1.0, 1.0);
        }
        while let Some((mv, undo)) = self.path.pop() {
            board.unmake_move(&mv, undo);
        }
        Ok(leaf)
    }

    /// Walk down by UCT, expanding the first node that qualifies.
    fn descend(
        &mut self,
        board: &mut B,
        tree: &mut Tree<B::Move>,
        rng: &mut StdRng,
    ) -> Result<NodeId, InvariantViolation> {
        let mut id = ROOT;
        loop {
            if board.game_over() {
                return Ok(id);
            }
            if !tree.node(id).expanded {
                if !self.should_expand(tree, id) {
                    return Ok(id);
                }
                let moves = board.legal_moves();
                if moves.is_empty() {
                    return Err(InvariantViolation::NoLegalMoves {
                        digest: board.digest(),
                        ply: self.path.len() as u32,
                    });
                }
                tree.expand(id, moves);
            }

            let Some(child) = tree.select(id, self.config.exploration, rng) else {
                return Ok(id);
            };
            let Some(mv) = tree.node(child).mv.clone() else {
                return Ok(id);
            };
            let mover = mv.player();
            let undo = board.make_move(&mv);
            self.path.push((mv, undo));
            if self.config.only_child_optimization
                && board.game_over()
                && board.win_for_player(mover)
            {
                tree.make_only_child(child);
            }
            id = child;
        }
    }

    fn should_expand(&self, tree: &Tree<B::Move>, id: NodeId) -> bool {
        if tree.len() >= self.config.stored_child_limit {
            return false;
        }
        let node = tree.node(id);
        if node.depth < self.config.uct_tree_depth {
            return true;
        }
        if self.config.node_expansion_rate > 0.0 {
            let parent_visits = node.parent.map_or(1, |p| tree.node(p).visits).max(1);
            node.visits as f64 * self.config.node_expansion_rate > (parent_visits as f64).ln()
        } else {
            node.visits > 2
        }
    }

    /// Random moves to the end of the game or the depth limit.
    fn playout(&mut self, board: &mut B, rng: &mut StdRng) -> Result<(), InvariantViolation> {
        let mut depth = 0;
        while !board.game_over() && depth < self.config.playout_depth_limit {
            self.candidates.clear();
            board.legal_moves_into(&mut self.candidates);
            if self.candidates.is_empty() {
                return Err(InvariantViolation::NoLegalMoves {
                    digest: board.digest(),
                    ply: self.path.len() as u32,
                });
            }

            self.policy.inhibit(board, &mut self.candidates);
            if self.candidates.is_empty() {
                // Inhibition may never leave the player without a move
                board.legal_moves_into(&mut self.candidates);
            }
            let Some(mv) = self.candidates.choose(rng).cloned() else {
                break;
            };

            let undo = board.make_move(&mv);
            self.path.push((mv, undo));
            depth += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
