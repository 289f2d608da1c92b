//! UCT search tree stored as an arena of nodes.
//!
//! Nodes refer to each other by index, so the tree is a flat `Vec` that is
//! dropped in one piece when the search call ends.

use board_core::{MoveRecord, PlayerId};
use rand::Rng;
use rand::seq::SliceRandom;

pub type NodeId = usize;

/// Index of the root node in every tree.
pub const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
pub struct Node<M> {
    /// Move leading here from the parent (None at the root)
    pub mv: Option<M>,
    /// Player who made `mv`; `value` accumulates that player's scores
    pub player: PlayerId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub expanded: bool,
    pub depth: u32,
    pub visits: u32,
    pub value: f64,
    /// Excluded from selection; statistics are kept
    pub pruned: bool,
}

impl<M> Node<M> {
    /// Mean playout value in `[-1, 1]`, 0 when unvisited.
    #[inline]
    pub fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value / self.visits as f64
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tree<M> {
    nodes: Vec<Node<M>>,
    max_depth: u32,
}

impl<M: MoveRecord> Tree<M> {
    /// Tree with an unexpanded root where `to_move` is on turn.
    pub fn new(to_move: PlayerId) -> Self {
        Self {
            nodes: vec![Node {
                mv: None,
                player: to_move,
                parent: None,
                children: Vec::new(),
                expanded: false,
                depth: 0,
                visits: 0,
                value: 0.0,
                pruned: false,
            }],
            max_depth: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node<M> {
        &self.nodes[id]
    }

    /// Deepest node created so far.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Attach one child per move. Expansion happens once per node.
    pub fn expand(&mut self, id: NodeId, moves: Vec<M>) {
        if self.nodes[id].expanded {
            return;
        }
        let depth = self.nodes[id].depth + 1;
        let first = self.nodes.len();
        let last = first + moves.len();
        for mv in moves {
            self.nodes.push(Node {
                player: mv.player(),
                mv: Some(mv),
                parent: Some(id),
                children: Vec::new(),
                expanded: false,
                depth,
                visits: 0,
                value: 0.0,
                pruned: false,
            });
        }
        let node = &mut self.nodes[id];
        node.children = (first..last).collect();
        node.expanded = true;
        if !node.children.is_empty() {
            self.max_depth = self.max_depth.max(depth);
        }
    }

    pub fn active_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id]
            .children
            .iter()
            .copied()
            .filter(|&c| !self.nodes[c].pruned)
    }

    pub fn active_count(&self, id: NodeId) -> usize {
        self.active_children(id).count()
    }

    /// UCT child selection.
    ///
    /// Unvisited children come first, chosen at random among themselves.
    /// Otherwise the child maximizing
    /// `mean/2 + 0.5 + c * sqrt(ln(parent_visits) / (visits + 1))` wins.
    pub fn select<R: Rng + ?Sized>(&self, id: NodeId, exploration: f64, rng: &mut R) -> Option<NodeId> {
        let unvisited: Vec<NodeId> = self
            .active_children(id)
            .filter(|&c| self.nodes[c].visits == 0)
            .collect();
        if let Some(&c) = unvisited.choose(rng) {
            return Some(c);
        }

        let log_parent = (self.nodes[id].visits.max(1) as f64).ln();
        self.active_children(id).max_by(|&a, &b| {
            self.uct_score(a, log_parent, exploration)
                .total_cmp(&self.uct_score(b, log_parent, exploration))
        })
    }

    #[inline]
    fn uct_score(&self, id: NodeId, log_parent: f64, exploration: f64) -> f64 {
        let node = &self.nodes[id];
        let exploit = node.mean() / 2.0 + 0.5;
        exploit + exploration * (log_parent / (node.visits as f64 + 1.0)).sqrt()
    }

    /// Add one visit along the path from `leaf` to the root. Each node
    /// accumulates the score of the player who moved into it.
    pub fn backpropagate(&mut self, leaf: NodeId, scores: &[f64]) {
        let mut cursor = Some(leaf);
        while let Some(id) = cursor {
            let node = &mut self.nodes[id];
            node.visits += 1;
            if node.mv.is_some() {
                node.value += scores[node.player];
            }
            cursor = node.parent;
        }
    }

    /// Prune children of `id` that cannot catch up with the most visited
    /// child, even if they received their fair share of the visits still to
    /// come.
    ///
    /// With `part_done` the finished fraction of the search, the remaining
    /// visits are `visits / part_done - visits`, and a child's share is that
    /// divided by `active ^ power`. Well-visited children are pruned
    /// recursively when `expansion_rate` is positive. Returns the number of
    /// children pruned.
    pub fn prune_hopeless(&mut self, id: NodeId, part_done: f64, power: f64, expansion_rate: f64) -> usize {
        if part_done <= 0.0 {
            return 0;
        }
        let visits = self.nodes[id].visits as f64;
        let remaining = visits / part_done - visits;
        if remaining <= 0.0 {
            return 0;
        }

        let mut active: Vec<NodeId> = self.active_children(id).collect();
        if active.len() < 2 {
            return 0;
        }
        // Most visited first; it is never pruned
        active.sort_by(|&a, &b| self.nodes[b].visits.cmp(&self.nodes[a].visits));
        let best_visits = self.nodes[active[0]].visits as f64;

        let recursion_threshold = if expansion_rate > 0.0 {
            Some(visits.max(1.0).ln() / expansion_rate)
        } else {
            None
        };

        let mut num_active = active.len();
        let mut share = remaining / (num_active as f64).powf(power);
        let mut killed = 0;

        for &child in active[1..].iter().rev() {
            if share >= best_visits {
                break;
            }
            let child_visits = self.nodes[child].visits as f64;
            if child_visits + share < best_visits {
                self.nodes[child].pruned = true;
                killed += 1;
                num_active -= 1;
                share = remaining / (num_active as f64).powf(power);
            } else if let Some(threshold) = recursion_threshold
                && child_visits > threshold * self.active_count(child) as f64
            {
                killed += self.prune_hopeless(child, part_done, power, expansion_rate);
            }
        }
        killed
    }

    /// Prune children of `id` whose win rate cannot reach the best child's,
    /// even if every one of their fair share of the remaining visits were a
    /// win.
    ///
    /// Values in `[-1, 1]` count as `(v + 1) / 2` wins. The child with the
    /// most wins is never pruned. A child at rate `w / n` needs
    /// `(n * best - w) / (1 - best)` straight wins to draw level with
    /// `best`; it is pruned when that deficit exceeds its share.
    pub fn prune_hopeless_by_rate(&mut self, id: NodeId, part_done: f64, power: f64) -> usize {
        if part_done <= 0.0 {
            return 0;
        }
        let visits = self.nodes[id].visits as f64;
        let remaining = visits / part_done - visits;

        let active: Vec<NodeId> = self.active_children(id).collect();
        if active.len() < 2 || remaining <= 0.0 {
            return 0;
        }
        let wins = |node: &Node<M>| (node.value + node.visits as f64) / 2.0;
        let Some(leader) = active
            .iter()
            .copied()
            .filter(|&c| self.nodes[c].visits > 0)
            .max_by(|&a, &b| wins(&self.nodes[a]).total_cmp(&wins(&self.nodes[b])))
        else {
            return 0;
        };
        let best = wins(&self.nodes[leader]) / self.nodes[leader].visits as f64;
        let share = remaining / (active.len() as f64).powf(power);

        let mut killed = 0;
        for child in active {
            let node = &self.nodes[child];
            if child == leader || node.visits == 0 {
                continue;
            }
            let child_wins = wins(node);
            let child_visits = node.visits as f64;
            let deficit = if best >= 1.0 {
                if child_wins < child_visits { f64::INFINITY } else { 0.0 }
            } else {
                (child_visits * best - child_wins) / (1.0 - best)
            };
            if deficit > share {
                self.nodes[child].pruned = true;
                killed += 1;
            }
        }
        killed
    }

    /// Keep `id` as the only active child of its parent. Used when the move
    /// into `id` wins on the spot. Returns the number of siblings pruned.
    pub fn make_only_child(&mut self, id: NodeId) -> usize {
        let Some(parent) = self.nodes[id].parent else {
            return 0;
        };
        let siblings: Vec<NodeId> = self
            .active_children(parent)
            .filter(|&c| c != id)
            .collect();
        for &sibling in &siblings {
            self.nodes[sibling].pruned = true;
        }
        siblings.len()
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tree_tests;
