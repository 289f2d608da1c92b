use serde::{Deserialize, Serialize};

/// How the move is picked from the root once search ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalSelection {
    /// Root child with the most visits (ties broken by mean value)
    #[default]
    MostVisited,
    /// Visited root child with the highest mean value
    BestValue,
}

/// What makes a root child hopeless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PruneRule {
    /// Cannot reach the most visited child's visit count
    #[default]
    Visits,
    /// Cannot reach the best child's win rate
    WinRate,
}

/// MCTS engine configuration.
///
/// Loaded from TOML; every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// UCT exploration constant
    pub exploration: f64,
    /// Multiplier on visits compared against `ln(parent visits)` before a
    /// leaf below `uct_tree_depth` is expanded. Zero expands on the third
    /// visit.
    pub node_expansion_rate: f64,
    /// Nodes shallower than this are always expanded
    pub uct_tree_depth: u32,
    /// Power of the active child count used to compute a child's fair share
    /// of the remaining visits. Zero disables pruning.
    pub kill_hopeless_children_share: f64,
    pub prune_rule: PruneRule,
    /// Simulations between pruning passes
    pub prune_interval: u64,
    /// Hard limit on stored tree nodes
    pub stored_child_limit: usize,
    /// End the search when `stored_child_limit` is reached instead of only
    /// refusing further expansion
    pub stop_at_child_limit: bool,
    /// Random moves per playout before the position is scored as is
    pub playout_depth_limit: u32,
    pub final_selection: FinalSelection,
    /// Jitter in the final choice. Above 1, pick at random among the top
    /// `1..=n` most visited children; between 0 and 1, add up to this much
    /// noise to each child's win rate. Disables pruning.
    pub win_randomization: f64,
    /// A move that wins on the spot becomes the only active child of its
    /// parent; at the root this ends the search.
    pub only_child_optimization: bool,
    /// Wall-clock budget per move when the caller gives none
    pub time_per_move_ms: u64,
    /// Stop after this many simulations (per worker)
    pub max_simulations: Option<u64>,
    /// Seed for selection and playout randomness
    pub seed: Option<u64>,
    /// Independent root-parallel trees
    pub threads: usize,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration: 0.5,
            node_expansion_rate: 0.0,
            uct_tree_depth: 3,
            kill_hopeless_children_share: 0.5,
            prune_interval: 64,
            prune_rule: PruneRule::Visits,
            stored_child_limit: 100_000,
            stop_at_child_limit: false,
            playout_depth_limit: 1000,
            final_selection: FinalSelection::MostVisited,
            win_randomization: 0.0,
            only_child_optimization: true,
            time_per_move_ms: 5000,
            max_simulations: None,
            seed: None,
            threads: 1,
        }
    }
}

impl MctsConfig {
    /// Fixed simulation count with a fixed seed, for reproducible runs.
    pub fn deterministic(simulations: u64, seed: u64) -> Self {
        Self {
            max_simulations: Some(simulations),
            seed: Some(seed),
            ..Self::default()
        }
    }
}
