use serde::{Deserialize, Serialize};

/// Strength presets mapping to fixed search depths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn depth(self) -> u32 {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium => 5,
            Difficulty::Hard => 6,
            Difficulty::Expert => 7,
        }
    }
}

/// Alpha-beta engine configuration.
///
/// Loaded from TOML; every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphaBetaConfig {
    /// Maximum iterative-deepening depth in plies
    pub depth: u32,
    /// Overrides `depth` when set
    pub difficulty: Option<Difficulty>,
    /// Number of opening plies played randomly among the top candidates
    pub random_plies: u32,
    /// Candidates worse than the best by more than this are never picked at
    /// random. Zero disables the filter.
    pub random_margin: f64,
    /// Check digest before make against digest after unmake at every node
    pub verify_unmake: bool,
    /// Nodes between clock reads
    pub check_interval: u64,
    /// Seed for the randomized opening choice
    pub seed: Option<u64>,
}

impl Default for AlphaBetaConfig {
    fn default() -> Self {
        Self {
            depth: Difficulty::Medium.depth(),
            difficulty: None,
            random_plies: 0,
            random_margin: 0.0,
            verify_unmake: cfg!(debug_assertions),
            check_interval: 1024,
            seed: None,
        }
    }
}

impl AlphaBetaConfig {
    pub fn with_depth(depth: u32) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    pub fn effective_depth(&self) -> u32 {
        self.difficulty.map_or(self.depth, Difficulty::depth).max(1)
    }
}
