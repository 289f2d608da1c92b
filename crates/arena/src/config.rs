//! Match files.
//!
//! ```toml
//! variant = "tzaar-lite-random"
//! games = 20
//! time_per_move_ms = 500
//!
//! [[engines]]
//! name = "ab5"
//! kind = "alpha_beta"
//! config = { depth = 5, random_plies = 2 }
//!
//! [[engines]]
//! name = "uct"
//! kind = "mcts"
//! config = { exploration = 0.5 }
//! inhibition = { max_stack_height = 4 }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use alphabeta_engine::AlphaBetaConfig;
use board_core::{ConfigError, ViolationPolicy};
use mcts_engine::MctsConfig;
use serde::{Deserialize, Serialize};
use tzaar::{InhibitionConfig, TzaarBoard, VARIANT_FIXED};

/// Which driver an engine entry builds, with its settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineKind {
    AlphaBeta {
        #[serde(default)]
        config: AlphaBetaConfig,
    },
    Mcts {
        #[serde(default)]
        config: MctsConfig,
        #[serde(default)]
        inhibition: InhibitionConfig,
    },
    Random {
        #[serde(default)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSpec {
    pub name: String,
    #[serde(flatten)]
    pub kind: EngineKind,
}

impl EngineSpec {
    /// Parse a command-line engine: `alphabeta[:DEPTH]`, `mcts[:MS]` or
    /// `random[:SEED]`.
    pub fn parse_short(spec: &str) -> Result<Self, ConfigError> {
        let (head, arg) = match spec.split_once(':') {
            Some((h, a)) => (h, Some(a)),
            None => (spec, None),
        };
        let number = |a: &str| {
            a.parse::<u64>().map_err(|_| ConfigError::Invalid {
                message: format!("bad number '{a}' in engine '{spec}'"),
            })
        };
        let kind = match head.to_lowercase().as_str() {
            "alphabeta" | "ab" => {
                let mut config = AlphaBetaConfig::default();
                if let Some(a) = arg {
                    config.depth = number(a)? as u32;
                }
                EngineKind::AlphaBeta { config }
            }
            "mcts" | "uct" => {
                let mut config = MctsConfig::default();
                if let Some(a) = arg {
                    config.time_per_move_ms = number(a)?;
                }
                EngineKind::Mcts {
                    config,
                    inhibition: InhibitionConfig::default(),
                }
            }
            "random" => EngineKind::Random {
                seed: arg.map(number).transpose()?,
            },
            _ => {
                return Err(ConfigError::Invalid {
                    message: format!("unknown engine '{spec}'"),
                });
            }
        };
        Ok(Self {
            name: spec.to_string(),
            kind,
        })
    }
}

/// Everything a run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Tzaar variant for every game
    pub variant: String,
    /// Games per pairing
    pub games: u32,
    /// Seed of the first game; game `i` of a pairing uses `seed + i`
    pub seed: u64,
    /// Wall-clock limit per move (None = engines use their own budget)
    pub time_per_move_ms: Option<u64>,
    /// Extra time before a slow search is aborted from outside
    pub abort_grace_ms: u64,
    /// Depth limit handed to every search
    pub depth: u32,
    /// Plies before a game is adjudicated a draw
    pub max_plies: u32,
    /// Swap who moves first every game
    pub alternate_colors: bool,
    pub violation_policy: ViolationPolicy,
    /// Where to write the JSON results
    pub output: Option<PathBuf>,
    pub engines: Vec<EngineSpec>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            variant: VARIANT_FIXED.to_string(),
            games: 10,
            seed: 0,
            time_per_move_ms: None,
            abort_grace_ms: 1000,
            depth: 64,
            max_plies: 400,
            alternate_colors: true,
            violation_policy: ViolationPolicy::default(),
            output: None,
            engines: Vec::new(),
        }
    }
}

impl MatchConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Reject configurations that cannot produce a single game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        TzaarBoard::new(&self.variant, self.seed)?;
        if self.engines.len() < 2 {
            return Err(ConfigError::Invalid {
                message: format!("need at least two engines, got {}", self.engines.len()),
            });
        }
        let mut names = HashSet::new();
        for e in &self.engines {
            if !names.insert(e.name.as_str()) {
                return Err(ConfigError::Invalid {
                    message: format!("duplicate engine name '{}'", e.name),
                });
            }
        }
        if self.games == 0 {
            return Err(ConfigError::Invalid {
                message: "games must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
