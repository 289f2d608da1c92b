//! Match runner for the search engines
//!
//! This crate provides infrastructure for:
//! - Reading TOML match files
//! - Playing round robins on Tzaar with a watchdog on every search
//! - Verifying each finished game by replay
//! - Writing and reporting JSON results
//!
//! # Usage
//!
//! ```bash
//! # Round robin from a match file
//! cargo run -p arena -- run crates/arena/configs/round_robin.toml
//!
//! # Quick match between two engines
//! cargo run -p arena -- match alphabeta:4 mcts:200 --games 6
//! ```

pub mod config;
pub mod error;
mod match_runner;
mod results;

pub use config::{EngineKind, EngineSpec, MatchConfig};
pub use error::ArenaError;
pub use match_runner::*;
pub use results::*;
