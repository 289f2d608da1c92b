//! Match results storage and reporting

use std::fmt::Write as _;
use std::path::Path;

use board_core::PlayerId;
use serde::{Deserialize, Serialize};

use crate::error::ArenaError;

/// Result of a single game from one side's perspective
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

impl GameResult {
    pub fn flipped(self) -> Self {
        match self {
            GameResult::Win => GameResult::Loss,
            GameResult::Loss => GameResult::Win,
            GameResult::Draw => GameResult::Draw,
        }
    }
}

/// Result of a match (multiple games), from the first engine's side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl MatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: GameResult) {
        match result {
            GameResult::Win => self.wins += 1,
            GameResult::Loss => self.losses += 1,
            GameResult::Draw => self.draws += 1,
        }
    }

    pub fn total_games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Score from engine1's perspective (1 for win, 0.5 for draw, 0 for loss)
    pub fn score(&self) -> f64 {
        let total = self.total_games() as f64;
        if total == 0.0 {
            return 0.5;
        }
        (self.wins as f64 + 0.5 * self.draws as f64) / total
    }

    /// Elo difference implied by the score, clamped for shutouts.
    pub fn elo_difference(&self) -> f64 {
        let score = self.score().clamp(0.01, 0.99);
        -400.0 * (1.0 / score - 1.0).log10()
    }
}

/// One finished game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Engine moving for player 0
    pub first: String,
    /// Engine moving for player 1
    pub second: String,
    pub seed: u64,
    /// None for a draw by the ply cap
    pub winner: Option<PlayerId>,
    /// Moves in display form
    pub moves: Vec<String>,
    /// Moves that came from the fallback instead of the engine
    pub fallbacks: u32,
    pub duration_ms: u64,
}

impl GameRecord {
    pub fn plies(&self) -> usize {
        self.moves.len()
    }

    /// Result from the point of view of `player`.
    pub fn result_for(&self, player: PlayerId) -> GameResult {
        match self.winner {
            Some(w) if w == player => GameResult::Win,
            Some(_) => GameResult::Loss,
            None => GameResult::Draw,
        }
    }
}

/// All games between one pair of engines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub engine1: String,
    pub engine2: String,
    pub result: MatchResult,
    pub games: Vec<GameRecord>,
}

/// Complete run results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentResults {
    pub variant: String,
    pub participants: Vec<String>,
    pub games_per_match: u32,
    pub matches: Vec<MatchEntry>,
}

impl TournamentResults {
    pub fn new(variant: &str, participants: Vec<String>, games_per_match: u32) -> Self {
        Self {
            variant: variant.to_string(),
            participants,
            games_per_match,
            matches: Vec::new(),
        }
    }

    pub fn add_match(&mut self, entry: MatchEntry) {
        self.matches.push(entry);
    }

    /// Total score per participant, in participant order.
    pub fn standings(&self) -> Vec<(String, f64, u32)> {
        let mut table: Vec<(String, f64, u32)> = self
            .participants
            .iter()
            .map(|p| (p.clone(), 0.0, 0))
            .collect();
        for entry in &self.matches {
            let r = &entry.result;
            let games = r.total_games();
            for (name, points) in [
                (&entry.engine1, r.wins as f64 + 0.5 * r.draws as f64),
                (&entry.engine2, r.losses as f64 + 0.5 * r.draws as f64),
            ] {
                if let Some(row) = table.iter_mut().find(|(p, _, _)| p == name) {
                    row.1 += points;
                    row.2 += games;
                }
            }
        }
        table
    }

    pub fn save(&self, path: &Path) -> Result<(), ArenaError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ArenaError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ArenaError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ArenaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Generate a text report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        let _ = writeln!(report, "=== {} ===\n", self.variant);
        let _ = writeln!(report, "Participants: {}", self.participants.join(", "));
        let _ = writeln!(report, "Games per match: {}\n", self.games_per_match);

        let _ = writeln!(
            report,
            "{:<20} vs {:<20} {:>5}-{:<5}-{:<5} {:>7}",
            "Engine 1", "Engine 2", "W", "L", "D", "Elo"
        );
        report.push_str(&"-".repeat(70));
        report.push('\n');
        for entry in &self.matches {
            let r = &entry.result;
            let _ = writeln!(
                report,
                "{:<20} vs {:<20} {:>5}-{:<5}-{:<5} {:>+7.0}",
                entry.engine1,
                entry.engine2,
                r.wins,
                r.losses,
                r.draws,
                r.elo_difference()
            );
        }

        report.push_str("\nStandings:\n");
        let mut standings = self.standings();
        standings.sort_by(|a, b| b.1.total_cmp(&a.1));
        for (rank, (name, points, games)) in standings.iter().enumerate() {
            let _ = writeln!(report, "{:>2}. {:<20} {:>5.1}/{}", rank + 1, name, points, games);
        }
        report
    }
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod results_tests;
