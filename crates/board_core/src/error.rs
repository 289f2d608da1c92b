//! Error taxonomy shared by boards, search drivers and the verify harness.
//!
//! - [`IllegalMoveError`] and [`ConfigError`] cross the application boundary
//!   and are always returned as typed results.
//! - [`ConsistencyError`] means the state model is provably inconsistent
//!   (digest, `same_state` or replay disagree). It is always surfaced.
//! - [`InvariantViolation`] is raised inside search drivers when a board
//!   breaks its contract; it travels up as a `Result` until
//!   [`crate::invariant::settle`] decides to crash or degrade.
//!
//! Cooperative cancellation is not an error: drivers report it through
//! `SearchResult::stopped` and an `Option` move.

use thiserror::Error;

use crate::board::PlayerId;

/// A move was presented that is not in the current legal-move set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal move {mv} for player {player}: {reason}")]
pub struct IllegalMoveError {
    /// Display form of the rejected move
    pub mv: String,
    /// Player the move claims to be made by
    pub player: PlayerId,
    pub reason: String,
}

impl IllegalMoveError {
    pub fn new(mv: impl ToString, player: PlayerId, reason: impl Into<String>) -> Self {
        Self {
            mv: mv.to_string(),
            player,
            reason: reason.into(),
        }
    }
}

/// Unrecognized game type or unusable configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("unknown game type '{0}'")]
    UnknownGameType(String),

    #[error("invalid configuration: {message}")]
    Invalid { message: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// The state model disagrees with itself.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConsistencyError {
    #[error("digest mismatch after replaying {replayed} moves: live {expected:#018x}, replay {actual:#018x}")]
    DigestMismatch {
        expected: u64,
        actual: u64,
        replayed: usize,
    },

    #[error("digests agree ({digest:#018x}) but same_state reports a difference after {replayed} moves")]
    SameStateMismatch { digest: u64, replayed: usize },

    #[error("replay rejected move {index} ({mv}): {source}")]
    Replay {
        index: usize,
        mv: String,
        #[source]
        source: IllegalMoveError,
    },

    #[error("make/unmake of {mv} did not restore the position: {before:#018x} -> {after:#018x}")]
    RoundTrip { mv: String, before: u64, after: u64 },

    #[error("clone of {digest:#018x} is not interchangeable with its source")]
    BadClone { digest: u64 },

    #[error("could not reinitialize '{game_type}' for replay: {message}")]
    Reinit { game_type: String, message: String },
}

/// A board or driver broke an internal contract during search.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum InvariantViolation {
    #[error("no legal moves at non-terminal position {digest:#018x} (ply {ply})")]
    NoLegalMoves { digest: u64, ply: u32 },

    #[error("move generator produced an illegal move: {0}")]
    IllegalGeneratedMove(#[from] IllegalMoveError),

    #[error("inconsistent state during search: {0}")]
    Inconsistent(#[from] ConsistencyError),

    #[error("search worker panicked: {0}")]
    WorkerPanicked(String),
}
