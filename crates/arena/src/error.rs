use board_core::{ConfigError, ConsistencyError, IllegalMoveError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("fallback move rejected: {0}")]
    Illegal(#[from] IllegalMoveError),

    #[error("game {game} between {first} and {second} failed verification: {source}")]
    Consistency {
        game: u32,
        first: String,
        second: String,
        #[source]
        source: ConsistencyError,
    },

    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("results serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
