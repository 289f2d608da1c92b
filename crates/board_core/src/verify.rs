//! Copy/verify harness.
//!
//! [`verify`] replays a game history on a freshly initialized clone and
//! requires the result to be indistinguishable from the live board.
//! [`round_trip`] checks a single make/unmake pair. Both report mismatches as
//! [`ConsistencyError`]; callers decide whether that is fatal.

use tracing::error;

use crate::board::BoardState;
use crate::error::ConsistencyError;

/// Replay `history` from the start position of `live`'s game type and seed,
/// and check the replayed board against `live`.
pub fn verify<B: BoardState>(live: &B, history: &[B::Move]) -> Result<(), ConsistencyError> {
    let mut replay = live.clone();
    replay
        .init(live.game_type(), live.random_seed())
        .map_err(|e| ConsistencyError::Reinit {
            game_type: live.game_type().to_string(),
            message: e.to_string(),
        })?;

    for (index, mv) in history.iter().enumerate() {
        replay
            .execute(mv)
            .map_err(|source| ConsistencyError::Replay {
                index,
                mv: mv.to_string(),
                source,
            })?;
    }

    compare(live, &replay, history.len())
        .inspect_err(|e| error!(error = %e, moves = history.len(), "replay verification failed"))
}

/// Digest and structural comparison of two boards.
pub fn compare<B: BoardState>(live: &B, replay: &B, replayed: usize) -> Result<(), ConsistencyError> {
    let expected = live.digest();
    let actual = replay.digest();
    if expected != actual {
        return Err(ConsistencyError::DigestMismatch {
            expected,
            actual,
            replayed,
        });
    }
    if !live.same_state(replay) {
        return Err(ConsistencyError::SameStateMismatch {
            digest: expected,
            replayed,
        });
    }
    Ok(())
}

/// Make then unmake `mv` on a clone of `board` and require the clone to come
/// back digest-equal and structurally equal.
pub fn round_trip<B: BoardState>(board: &B, mv: &B::Move) -> Result<(), ConsistencyError> {
    let mut scratch = board.clone();
    check_clone(board, &scratch)?;

    let before = scratch.digest();
    let undo = scratch.make_move(mv);
    scratch.unmake_move(mv, undo);
    let after = scratch.digest();

    if before != after || !board.same_state(&scratch) {
        return Err(ConsistencyError::RoundTrip {
            mv: mv.to_string(),
            before,
            after,
        });
    }
    Ok(())
}

/// A fresh clone must be digest-equal and structurally equal to its source.
pub fn check_clone<B: BoardState>(board: &B, copy: &B) -> Result<(), ConsistencyError> {
    let digest = board.digest();
    if copy.digest() != digest || !board.same_state(copy) {
        return Err(ConsistencyError::BadClone { digest });
    }
    Ok(())
}

/// Round-trip every legal move of `board`.
pub fn round_trip_all<B: BoardState>(board: &B) -> Result<usize, ConsistencyError> {
    let moves = board.legal_moves();
    for mv in &moves {
        round_trip(board, mv)?;
    }
    Ok(moves.len())
}

#[cfg(test)]
#[path = "verify_tests.rs"]
mod verify_tests;
