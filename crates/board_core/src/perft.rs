use crate::board::BoardState;
use crate::error::ConsistencyError;

/// Perft node count with make/unmake checking.
///
/// Counts all leaf positions reachable in exactly `depth` moves (terminal
/// positions count as leaves). After every unmake the digest must match the
/// one taken before the make. On error every move made above the failing
/// one is still unmade.
pub fn perft<B: BoardState>(board: &mut B, depth: u32) -> Result<u64, ConsistencyError> {
    if depth == 0 {
        return Ok(1);
    }

    fn inner<B: BoardState>(
        board: &mut B,
        depth: u32,
        layers: &mut [Vec<B::Move>],
    ) -> Result<u64, ConsistencyError> {
        if depth == 0 || board.game_over() {
            return Ok(1);
        }

        let Some((buf, rest)) = layers.split_first_mut() else {
            return Ok(1);
        };

        buf.clear();
        board.legal_moves_into(buf);

        let mut nodes = 0u64;
        for mv in buf.iter() {
            let before = board.digest();
            let undo = board.make_move(mv);
            let below = inner(board, depth - 1, rest);
            board.unmake_move(mv, undo);
            nodes += below?;
            let after = board.digest();
            if before != after {
                return Err(ConsistencyError::RoundTrip {
                    mv: mv.to_string(),
                    before,
                    after,
                });
            }
        }
        Ok(nodes)
    }

    let mut layers: Vec<Vec<B::Move>> = (0..depth).map(|_| Vec::with_capacity(64)).collect();
    inner(board, depth, &mut layers[..])
}
