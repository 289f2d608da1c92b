use std::fmt;

use board_core::{CellId, Geometry, MoveRecord, PlayerId};

use crate::board::TZAAR_LITE;

/// One action of a Tzaar turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TzaarMove {
    /// Move a whole stack onto an enemy stack no taller than it
    Capture {
        player: PlayerId,
        from: CellId,
        to: CellId,
    },
    /// Move a whole stack on top of another own stack
    Stack {
        player: PlayerId,
        from: CellId,
        to: CellId,
    },
    /// Skip the optional second action
    Pass { player: PlayerId },
    Resign { player: PlayerId },
}

impl TzaarMove {
    pub fn from_to(&self) -> Option<(CellId, CellId)> {
        match *self {
            TzaarMove::Capture { from, to, .. } | TzaarMove::Stack { from, to, .. } => {
                Some((from, to))
            }
            TzaarMove::Pass { .. } | TzaarMove::Resign { .. } => None,
        }
    }
}

impl MoveRecord for TzaarMove {
    fn player(&self) -> PlayerId {
        match *self {
            TzaarMove::Capture { player, .. }
            | TzaarMove::Stack { player, .. }
            | TzaarMove::Pass { player }
            | TzaarMove::Resign { player } => player,
        }
    }
}

impl fmt::Display for TzaarMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TzaarMove::Capture { from, to, .. } => {
                write!(f, "{}x{}", cell_name(from), cell_name(to))
            }
            TzaarMove::Stack { from, to, .. } => {
                write!(f, "{}-{}", cell_name(from), cell_name(to))
            }
            TzaarMove::Pass { .. } => write!(f, "pass"),
            TzaarMove::Resign { .. } => write!(f, "resign"),
        }
    }
}

/// Human name of a cell: column letter from `a`, row number from 1.
pub fn cell_name(cell: CellId) -> String {
    let hex = TZAAR_LITE;
    let (min_c, max_c, min_r, max_r) = hex.extent();
    (min_r..=max_r)
        .flat_map(|r| (min_c..=max_c).map(move |q| (q, r)))
        .filter(|&(q, r)| hex.contains(q, r))
        .nth(cell)
        .map_or_else(
            || format!("#{cell}"),
            |(q, r)| format!("{}{}", (b'a' + (q - min_c) as u8) as char, r - min_r + 1),
        )
}
