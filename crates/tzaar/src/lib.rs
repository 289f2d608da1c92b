//! Reduced Tzaar
//!
//! Two players, nine chips each (two Tzaars, three Tzarras, four Totts) on a
//! radius-2 hex board without its center. Stacks move along lines over empty
//! cells; a stack captures an enemy stack no taller than itself. Each turn is
//! a mandatory capture plus an optional capture, stack or pass.
//!
//! Variants: `tzaar-lite` (fixed opening) and `tzaar-lite-random` (chips
//! shuffled from the game seed).

pub mod board;
pub mod chip;
pub mod eval;
pub mod gesture;
pub mod movegen;
pub mod moves;
pub mod playout;

pub use board::{Phase, TZAAR_LITE, TzaarBoard, TzaarUndo, VARIANT_FIXED, VARIANT_RANDOM};
pub use chip::{Chip, ChipCatalog, ChipKind};
pub use eval::{TzaarEvaluator, score_for_player};
pub use gesture::{GestureError, PendingTransaction};
pub use moves::{TzaarMove, cell_name};
pub use playout::{InhibitionConfig, TzaarPlayout};
