//! Tzaar position and its turn structure.
//!
//! A turn is a mandatory capture followed by an optional second action
//! (capture, stack onto an own stack, or pass). The very first turn of the
//! game is the capture alone. A player loses when, at the start of their
//! turn, they cannot capture, or when any of their chip kinds no longer tops
//! a stack.

use std::sync::Arc;

use board_core::{
    BoardState, CellId, ConfigError, Digester, Grid, Hex, IllegalMoveError, MoveRecord, PlayerId,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::chip::{ALL_KINDS_MASK, Chip, ChipCatalog, ChipKind};
use crate::movegen;
use crate::moves::TzaarMove;

/// Radius-2 hexagon without its center: 18 cells.
pub const TZAAR_LITE: Hex = Hex {
    radius: 2,
    hole: true,
};

/// Fixed opening layout.
pub const VARIANT_FIXED: &str = "tzaar-lite";
/// All chips shuffled over the board from the game seed.
pub const VARIANT_RANDOM: &str = "tzaar-lite-random";

/// Point-symmetric opening: the cell opposite each entry holds the same kind
/// for the other player.
const FIXED_LAYOUT: [((i32, i32), PlayerId, ChipKind); 18] = [
    ((0, -2), 0, ChipKind::Tott),
    ((1, -2), 0, ChipKind::Tzarra),
    ((2, -2), 1, ChipKind::Tott),
    ((-1, -1), 1, ChipKind::Tott),
    ((0, -1), 0, ChipKind::Tzaar),
    ((1, -1), 1, ChipKind::Tzarra),
    ((2, -1), 1, ChipKind::Tott),
    ((-2, 0), 1, ChipKind::Tzarra),
    ((-1, 0), 1, ChipKind::Tzaar),
    ((1, 0), 0, ChipKind::Tzaar),
    ((2, 0), 0, ChipKind::Tzarra),
    ((-2, 1), 0, ChipKind::Tott),
    ((-1, 1), 0, ChipKind::Tzarra),
    ((0, 1), 1, ChipKind::Tzaar),
    ((1, 1), 0, ChipKind::Tott),
    ((-2, 2), 0, ChipKind::Tott),
    ((-1, 2), 1, ChipKind::Tzarra),
    ((0, 2), 1, ChipKind::Tott),
];

/// Where the current turn stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Capture,
    SecondAction,
    GameOver,
}

impl Phase {
    fn index(self) -> u64 {
        match self {
            Phase::Capture => 0,
            Phase::SecondAction => 1,
            Phase::GameOver => 2,
        }
    }
}

/// Everything `make_move` changed that the move itself does not record.
#[derive(Debug, Clone, Copy)]
pub struct TzaarUndo {
    phase: Phase,
    turn: PlayerId,
    won: [bool; 2],
    /// Height of the moved stack
    moved: usize,
    /// Height of the captured stack
    captured: usize,
}

#[derive(Debug, Clone)]
pub struct TzaarBoard {
    catalog: Arc<ChipCatalog>,
    grid: Arc<Grid<Hex>>,
    game_type: String,
    seed: u64,
    /// Stacks per cell, bottom first
    cells: Vec<Vec<Chip>>,
    /// Chips each player has captured, in capture order
    captures: [Vec<Chip>; 2],
    turn: PlayerId,
    phase: Phase,
    move_number: u32,
    won: [bool; 2],
}

impl TzaarBoard {
    /// A started game with a catalog of its own.
    pub fn new(game_type: &str, seed: u64) -> Result<Self, ConfigError> {
        Self::with_catalog(Arc::new(ChipCatalog::new()), game_type, seed)
    }

    /// A started game sharing `catalog` with other boards.
    pub fn with_catalog(
        catalog: Arc<ChipCatalog>,
        game_type: &str,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let mut board = Self {
            catalog,
            grid: Arc::new(Grid::new(TZAAR_LITE)),
            game_type: String::new(),
            seed: 0,
            cells: Vec::new(),
            captures: [Vec::new(), Vec::new()],
            turn: 0,
            phase: Phase::Capture,
            move_number: 0,
            won: [false; 2],
        };
        board.init(game_type, seed)?;
        Ok(board)
    }

    pub fn catalog(&self) -> &Arc<ChipCatalog> {
        &self.catalog
    }

    pub fn grid(&self) -> &Grid<Hex> {
        &self.grid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stack(&self, cell: CellId) -> &[Chip] {
        &self.cells[cell]
    }

    pub fn height(&self, cell: CellId) -> usize {
        self.cells[cell].len()
    }

    pub fn top(&self, cell: CellId) -> Option<Chip> {
        self.cells[cell].last().copied()
    }

    /// Owner of the stack on `cell`: the owner of its top chip.
    pub fn owner(&self, cell: CellId) -> Option<PlayerId> {
        self.top(cell).map(|c| c.owner)
    }

    pub fn captures(&self, player: PlayerId) -> &[Chip] {
        &self.captures[player]
    }

    /// Bit mask of the kinds topping `player`'s stacks.
    pub fn kind_mask(&self, player: PlayerId) -> u8 {
        self.cells
            .iter()
            .filter_map(|s| s.last())
            .filter(|c| c.owner == player)
            .fold(0, |mask, c| mask | c.kind.mask())
    }

    pub fn has_all_kinds(&self, player: PlayerId) -> bool {
        self.kind_mask(player) == ALL_KINDS_MASK
    }

    /// Total chips on the board and in capture piles.
    pub fn chip_count(&self) -> usize {
        self.cells.iter().map(Vec::len).sum::<usize>()
            + self.captures.iter().map(Vec::len).sum::<usize>()
    }

    fn layout(&mut self, game_type: &str, seed: u64) -> Result<(), ConfigError> {
        match game_type {
            VARIANT_FIXED => {
                for &((q, r), owner, kind) in &FIXED_LAYOUT {
                    let cell = self.grid.cell_at(q, r).ok_or_else(|| ConfigError::Invalid {
                        message: format!("layout cell ({q}, {r}) is not on the board"),
                    })?;
                    self.cells[cell].push(Chip::new(owner, kind));
                }
            }
            VARIANT_RANDOM => {
                let mut pool: Vec<Chip> = (0..2)
                    .flat_map(|p| self.catalog.initial_supply(p))
                    .collect();
                if pool.len() != self.grid.len() {
                    return Err(ConfigError::Invalid {
                        message: format!(
                            "{} chips do not fill {} cells",
                            pool.len(),
                            self.grid.len()
                        ),
                    });
                }
                pool.shuffle(&mut StdRng::seed_from_u64(seed));
                for (cell, chip) in pool.into_iter().enumerate() {
                    self.cells[cell].push(chip);
                }
            }
            other => return Err(ConfigError::UnknownGameType(other.to_string())),
        }
        Ok(())
    }

    /// Close the turn of `player` and decide whether the next one can start.
    fn end_turn(&mut self, player: PlayerId) {
        let next = 1 - player;
        self.turn = next;
        if !self.has_all_kinds(player) {
            self.finish(next);
        } else if !self.has_all_kinds(next) || !movegen::has_capture(self, next) {
            self.finish(player);
        } else {
            self.phase = Phase::Capture;
        }
    }

    /// After a capture or stack by `player`.
    fn after_action(&mut self, player: PlayerId) {
        let opening = self.move_number == 0;
        if self.phase == Phase::Capture && !opening && self.has_all_kinds(1 - player) {
            self.phase = Phase::SecondAction;
        } else {
            self.end_turn(player);
        }
    }

    fn finish(&mut self, winner: PlayerId) {
        self.won[winner] = true;
        self.phase = Phase::GameOver;
    }

    /// Fixed-layout board emptied and refilled with `stacks`.
    #[cfg(test)]
    pub(crate) fn with_stacks(
        stacks: &[((i32, i32), &[Chip])],
        player: PlayerId,
        phase: Phase,
        move_number: u32,
    ) -> Self {
        let mut board = Self::new(VARIANT_FIXED, 0).unwrap();
        board.cells.iter_mut().for_each(Vec::clear);
        for &((q, r), chips) in stacks {
            let cell = board.grid.cell_at(q, r).unwrap();
            board.cells[cell] = chips.to_vec();
        }
        board.turn = player;
        board.phase = phase;
        board.move_number = move_number;
        board
    }
}

impl BoardState for TzaarBoard {
    type Move = TzaarMove;
    type Undo = TzaarUndo;

    fn init(&mut self, game_type: &str, random_seed: u64) -> Result<(), ConfigError> {
        self.cells = vec![Vec::new(); self.grid.len()];
        self.captures = [Vec::new(), Vec::new()];
        self.layout(game_type, random_seed)?;
        self.game_type = game_type.to_string();
        self.seed = random_seed;
        self.turn = 0;
        self.move_number = 0;
        self.won = [false; 2];
        self.phase = Phase::Capture;
        if !movegen::has_capture(self, 0) {
            // Possible only with a shuffled layout
            debug!(game_type, random_seed, "first player has no capture");
            self.finish(1);
        }
        Ok(())
    }

    fn game_type(&self) -> &str {
        &self.game_type
    }

    fn random_seed(&self) -> u64 {
        self.seed
    }

    fn num_players(&self) -> usize {
        2
    }

    fn whose_turn(&self) -> PlayerId {
        self.turn
    }

    fn move_number(&self) -> u32 {
        self.move_number
    }

    fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    fn win_for_player(&self, player: PlayerId) -> bool {
        self.won.get(player).copied().unwrap_or(false)
    }

    fn digest(&self) -> u64 {
        let mut d = Digester::new();
        d.field(self.phase.index())
            .field(self.turn as u64)
            .field(self.move_number as u64)
            .flag(self.won[0])
            .flag(self.won[1]);
        for stack in &self.cells {
            d.stack(stack.iter().map(|&c| self.catalog.key(c)));
        }
        for pile in &self.captures {
            d.stack(pile.iter().map(|&c| self.catalog.key(c)));
        }
        d.finish()
    }

    fn same_state(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.catalog, &other.catalog) || self.catalog == other.catalog)
            && self.phase == other.phase
            && self.turn == other.turn
            && self.move_number == other.move_number
            && self.won == other.won
            && self.cells == other.cells
            && self.captures == other.captures
    }

    fn legal_moves_into(&self, moves: &mut Vec<TzaarMove>) {
        movegen::generate(self, moves);
    }

    fn make_move(&mut self, mv: &TzaarMove) -> TzaarUndo {
        let mut undo = TzaarUndo {
            phase: self.phase,
            turn: self.turn,
            won: self.won,
            moved: 0,
            captured: 0,
        };
        match *mv {
            TzaarMove::Capture { player, from, to } => {
                let victim = std::mem::take(&mut self.cells[to]);
                undo.captured = victim.len();
                self.captures[player].extend(victim);
                let stack = std::mem::take(&mut self.cells[from]);
                undo.moved = stack.len();
                self.cells[to] = stack;
                self.after_action(player);
            }
            TzaarMove::Stack { player, from, to } => {
                let stack = std::mem::take(&mut self.cells[from]);
                undo.moved = stack.len();
                self.cells[to].extend(stack);
                self.after_action(player);
            }
            TzaarMove::Pass { player } => self.end_turn(player),
            TzaarMove::Resign { player } => self.finish(1 - player),
        }
        self.move_number += 1;
        undo
    }

    fn unmake_move(&mut self, mv: &TzaarMove, undo: TzaarUndo) {
        match *mv {
            TzaarMove::Capture { player, from, to } => {
                self.cells[from] = std::mem::take(&mut self.cells[to]);
                let pile = &mut self.captures[player];
                self.cells[to] = pile.split_off(pile.len() - undo.captured);
            }
            TzaarMove::Stack { from, to, .. } => {
                let dest = &mut self.cells[to];
                self.cells[from] = dest.split_off(dest.len() - undo.moved);
            }
            TzaarMove::Pass { .. } | TzaarMove::Resign { .. } => {}
        }
        self.phase = undo.phase;
        self.turn = undo.turn;
        self.won = undo.won;
        self.move_number -= 1;
    }

    /// Like the provided check, but resignation is accepted from the player
    /// to move even though it is never generated.
    fn execute(&mut self, mv: &TzaarMove) -> Result<TzaarUndo, IllegalMoveError> {
        if self.game_over() {
            return Err(IllegalMoveError::new(mv, mv.player(), "game is over"));
        }
        if mv.player() != self.turn {
            return Err(IllegalMoveError::new(
                mv,
                mv.player(),
                format!("player {} is to move", self.turn),
            ));
        }
        if !matches!(mv, TzaarMove::Resign { .. }) && !self.legal_moves().contains(mv) {
            return Err(IllegalMoveError::new(mv, mv.player(), "not in the legal move set"));
        }
        Ok(self.make_move(mv))
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
