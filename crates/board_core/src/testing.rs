//! Toy boards for exercising drivers and the verify harness.
//!
//! - [`LineBoard`]: a race along a line of cells. Each player owns one piece
//!   and advances it one or two cells toward the far end; pieces stack when
//!   they share a cell. `line-2` has exactly one legal move, `A->B`.
//! - [`NimBoard`]: single-heap Nim, take one to three stones, taking the last
//!   stone wins. Positions with a multiple of four stones are lost for the
//!   player to move.

use std::fmt;

use crate::board::{BoardState, MoveRecord, PlayerId, WIN_THRESHOLD};
use crate::digest::Digester;
use crate::error::ConfigError;

fn parse_size(game_type: &str, prefix: &str, range: std::ops::RangeInclusive<usize>) -> Result<usize, ConfigError> {
    game_type
        .strip_prefix(prefix)
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|n| range.contains(n))
        .ok_or_else(|| ConfigError::UnknownGameType(game_type.to_string()))
}

fn cell_name(cell: usize) -> char {
    (b'A' + cell as u8) as char
}

// =============================================================================
// LineBoard
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMove {
    pub player: PlayerId,
    pub from: usize,
    pub to: usize,
}

impl fmt::Display for LineMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", cell_name(self.from), cell_name(self.to))
    }
}

impl MoveRecord for LineMove {
    fn player(&self) -> PlayerId {
        self.player
    }
}

/// Where the moved piece sat in its source stack.
#[derive(Debug, Clone, Copy)]
pub struct LineUndo {
    depth: usize,
    was_won: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBoard {
    game_type: String,
    seed: u64,
    /// Stacks of piece owners, bottom first
    cells: Vec<Vec<PlayerId>>,
    turn: PlayerId,
    move_number: u32,
    won: [bool; 2],
}

impl LineBoard {
    /// Build a started board; panics on an unknown game type.
    pub fn new(game_type: &str) -> Self {
        let mut board = Self {
            game_type: String::new(),
            seed: 0,
            cells: Vec::new(),
            turn: 0,
            move_number: 0,
            won: [false; 2],
        };
        if let Err(e) = board.init(game_type, 0) {
            panic!("{e}");
        }
        board
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn stack(&self, cell: usize) -> &[PlayerId] {
        &self.cells[cell]
    }

    pub fn goal(&self, player: PlayerId) -> usize {
        if player == 0 { self.cells.len() - 1 } else { 0 }
    }

    pub fn position_of(&self, player: PlayerId) -> usize {
        self.cells
            .iter()
            .position(|s| s.contains(&player))
            .unwrap_or_else(|| self.goal(player))
    }

    /// Cells still to travel before reaching the goal.
    pub fn distance(&self, player: PlayerId) -> usize {
        self.position_of(player).abs_diff(self.goal(player))
    }
}

impl BoardState for LineBoard {
    type Move = LineMove;
    type Undo = LineUndo;

    fn init(&mut self, game_type: &str, random_seed: u64) -> Result<(), ConfigError> {
        let n = parse_size(game_type, "line-", 2..=16)?;
        self.game_type = game_type.to_string();
        self.seed = random_seed;
        self.cells = vec![Vec::new(); n];
        self.cells[0].push(0);
        self.cells[n - 1].push(1);
        self.turn = 0;
        self.move_number = 0;
        self.won = [false; 2];
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
        self.won.iter().any(|&w| w)
    }

    fn win_for_player(&self, player: PlayerId) -> bool {
        self.won[player]
    }

    fn digest(&self) -> u64 {
        let mut d = Digester::new();
        for cell in &self.cells {
            d.stack(cell.iter().map(|&p| p as u64 + 1));
        }
        d.field(self.turn as u64)
            .field(self.move_number as u64)
            .flag(self.won[0])
            .flag(self.won[1]);
        d.finish()
    }

    fn same_state(&self, other: &Self) -> bool {
        self == other
    }

    fn legal_moves_into(&self, moves: &mut Vec<LineMove>) {
        if self.game_over() {
            return;
        }
        let player = self.turn;
        let from = self.position_of(player);
        let goal = self.goal(player);
        for step in 1..=2 {
            let to = if goal > from {
                from + step
            } else {
                match from.checked_sub(step) {
                    Some(to) => to,
                    None => break,
                }
            };
            if to.abs_diff(from) > goal.abs_diff(from) {
                break;
            }
            moves.push(LineMove { player, from, to });
        }
    }

    fn make_move(&mut self, mv: &LineMove) -> LineUndo {
        let source = &mut self.cells[mv.from];
        let depth = source.iter().position(|&p| p == mv.player).unwrap_or(source.len() - 1);
        let piece = source.remove(depth);
        self.cells[mv.to].push(piece);

        let was_won = self.won[mv.player];
        if mv.to == self.goal(mv.player) {
            self.won[mv.player] = true;
        }
        self.turn = 1 - mv.player;
        self.move_number += 1;
        LineUndo { depth, was_won }
    }

    fn unmake_move(&mut self, mv: &LineMove, undo: LineUndo) {
        if let Some(piece) = self.cells[mv.to].pop() {
            self.cells[mv.from].insert(undo.depth, piece);
        }
        self.won[mv.player] = undo.was_won;
        self.turn = mv.player;
        self.move_number -= 1;
    }
}

/// Distance race evaluation: positive when `player` is closer to its goal.
pub fn line_eval(board: &LineBoard, player: PlayerId) -> f64 {
    let opponent = 1 - player;
    if board.win_for_player(player) {
        return WIN_THRESHOLD;
    }
    if board.win_for_player(opponent) {
        return -WIN_THRESHOLD;
    }
    board.distance(opponent) as f64 - board.distance(player) as f64
}

// =============================================================================
// NimBoard
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NimMove {
    pub player: PlayerId,
    pub take: u32,
}

impl fmt::Display for NimMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "take {}", self.take)
    }
}

impl MoveRecord for NimMove {
    fn player(&self) -> PlayerId {
        self.player
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NimBoard {
    game_type: String,
    seed: u64,
    stones: u32,
    turn: PlayerId,
    move_number: u32,
    winner: Option<PlayerId>,
}

impl NimBoard {
    /// Build a started board; panics on an unknown game type.
    pub fn new(game_type: &str) -> Self {
        let mut board = Self {
            game_type: String::new(),
            seed: 0,
            stones: 0,
            turn: 0,
            move_number: 0,
            winner: None,
        };
        if let Err(e) = board.init(game_type, 0) {
            panic!("{e}");
        }
        board
    }

    pub fn stones(&self) -> u32 {
        self.stones
    }
}

impl BoardState for NimBoard {
    type Move = NimMove;
    type Undo = ();

    fn init(&mut self, game_type: &str, random_seed: u64) -> Result<(), ConfigError> {
        let n = parse_size(game_type, "nim-", 1..=64)?;
        self.game_type = game_type.to_string();
        self.seed = random_seed;
        self.stones = n as u32;
        self.turn = 0;
        self.move_number = 0;
        self.winner = None;
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
        self.winner.is_some()
    }

    fn win_for_player(&self, player: PlayerId) -> bool {
        self.winner == Some(player)
    }

    fn digest(&self) -> u64 {
        Digester::new()
            .field(self.stones as u64)
            .field(self.turn as u64)
            .field(self.move_number as u64)
            .field(self.winner.map_or(0, |p| p as u64 + 1))
            .finish()
    }

    fn same_state(&self, other: &Self) -> bool {
        self == other
    }

    fn legal_moves_into(&self, moves: &mut Vec<NimMove>) {
        if self.game_over() {
            return;
        }
        for take in 1..=self.stones.min(3) {
            moves.push(NimMove {
                player: self.turn,
                take,
            });
        }
    }

    fn make_move(&mut self, mv: &NimMove) {
        self.stones -= mv.take;
        if self.stones == 0 {
            self.winner = Some(mv.player);
        }
        self.turn = 1 - mv.player;
        self.move_number += 1;
    }

    fn unmake_move(&mut self, mv: &NimMove, _undo: ()) {
        self.stones += mv.take;
        self.winner = None;
        self.turn = mv.player;
        self.move_number -= 1;
    }
}

/// Exact Nim evaluation: won positions score `WIN_THRESHOLD`.
pub fn nim_eval(board: &NimBoard, player: PlayerId) -> f64 {
    if board.win_for_player(player) {
        return WIN_THRESHOLD;
    }
    if board.win_for_player(1 - player) {
        return -WIN_THRESHOLD;
    }
    0.0
}

#[cfg(test)]
#[path = "testing_tests.rs"]
mod testing_tests;
