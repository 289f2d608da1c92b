//! Chips and the shared chip catalog.

use std::fmt;

use board_core::{DigestKeys, PlayerId};

/// Number of chip kinds per player.
pub const NUM_KINDS: usize = 3;

/// Chips of each kind a player starts with, indexed by [`ChipKind::index`].
pub const INITIAL_COUNTS: [usize; NUM_KINDS] = [2, 3, 4];

/// Seed of the per-chip digest constants.
const CATALOG_SEED: u64 = 143_006;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChipKind {
    Tzaar,
    Tzarra,
    Tott,
}

impl ChipKind {
    pub const ALL: [ChipKind; NUM_KINDS] = [ChipKind::Tzaar, ChipKind::Tzarra, ChipKind::Tott];

    pub fn index(self) -> usize {
        match self {
            ChipKind::Tzaar => 0,
            ChipKind::Tzarra => 1,
            ChipKind::Tott => 2,
        }
    }

    /// Bit used in per-player kind masks.
    pub fn mask(self) -> u8 {
        1 << self.index()
    }

    pub fn letter(self) -> char {
        match self {
            ChipKind::Tzaar => 'Z',
            ChipKind::Tzarra => 'R',
            ChipKind::Tott => 'T',
        }
    }
}

/// Mask with every kind present.
pub const ALL_KINDS_MASK: u8 = (1 << NUM_KINDS) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chip {
    pub owner: PlayerId,
    pub kind: ChipKind,
}

impl Chip {
    pub fn new(owner: PlayerId, kind: ChipKind) -> Self {
        Self { owner, kind }
    }

    /// Dense index into the catalog, `0..2 * NUM_KINDS`.
    pub fn index(self) -> usize {
        self.owner * NUM_KINDS + self.kind.index()
    }
}

impl fmt::Display for Chip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = self.kind.letter();
        if self.owner == 0 {
            write!(f, "{letter}")
        } else {
            write!(f, "{}", letter.to_ascii_lowercase())
        }
    }
}

/// Registry of the chip types of a game and their digest constants.
///
/// Built once and shared read-only between boards (and search clones) via
/// `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipCatalog {
    chips: Vec<Chip>,
    keys: DigestKeys,
}

impl Default for ChipCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ChipCatalog {
    pub fn new() -> Self {
        let chips: Vec<Chip> = (0..2)
            .flat_map(|owner| ChipKind::ALL.into_iter().map(move |kind| Chip::new(owner, kind)))
            .collect();
        let keys = DigestKeys::new(CATALOG_SEED, chips.len());
        Self { chips, keys }
    }

    pub fn chips(&self) -> &[Chip] {
        &self.chips
    }

    /// Digest constant of `chip`.
    #[inline]
    pub fn key(&self, chip: Chip) -> u64 {
        self.keys.key(chip.index())
    }

    /// Every chip `player` starts with, grouped by kind.
    pub fn initial_supply(&self, player: PlayerId) -> Vec<Chip> {
        self.chips
            .iter()
            .filter(|c| c.owner == player)
            .flat_map(|&c| std::iter::repeat_n(c, INITIAL_COUNTS[c.kind.index()]))
            .collect()
    }
}
