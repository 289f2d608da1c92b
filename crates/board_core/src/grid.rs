//! Board topology: a cell set with precomputed adjacency.
//!
//! Games compose a [`Grid`] with their own cell contents instead of
//! inheriting from a board class. Topology queries are free functions over
//! the grid ([`exit_to`], [`neighbors`], [`ray`]).
//!
//! Cells are numbered `0..len()` in row-major order of their coordinates,
//! which is the fixed order digests walk them in.

use std::collections::HashMap;
use std::fmt::Debug;

/// Dense index of a cell within its grid.
pub type CellId = usize;

/// Index into [`Geometry::directions`].
pub type Direction = usize;

/// Shape of a board: which coordinates exist and how they connect.
pub trait Geometry: Clone + Debug + Send + Sync + 'static {
    /// Coordinate offsets `(col, row)` of each direction.
    fn directions(&self) -> &'static [(i32, i32)];
    /// Whether `(col, row)` is a playable cell.
    fn contains(&self, col: i32, row: i32) -> bool;
    /// Inclusive `(min_col, max_col, min_row, max_row)` box enclosing all cells.
    fn extent(&self) -> (i32, i32, i32, i32);
}

/// Hexagonal board in axial coordinates, optionally without its center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hex {
    pub radius: i32,
    /// Remove the center cell (Tzaar-style boards)
    pub hole: bool,
}

const HEX_DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

impl Geometry for Hex {
    fn directions(&self) -> &'static [(i32, i32)] {
        &HEX_DIRECTIONS
    }

    fn contains(&self, q: i32, r: i32) -> bool {
        if self.hole && q == 0 && r == 0 {
            return false;
        }
        q.abs() <= self.radius && r.abs() <= self.radius && (q + r).abs() <= self.radius
    }

    fn extent(&self) -> (i32, i32, i32, i32) {
        (-self.radius, self.radius, -self.radius, self.radius)
    }
}

/// Rectangular board with orthogonal (and optionally diagonal) links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub width: i32,
    pub height: i32,
    pub diagonals: bool,
}

const RECT_ORTHO: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];
const RECT_ALL: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

impl Geometry for Rect {
    fn directions(&self) -> &'static [(i32, i32)] {
        if self.diagonals { &RECT_ALL } else { &RECT_ORTHO }
    }

    fn contains(&self, col: i32, row: i32) -> bool {
        (0..self.width).contains(&col) && (0..self.height).contains(&row)
    }

    fn extent(&self) -> (i32, i32, i32, i32) {
        (0, self.width - 1, 0, self.height - 1)
    }
}

/// Cells of a geometry with a precomputed link table.
#[derive(Debug, Clone)]
pub struct Grid<G: Geometry> {
    geometry: G,
    coords: Vec<(i32, i32)>,
    index: HashMap<(i32, i32), CellId>,
    /// `links[cell][dir]` is the neighbor in that direction, if any
    links: Vec<Vec<Option<CellId>>>,
}

impl<G: Geometry> Grid<G> {
    pub fn new(geometry: G) -> Self {
        let (min_c, max_c, min_r, max_r) = geometry.extent();
        let mut coords = Vec::new();
        for row in min_r..=max_r {
            for col in min_c..=max_c {
                if geometry.contains(col, row) {
                    coords.push((col, row));
                }
            }
        }
        let index: HashMap<(i32, i32), CellId> =
            coords.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        let links = coords
            .iter()
            .map(|&(col, row)| {
                geometry
                    .directions()
                    .iter()
                    .map(|&(dc, dr)| index.get(&(col + dc, row + dr)).copied())
                    .collect()
            })
            .collect();
        Self {
            geometry,
            coords,
            index,
            links,
        }
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn num_directions(&self) -> usize {
        self.geometry.directions().len()
    }

    pub fn coord(&self, cell: CellId) -> (i32, i32) {
        self.coords[cell]
    }

    pub fn cell_at(&self, col: i32, row: i32) -> Option<CellId> {
        self.index.get(&(col, row)).copied()
    }

    pub fn cells(&self) -> impl Iterator<Item = CellId> + '_ {
        0..self.coords.len()
    }
}

/// The cell adjacent to `cell` in `dir`, if it exists.
#[inline]
pub fn exit_to<G: Geometry>(grid: &Grid<G>, cell: CellId, dir: Direction) -> Option<CellId> {
    grid.links[cell][dir]
}

/// All cells adjacent to `cell`.
pub fn neighbors<G: Geometry>(grid: &Grid<G>, cell: CellId) -> impl Iterator<Item = CellId> + '_ {
    grid.links[cell].iter().flatten().copied()
}

/// Cells along a straight line from `cell` (exclusive) in `dir`, until the
/// edge or a missing cell.
pub fn ray<G: Geometry>(
    grid: &Grid<G>,
    cell: CellId,
    dir: Direction,
) -> impl Iterator<Item = CellId> + '_ {
    std::iter::successors(exit_to(grid, cell, dir), move |&c| exit_to(grid, c, dir))
}

/// Direction pointing the opposite way.
pub fn opposite<G: Geometry>(grid: &Grid<G>, dir: Direction) -> Direction {
    (dir + grid.num_directions() / 2) % grid.num_directions()
}

#[cfg(test)]
#[path = "grid_tests.rs"]
mod grid_tests;
