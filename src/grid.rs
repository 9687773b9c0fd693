//! Cells and the rectangular grid of a puzzle-based storage unit.
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in the grid, given by its horizontal and vertical position.
///
/// The bottom left corner is `(0, 0)`. Cells are ordered lexicographically by `(x, y)`, which is
/// the order used for every candidate list fed to the sampler.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct Cell {
    /// Horizontal position
    pub x: u32,
    /// Vertical position
    pub y: u32,
}

impl Cell {
    /// Create a new [`Cell`]
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<(u32, u32)> for Cell {
    fn from((x, y): (u32, u32)) -> Self {
        Self::new(x, y)
    }
}

impl From<Cell> for (u32, u32) {
    fn from(cell: Cell) -> Self {
        (cell.x, cell.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Render a list of cells as a parenthesised tuple list, e.g. `[(3, 0), (4, 0)]`
pub fn format_cells<'a, I>(cells: I) -> String
where
    I: IntoIterator<Item = &'a Cell>,
{
    format!("[{}]", cells.into_iter().join(", "))
}

/// The dimensions of a rectangular unit of `lx` by `ly` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Number of columns
    pub lx: u32,
    /// Number of rows
    pub ly: u32,
}

impl Grid {
    /// Create a new [`Grid`]
    pub fn new(lx: u32, ly: u32) -> Self {
        Self { lx, ly }
    }

    /// The total number of cells in the grid
    pub fn num_cells(&self) -> u64 {
        u64::from(self.lx) * u64::from(self.ly)
    }

    /// Whether `cell` lies within the grid
    pub fn contains(&self, cell: &Cell) -> bool {
        cell.x < self.lx && cell.y < self.ly
    }

    /// Iterate over every cell in ascending `(x, y)` order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        (0..self.lx)
            .cartesian_product(0..self.ly)
            .map(Cell::from)
    }

    /// All cells of the grid not in `excluded`, in ascending order.
    ///
    /// This is the candidate list for a draw: sorted so the sequence of draws depends only on
    /// the seed.
    pub fn cells_excluding(&self, excluded: &[Cell]) -> Vec<Cell> {
        self.cells().filter(|cell| !excluded.contains(cell)).collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.lx, self.ly)
    }
}
