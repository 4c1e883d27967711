//! A flat grid of terrain ids.
//!
//! [`Cell`] is a newtype over `u8`; what each value means (grass, rock,
//! tree, …) is decided by the tileset of the game using the grid.
//! [`Grid`] owns one cell per map square, stored row-major.

use crate::geom::{Dims, Point};

/// A terrain id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell(pub u8);

impl Cell {
    /// Create a new cell with the given value.
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Get the underlying value.
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl From<u8> for Cell {
    fn from(v: u8) -> Self {
        Self(v)
    }
}

impl From<Cell> for u8 {
    fn from(c: Cell) -> Self {
        c.0
    }
}

/// A 2D grid of [`Cell`] values, one per map square.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    dims: Dims,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new grid with every square set to `fill`.
    pub fn new(dims: Dims, fill: Cell) -> Self {
        Self {
            dims,
            cells: vec![fill; dims.area()],
        }
    }

    /// Build a grid from row-major cells. Returns `None` when the number
    /// of cells does not match the dimensions.
    pub fn from_cells(dims: Dims, cells: Vec<Cell>) -> Option<Self> {
        (cells.len() == dims.area()).then_some(Self { dims, cells })
    }

    /// Map dimensions.
    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Whether `p` lies on the grid.
    pub fn contains(&self, p: Point) -> bool {
        self.dims.contains(p)
    }

    /// Get the cell at a point, or `None` if out of bounds.
    pub fn at(&self, p: Point) -> Option<Cell> {
        let idx = self.dims.index(p).ok()?;
        Some(self.cells[idx])
    }

    /// Set the cell at a point. Returns `false` if out of bounds.
    pub fn set(&mut self, p: Point, cell: Cell) -> bool {
        match self.dims.index(p) {
            Ok(idx) => {
                self.cells[idx] = cell;
                true
            }
            Err(_) => false,
        }
    }

    /// Fill the entire grid with the given cell.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Count how many cells equal the given cell.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Row-major cells.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate over `(Point, Cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        self.dims.range().iter().zip(self.cells.iter().copied())
    }
}
