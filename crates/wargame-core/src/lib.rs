//! **wargame-core**: grid geometry and terrain storage.
//!
//! This crate provides the board-level building blocks shared by the
//! wargame engine: integer points, half-open rectangles, map dimensions
//! with the linear-index bijection, and a flat grid of terrain ids.

pub mod geom;
pub mod grid;

pub use geom::{Dims, GeomError, Point, Range, RangeIter, chebyshev};
pub use grid::{Cell, Grid};
