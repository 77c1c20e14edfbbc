//! Core types shared by every layer.
//!
//! ### Coordinates
//! - [`CellIndex`]: `(row, col)` indices into the cleaning grid
//! - [`WorldPoint`]: floating-point world coordinates in controller units
//!
//! ### Grid
//! - [`CellState`]: `Cleaned` / `NotCleaned`
//! - [`GridDescriptor`]: grid origin, size and resolution
//! - [`DenseGrid`]: decoded row-major cell states

mod grid;
mod point;

pub use grid::{CellState, DenseGrid, GridDescriptor};
pub use point::{CellIndex, WorldPoint};
