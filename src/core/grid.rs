//! Cleaning grid types.
//!
//! The controller describes its cleaning map with a [`GridDescriptor`]
//! (origin, size, resolution) and a run-length stream. Decoding that stream
//! produces a [`DenseGrid`] of per-cell [`CellState`]s.

use serde::{Deserialize, Serialize};

use super::point::{CellIndex, WorldPoint};

/// Cleaning state of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellState {
    /// Cell has been cleaned (or was never part of a fill run)
    #[default]
    Cleaned = 0,
    /// Cell is still waiting to be cleaned
    NotCleaned = 1,
}

impl CellState {
    /// Single character representation for debugging
    pub fn as_char(self) -> char {
        match self {
            CellState::Cleaned => '.',
            CellState::NotCleaned => '#',
        }
    }
}

/// Geometry of the controller's cleaning grid.
///
/// Received fresh every cycle; never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridDescriptor {
    /// World X of the grid origin (cell `[0][0]`)
    pub lower_left_x: f64,
    /// World Y of the grid origin (cell `[0][0]`)
    pub lower_left_y: f64,
    /// Number of columns
    pub size_x: usize,
    /// Number of rows
    pub size_y: usize,
    /// World units per cell
    pub resolution: f64,
}

impl GridDescriptor {
    /// Total number of cells
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.size_x * self.size_y
    }

    /// World position of a cell.
    ///
    /// Uses the cell's lower-left corner, not its center:
    /// `x = lower_left_x + col * resolution`, `y = lower_left_y + row * resolution`.
    #[inline]
    pub fn cell_to_world(&self, cell: CellIndex) -> WorldPoint {
        WorldPoint::new(
            self.lower_left_x + cell.col as f64 * self.resolution,
            self.lower_left_y + cell.row as f64 * self.resolution,
        )
    }

    /// World-space extent `(min, max)` covered by the grid
    pub fn bounds(&self) -> (WorldPoint, WorldPoint) {
        let min = WorldPoint::new(self.lower_left_x, self.lower_left_y);
        let max = WorldPoint::new(
            self.lower_left_x + self.size_x as f64 * self.resolution,
            self.lower_left_y + self.size_y as f64 * self.resolution,
        );
        (min, max)
    }
}

/// Dense row-major grid of cell states, indexed `[row][col]`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DenseGrid {
    cells: Vec<CellState>,
    width: usize,
    height: usize,
}

impl DenseGrid {
    /// Create an all-`Cleaned` grid with `width` columns and `height` rows
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![CellState::Cleaned; width * height],
            width,
            height,
        }
    }

    /// Grid width in cells (columns)
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells (rows)
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when the grid has no cells
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major linear index of a cell
    #[inline]
    pub fn index_of(&self, cell: CellIndex) -> Option<usize> {
        if cell.row < self.height && cell.col < self.width {
            Some(cell.row * self.width + cell.col)
        } else {
            None
        }
    }

    /// Cell at a row-major linear index
    #[inline]
    pub fn cell_at(&self, index: usize) -> CellIndex {
        CellIndex::new(index / self.width, index % self.width)
    }

    /// State of a cell, `None` when out of bounds
    #[inline]
    pub fn get(&self, cell: CellIndex) -> Option<CellState> {
        self.index_of(cell).map(|i| self.cells[i])
    }

    /// Set the state of a cell. Returns false when out of bounds.
    #[inline]
    pub fn set(&mut self, cell: CellIndex, state: CellState) -> bool {
        match self.index_of(cell) {
            Some(i) => {
                self.cells[i] = state;
                true
            }
            None => false,
        }
    }

    /// Mark the linear range `[start, end)` as `state`, clamped to the grid
    pub(crate) fn fill_linear(&mut self, start: usize, end: usize, state: CellState) {
        let end = end.min(self.cells.len());
        if start < end {
            self.cells[start..end].fill(state);
        }
    }

    /// Cell states in row-major order
    #[inline]
    pub fn states(&self) -> &[CellState] {
        &self.cells
    }

    /// Iterate `(index, state)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (CellIndex, CellState)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &state)| (self.cell_at(i), state))
    }

    /// Number of `NotCleaned` cells
    pub fn count_not_cleaned(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&s| s == CellState::NotCleaned)
            .count()
    }

    /// Multi-line debug rendering, row 0 first
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.height);
        for row in self.cells.chunks(self.width.max(1)) {
            out.extend(row.iter().map(|s| s.as_char()));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_all_cleaned() {
        let grid = DenseGrid::new(4, 3);
        assert_eq!(grid.len(), 12);
        assert_eq!(grid.count_not_cleaned(), 0);
        assert_eq!(grid.get(CellIndex::new(2, 3)), Some(CellState::Cleaned));
        assert_eq!(grid.get(CellIndex::new(3, 0)), None);
        assert_eq!(grid.get(CellIndex::new(0, 4)), None);
    }

    #[test]
    fn test_set_and_linear_index() {
        let mut grid = DenseGrid::new(4, 3);
        assert!(grid.set(CellIndex::new(1, 2), CellState::NotCleaned));
        assert!(!grid.set(CellIndex::new(5, 0), CellState::NotCleaned));
        assert_eq!(grid.index_of(CellIndex::new(1, 2)), Some(6));
        assert_eq!(grid.cell_at(6), CellIndex::new(1, 2));
        assert_eq!(grid.states()[6], CellState::NotCleaned);
        assert_eq!(grid.to_ascii(), "....\n..#.\n....\n");
    }

    #[test]
    fn test_fill_linear_clamped() {
        let mut grid = DenseGrid::new(2, 2);
        grid.fill_linear(3, 10, CellState::NotCleaned);
        assert_eq!(grid.count_not_cleaned(), 1);
        grid.fill_linear(2, 1, CellState::NotCleaned);
        assert_eq!(grid.count_not_cleaned(), 1);
    }

    #[test]
    fn test_descriptor_cell_to_world() {
        let desc = GridDescriptor {
            lower_left_x: -1000.0,
            lower_left_y: 500.0,
            size_x: 10,
            size_y: 5,
            resolution: 50.0,
        };
        let p = desc.cell_to_world(CellIndex::new(2, 3));
        assert!((p.x - -850.0).abs() < 1e-9);
        assert!((p.y - 600.0).abs() < 1e-9);

        let (min, max) = desc.bounds();
        assert_eq!(min, WorldPoint::new(-1000.0, 500.0));
        assert_eq!(max, WorldPoint::new(-500.0, 750.0));
    }
}
