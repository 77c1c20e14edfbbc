//! Point and index types for the cleaning grid.

use serde::{Deserialize, Serialize};

/// Grid index of a single cell, `[row][col]`.
///
/// Rows grow along world +Y, columns along world +X.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex {
    /// Row index (y)
    pub row: usize,
    /// Column index (x)
    pub col: usize,
}

impl CellIndex {
    /// Create a new cell index
    #[inline]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Neighbors within a `height` x `width` grid.
    ///
    /// With `diagonals` false only the 4 cardinal neighbors are returned,
    /// otherwise all 8. Out-of-grid neighbors are dropped.
    pub fn neighbors(&self, width: usize, height: usize, diagonals: bool) -> Vec<CellIndex> {
        let mut out = Vec::with_capacity(if diagonals { 8 } else { 4 });
        for dr in -1i64..=1 {
            for dc in -1i64..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                if !diagonals && dr != 0 && dc != 0 {
                    continue;
                }
                let r = self.row as i64 + dr;
                let c = self.col as i64 + dc;
                if r < 0 || c < 0 || r >= height as i64 || c >= width as i64 {
                    continue;
                }
                out.push(CellIndex::new(r as usize, c as usize));
            }
        }
        out
    }
}

/// World coordinates in controller map units.
///
/// The controller reports positions in millimetres, so values in the
/// thousands are normal.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl WorldPoint {
    /// Create a new world point
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin
    pub const ZERO: WorldPoint = WorldPoint { x: 0.0, y: 0.0 };

    /// Both coordinates are finite
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_4_interior() {
        let n = CellIndex::new(1, 1).neighbors(3, 3, false);
        assert_eq!(n.len(), 4);
        assert!(n.contains(&CellIndex::new(0, 1)));
        assert!(n.contains(&CellIndex::new(2, 1)));
        assert!(n.contains(&CellIndex::new(1, 0)));
        assert!(n.contains(&CellIndex::new(1, 2)));
    }

    #[test]
    fn test_neighbors_corner_clipped() {
        assert_eq!(CellIndex::new(0, 0).neighbors(3, 3, false).len(), 2);
        assert_eq!(CellIndex::new(0, 0).neighbors(3, 3, true).len(), 3);
        assert_eq!(CellIndex::new(2, 2).neighbors(3, 3, true).len(), 3);
    }
}
