//! Run-length decoding of the controller's cleaning grid.
//!
//! The controller sends its cleaning map as an alternating sequence of
//! counts, traversed row-major (x fastest, then y):
//!
//! ```text
//! cleaned = [skip, fill, skip, fill, ...]
//!            │     │
//!            │     └─ odd index:  mark this many cells NotCleaned
//!            └─────── even index: leave this many cells Cleaned
//! ```
//!
//! Both kinds of run wrap from the end of one row onto the start of the
//! next. Decoding stops as soon as the cursor walks off the last cell;
//! any remaining entries are ignored.

use serde::{Deserialize, Serialize};

use crate::core::{CellState, DenseGrid};

/// Alternating skip/fill counts, even index = skip, odd index = fill.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunLengthStream(Vec<usize>);

impl RunLengthStream {
    /// Wrap raw counts
    pub fn new(counts: Vec<usize>) -> Self {
        Self(counts)
    }

    /// Raw counts
    #[inline]
    pub fn counts(&self) -> &[usize] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total cells the stream describes (skips + fills)
    pub fn total_cells(&self) -> usize {
        self.0.iter().fold(0usize, |acc, &c| acc.saturating_add(c))
    }
}

impl From<Vec<usize>> for RunLengthStream {
    fn from(counts: Vec<usize>) -> Self {
        Self(counts)
    }
}

/// Decode a run-length stream into a `size_y` x `size_x` grid.
///
/// Every cell starts `Cleaned`. An empty stream or a zero-sized grid
/// returns immediately.
pub fn decode(stream: &RunLengthStream, size_x: usize, size_y: usize) -> DenseGrid {
    let mut grid = DenseGrid::new(size_x, size_y);
    let total = grid.len();

    if total == 0 || stream.is_empty() {
        return grid;
    }

    // Row-major cursor: x = cursor % size_x, y = cursor / size_x
    let mut cursor = 0usize;
    let mut consumed = 0usize;

    for (i, &count) in stream.counts().iter().enumerate() {
        if cursor >= total {
            break;
        }
        consumed = i + 1;

        if i % 2 == 0 {
            cursor = cursor.saturating_add(count);
        } else {
            let end = cursor.saturating_add(count).min(total);
            grid.fill_linear(cursor, end, CellState::NotCleaned);
            cursor = end;
        }
    }

    if consumed < stream.len() {
        tracing::debug!(
            "Grid end reached after {} of {} run-length entries, ignoring the rest",
            consumed,
            stream.len()
        );
    }

    grid
}

/// Encode a grid back into alternating skip/fill counts.
///
/// The first entry is always a skip count (zero when the grid starts with
/// a `NotCleaned` cell). A trailing `Cleaned` run is emitted as a final
/// skip so that the stream accounts for every cell.
pub fn encode(grid: &DenseGrid) -> RunLengthStream {
    let mut counts = Vec::new();
    let mut expecting = CellState::Cleaned;
    let mut run = 0usize;

    for &state in grid.states() {
        if state == expecting {
            run += 1;
        } else {
            counts.push(run);
            expecting = state;
            run = 1;
        }
    }

    if run > 0 {
        counts.push(run);
    }

    RunLengthStream(counts)
}
