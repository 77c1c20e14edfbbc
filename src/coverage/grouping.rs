//! Grouping of uncleaned cells into regions.
//!
//! Two groupers are provided:
//!
//! - [`ScanOrderRegionGrouper`] (default): walks the grid row-major and
//!   emits every maximal run of consecutive `NotCleaned` cells as one
//!   region. "Consecutive" is adjacency in the linear traversal, so the
//!   last cell of row `r` and the first cell of row `r + 1` join the same
//!   region, while cells stacked vertically across rows never do.
//! - [`ConnectedRegionGrouper`]: true connected-component labeling with
//!   4- or 8-connectivity (BFS flood fill). This is a separate strategy,
//!   not a corrected version of the scan-order grouper; the two produce
//!   different regions for the same grid.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::{CellIndex, CellState, DenseGrid};

/// One group of `NotCleaned` cells.
///
/// Groupers only ever emit non-empty regions. Regions are rebuilt every
/// cycle and carry no identity between cycles.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Region {
    cells: Vec<CellIndex>,
}

impl Region {
    pub fn new(cells: Vec<CellIndex>) -> Self {
        Self { cells }
    }

    /// Cells in the order the grouper visited them
    #[inline]
    pub fn cells(&self) -> &[CellIndex] {
        &self.cells
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// First cell in visiting order
    #[inline]
    pub fn first(&self) -> Option<CellIndex> {
        self.cells.first().copied()
    }
}

/// Strategy for grouping uncleaned cells.
///
/// # Example
///
/// ```ignore
/// use marjana::coverage::{RegionGrouper, ScanOrderRegionGrouper};
///
/// fn count_regions<G: RegionGrouper>(grouper: &G, grid: &DenseGrid) -> usize {
///     grouper.group(grid).len()
/// }
/// ```
pub trait RegionGrouper: Send + Sync {
    /// Group all `NotCleaned` cells of `grid` into regions
    fn group(&self, grid: &DenseGrid) -> Vec<Region>;

    /// Name of this grouper for logging
    fn name(&self) -> &str;
}

/// Scan-order run grouping (the controller-compatible behavior).
#[derive(Clone, Copy, Debug, Default)]
pub struct ScanOrderRegionGrouper;

impl ScanOrderRegionGrouper {
    pub fn new() -> Self {
        Self
    }
}

impl RegionGrouper for ScanOrderRegionGrouper {
    fn group(&self, grid: &DenseGrid) -> Vec<Region> {
        let mut regions = Vec::new();
        let mut current: Option<Vec<CellIndex>> = None;

        for (cell, state) in grid.iter() {
            match state {
                CellState::NotCleaned => current.get_or_insert_with(Vec::new).push(cell),
                CellState::Cleaned => {
                    if let Some(cells) = current.take() {
                        regions.push(Region::new(cells));
                    }
                }
            }
        }

        if let Some(cells) = current.take() {
            regions.push(Region::new(cells));
        }

        regions
    }

    fn name(&self) -> &str {
        "scan_order"
    }
}

/// Neighborhood used by [`ConnectedRegionGrouper`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// N, E, S, W
    #[default]
    Four,
    /// Cardinals plus diagonals
    Eight,
}

/// Connected-component grouper (BFS flood fill).
///
/// Regions are ordered by their first cell in row-major order; cells
/// within a region are in BFS visiting order.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConnectedRegionGrouper {
    connectivity: Connectivity,
}

impl ConnectedRegionGrouper {
    pub fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }
}

impl RegionGrouper for ConnectedRegionGrouper {
    fn group(&self, grid: &DenseGrid) -> Vec<Region> {
        let diagonals = self.connectivity == Connectivity::Eight;
        let mut visited = vec![false; grid.len()];
        let mut regions = Vec::new();

        for (start, state) in grid.iter() {
            let Some(start_idx) = grid.index_of(start) else {
                continue;
            };
            if state != CellState::NotCleaned || visited[start_idx] {
                continue;
            }

            let mut cells = Vec::new();
            let mut queue = VecDeque::new();
            queue.push_back(start);
            visited[start_idx] = true;

            while let Some(current) = queue.pop_front() {
                cells.push(current);

                for neighbor in current.neighbors(grid.width(), grid.height(), diagonals) {
                    let Some(idx) = grid.index_of(neighbor) else {
                        continue;
                    };
                    if !visited[idx] && grid.states()[idx] == CellState::NotCleaned {
                        visited[idx] = true;
                        queue.push_back(neighbor);
                    }
                }
            }

            regions.push(Region::new(cells));
        }

        regions
    }

    fn name(&self) -> &str {
        match self.connectivity {
            Connectivity::Four => "four_connected",
            Connectivity::Eight => "eight_connected",
        }
    }
}

/// Grouper selection, as named in configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingStrategy {
    #[default]
    ScanOrder,
    FourConnected,
    EightConnected,
}

impl GroupingStrategy {
    /// Build the grouper for this strategy
    pub fn build(self) -> Box<dyn RegionGrouper> {
        match self {
            GroupingStrategy::ScanOrder => Box::new(ScanOrderRegionGrouper),
            GroupingStrategy::FourConnected => {
                Box::new(ConnectedRegionGrouper::new(Connectivity::Four))
            }
            GroupingStrategy::EightConnected => {
                Box::new(ConnectedRegionGrouper::new(Connectivity::Eight))
            }
        }
    }
}
