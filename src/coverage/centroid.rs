//! Region centroids in world coordinates.

use crate::core::{GridDescriptor, WorldPoint};
use crate::error::{MarjanaError, Result};

use super::grouping::Region;

/// A region together with its world-space centroid.
#[derive(Clone, Debug, PartialEq)]
pub struct CleaningRegion {
    /// Grouped cells
    pub region: Region,
    /// Unweighted mean of the cells' world positions
    pub centroid: WorldPoint,
}

impl CleaningRegion {
    /// Number of cells in the region
    #[inline]
    pub fn size(&self) -> usize {
        self.region.len()
    }
}

/// Arithmetic mean of the world positions of a region's cells.
///
/// Each cell maps through [`GridDescriptor::cell_to_world`]; x and y are
/// averaged independently. Fails with [`MarjanaError::EmptyRegion`] for a
/// region without cells.
pub fn centroid(region: &Region, descriptor: &GridDescriptor) -> Result<WorldPoint> {
    if region.is_empty() {
        return Err(MarjanaError::EmptyRegion);
    }

    let (sum_x, sum_y) = region
        .cells()
        .iter()
        .map(|&cell| descriptor.cell_to_world(cell))
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));

    let n = region.len() as f64;
    Ok(WorldPoint::new(sum_x / n, sum_y / n))
}

/// Attach a centroid to every region.
///
/// A region whose centroid cannot be computed is logged and skipped; it
/// does not abort the remaining regions.
pub fn locate_regions(regions: Vec<Region>, descriptor: &GridDescriptor) -> Vec<CleaningRegion> {
    let mut located = Vec::with_capacity(regions.len());

    for (i, region) in regions.into_iter().enumerate() {
        match centroid(&region, descriptor) {
            Ok(centroid) => located.push(CleaningRegion { region, centroid }),
            Err(e) => tracing::warn!("Skipping region {}: {}", i, e),
        }
    }

    located
}
