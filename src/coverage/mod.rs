//! Uncleaned-region extraction.
//!
//! ```text
//! RunLengthStream ──decode──▶ DenseGrid ──group──▶ Vec<Region> ──centroid──▶ Vec<CleaningRegion>
//! ```
//!
//! - [`decoder`]: run-length stream to dense grid (and back)
//! - [`grouping`]: scan-order and connected-component region grouping
//! - [`centroid`]: world-space centroid per region

pub mod centroid;
pub mod decoder;
pub mod grouping;

pub use centroid::{CleaningRegion, centroid, locate_regions};
pub use decoder::{RunLengthStream, decode, encode};
pub use grouping::{
    ConnectedRegionGrouper, Connectivity, GroupingStrategy, Region, RegionGrouper,
    ScanOrderRegionGrouper,
};
