//! # Marjana
//!
//! Uncleaned-region detection and boundary watchdog for a robot vacuum
//! controller.
//!
//! Each cycle the controller's compact cleaning map is decoded, uncleaned
//! cells are grouped into regions, each region gets a world-space
//! centroid, and the robot pose is checked against two fixed axis
//! thresholds. Falling below either threshold triggers a spot-clean
//! request at a configured target.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      main                           │  ← Periodic loop
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                      io/                            │  ← Infrastructure
//! │          (payload, robot_client, svg)               │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                 orchestrator                        │  ← One cycle
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌──────────────────────────┐  ┌───────────────────────┐
//! │        coverage/         │  │       monitor         │  ← Algorithms
//! │ (decoder, grouping,      │  │  (boundary verdict)   │
//! │  centroid)               │  │                       │
//! └──────────────────────────┘  └───────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use marjana::{CleaningOrchestrator, RecordingGateway, Thresholds, WorldPoint};
//! use marjana::io::{GridPayload, PosePayload};
//!
//! let mut orchestrator = CleaningOrchestrator::new(
//!     RecordingGateway::new(),
//!     Thresholds::new(-1300.0, -2500.0),
//!     WorldPoint::ZERO,
//! )
//! .with_map_id("1");
//!
//! let grid: GridPayload = serde_json::from_str(
//!     r#"{"lower_left_x":0,"lower_left_y":0,"size_x":4,"size_y":2,"resolution":50,"cleaned":[2,3]}"#,
//! )?;
//! let result = orchestrator.run_cycle(&grid, Some(&PosePayload::new(-1400.0, 0.0)))?;
//! println!("{} regions, verdict {:?}", result.regions.len(), result.verdict);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod core;
pub mod coverage;
pub mod error;
pub mod io;
pub mod monitor;
pub mod orchestrator;

pub use config::MarjanaConfig;
pub use core::{CellIndex, CellState, DenseGrid, GridDescriptor, WorldPoint};
pub use coverage::{
    CleaningRegion, ConnectedRegionGrouper, Connectivity, GroupingStrategy, Region,
    RegionGrouper, RunLengthStream, ScanOrderRegionGrouper,
};
pub use error::{MarjanaError, Result};
pub use monitor::{BoundaryMonitor, RobotPose, Thresholds, Verdict};
pub use orchestrator::{
    ActionGateway, ActionOutcome, CleaningOrchestrator, CycleResult, RecordingGateway,
    SpotCleanRequest,
};
