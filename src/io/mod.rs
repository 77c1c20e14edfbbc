//! Controller I/O and export.
//!
//! - [`payload`]: JSON payloads of the controller API
//! - [`robot_client`]: blocking HTTP client and spot-clean gateway
//! - [`svg`]: per-cycle SVG snapshot

pub mod payload;
pub mod robot_client;
pub mod svg;

pub use payload::{
    DockingPose, FeatureMap, FeatureMapPayload, GridPayload, LineSegment, MAX_GRID_CELLS, Polygon, PolygonMap,
    PolygonsPayload, PosePayload,
};
pub use robot_client::{HttpActionGateway, RobotClient};
pub use svg::{CycleRenderer, SvgConfig};
