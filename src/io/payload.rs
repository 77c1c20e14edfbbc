//! JSON payloads exchanged with the robot controller.
//!
//! Every field is optional on the wire so that a missing field can be
//! reported as a domain error (`MalformedGridPayload`, `MissingPoseData`)
//! instead of a generic deserialization failure.

use serde::{Deserialize, Serialize};

use crate::core::{GridDescriptor, WorldPoint};
use crate::coverage::RunLengthStream;
use crate::error::{MarjanaError, Result};
use crate::monitor::RobotPose;

/// Largest grid accepted from the controller (4096 x 4096 cells)
pub const MAX_GRID_CELLS: usize = 1 << 24;

/// `GET /get/cleaning_grid_map` response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GridPayload {
    pub lower_left_x: Option<f64>,
    pub lower_left_y: Option<f64>,
    pub size_x: Option<usize>,
    pub size_y: Option<usize>,
    pub resolution: Option<f64>,
    pub cleaned: Option<Vec<usize>>,
}

impl GridPayload {
    /// Parse a JSON body.
    ///
    /// Negative or fractional counts and sizes fail here.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| MarjanaError::MalformedGridPayload(e.to_string()))
    }

    /// Build a payload from a descriptor and stream
    pub fn from_parts(descriptor: &GridDescriptor, stream: &RunLengthStream) -> Self {
        Self {
            lower_left_x: Some(descriptor.lower_left_x),
            lower_left_y: Some(descriptor.lower_left_y),
            size_x: Some(descriptor.size_x),
            size_y: Some(descriptor.size_y),
            resolution: Some(descriptor.resolution),
            cleaned: Some(stream.counts().to_vec()),
        }
    }

    /// Validate into a descriptor and run-length stream.
    pub fn parse(&self) -> Result<(GridDescriptor, RunLengthStream)> {
        let lower_left_x = finite(require(self.lower_left_x, "lower_left_x")?, "lower_left_x")?;
        let lower_left_y = finite(require(self.lower_left_y, "lower_left_y")?, "lower_left_y")?;
        let size_x = require(self.size_x, "size_x")?;
        let size_y = require(self.size_y, "size_y")?;
        let resolution = finite(require(self.resolution, "resolution")?, "resolution")?;
        let cleaned = self
            .cleaned
            .as_ref()
            .ok_or_else(|| missing("cleaned"))?;

        if resolution <= 0.0 {
            return Err(MarjanaError::MalformedGridPayload(format!(
                "resolution must be positive, got {}",
                resolution
            )));
        }

        match size_x.checked_mul(size_y) {
            Some(cells) if cells <= MAX_GRID_CELLS => {}
            _ => {
                return Err(MarjanaError::MalformedGridPayload(format!(
                    "grid size {}x{} exceeds {} cells",
                    size_x, size_y, MAX_GRID_CELLS
                )));
            }
        }

        let descriptor = GridDescriptor {
            lower_left_x,
            lower_left_y,
            size_x,
            size_y,
            resolution,
        };

        Ok((descriptor, RunLengthStream::new(cleaned.clone())))
    }
}

/// `GET /get/rob_pose` response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PosePayload {
    pub x1: Option<f64>,
    pub y1: Option<f64>,
}

impl PosePayload {
    pub fn new(x1: f64, y1: f64) -> Self {
        Self {
            x1: Some(x1),
            y1: Some(y1),
        }
    }

    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| MarjanaError::MissingPoseData(e.to_string()))
    }

    /// Extract the pose; both coordinates must be present and finite
    pub fn pose(&self) -> Result<RobotPose> {
        match (self.x1, self.y1) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Ok(RobotPose::new(x, y)),
            (Some(x), Some(y)) => Err(MarjanaError::MissingPoseData(format!(
                "non-finite pose ({}, {})",
                x, y
            ))),
            (None, _) => Err(MarjanaError::MissingPoseData("field `x1` is missing".into())),
            (_, None) => Err(MarjanaError::MissingPoseData("field `y1` is missing".into())),
        }
    }
}

/// A wall segment from the feature map.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl LineSegment {
    pub fn start(&self) -> WorldPoint {
        WorldPoint::new(self.x1, self.y1)
    }

    pub fn end(&self) -> WorldPoint {
        WorldPoint::new(self.x2, self.y2)
    }
}

/// Docking station position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DockingPose {
    pub x: f64,
    pub y: f64,
}

/// Body of the `map` object in the feature map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureMap {
    /// Controller map identifier, numeric or string depending on firmware
    #[serde(default)]
    pub map_id: Option<serde_json::Value>,
    #[serde(default)]
    pub lines: Vec<LineSegment>,
    #[serde(default)]
    pub docking_pose: Option<DockingPose>,
}

impl FeatureMap {
    /// Map identifier as sent in request URLs
    pub fn map_id(&self) -> Option<String> {
        match self.map_id.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// `GET /get/feature_map` response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureMapPayload {
    #[serde(default)]
    pub map: FeatureMap,
}

/// A room outline from `GET /get/n_n_polygons`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    #[serde(default)]
    pub segments: Vec<LineSegment>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonMap {
    #[serde(default)]
    pub polygons: Vec<Polygon>,
}

/// `GET /get/n_n_polygons` response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonsPayload {
    #[serde(default)]
    pub map: PolygonMap,
}

fn require<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| missing(field))
}

fn missing(field: &str) -> MarjanaError {
    MarjanaError::MalformedGridPayload(format!("field `{}` is missing", field))
}

fn finite(value: f64, field: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MarjanaError::MalformedGridPayload(format!(
            "field `{}` is not finite",
            field
        )))
    }
}
