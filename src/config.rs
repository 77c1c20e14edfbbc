//! Configuration loading for Marjana

use crate::coverage::GroupingStrategy;
use crate::core::WorldPoint;
use crate::error::{MarjanaError, Result};
use crate::monitor::Thresholds;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MarjanaConfig {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub boundary: BoundaryConfig,
    #[serde(default)]
    pub action: ActionConfig,
    #[serde(default)]
    pub cycle: CycleConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Robot controller connection
#[derive(Clone, Debug, Deserialize)]
pub struct ConnectionConfig {
    /// Controller base URL (default: http://192.168.1.23:10009)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds (default: 5000)
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

/// Boundary thresholds in controller map units
#[derive(Clone, Debug, Deserialize)]
pub struct BoundaryConfig {
    /// Violation when pose x drops below this (default: -1300)
    #[serde(default = "default_threshold_x")]
    pub threshold_x: f64,

    /// Violation when pose y drops below this (default: -2500)
    #[serde(default = "default_threshold_y")]
    pub threshold_y: f64,
}

/// Corrective spot-clean request
#[derive(Clone, Debug, Deserialize)]
pub struct ActionConfig {
    /// Spot-clean target x (default: 0)
    #[serde(default)]
    pub target_x: f64,

    /// Spot-clean target y (default: 0)
    #[serde(default)]
    pub target_y: f64,

    /// Controller cleaning parameter set (default: 1)
    #[serde(default = "default_cleaning_parameter_set")]
    pub cleaning_parameter_set: u32,
}

/// Loop timing and region grouping
#[derive(Clone, Debug, Deserialize)]
pub struct CycleConfig {
    /// Delay between cycles in milliseconds (default: 1000)
    #[serde(default = "default_interval")]
    pub interval_ms: u64,

    /// Region grouping strategy (default: scan_order)
    #[serde(default)]
    pub grouping: GroupingStrategy,
}

/// Output configuration
#[derive(Clone, Debug, Deserialize)]
pub struct OutputConfig {
    /// Path of the per-cycle SVG snapshot
    #[serde(default = "default_svg_path")]
    pub svg_path: String,

    /// Render the SVG snapshot every cycle (default: true)
    #[serde(default = "default_render")]
    pub render: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout(),
        }
    }
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            threshold_x: default_threshold_x(),
            threshold_y: default_threshold_y(),
        }
    }
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            target_x: 0.0,
            target_y: 0.0,
            cleaning_parameter_set: default_cleaning_parameter_set(),
        }
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
            grouping: GroupingStrategy::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            svg_path: default_svg_path(),
            render: default_render(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://192.168.1.23:10009".to_string()
}
fn default_timeout() -> u64 {
    5000
}
fn default_threshold_x() -> f64 {
    -1300.0
}
fn default_threshold_y() -> f64 {
    -2500.0
}
fn default_cleaning_parameter_set() -> u32 {
    1
}
fn default_interval() -> u64 {
    1000
}
fn default_svg_path() -> String {
    "result.svg".to_string()
}
fn default_render() -> bool {
    true
}

impl MarjanaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MarjanaError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: MarjanaConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let b = &self.boundary;
        if !b.threshold_x.is_finite() || !b.threshold_y.is_finite() {
            return Err(MarjanaError::Config("thresholds must be finite".into()));
        }
        let a = &self.action;
        if !a.target_x.is_finite() || !a.target_y.is_finite() {
            return Err(MarjanaError::Config("action target must be finite".into()));
        }
        if self.connection.base_url.is_empty() {
            return Err(MarjanaError::Config("connection.base_url is empty".into()));
        }
        Ok(())
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.boundary.threshold_x, self.boundary.threshold_y)
    }

    pub fn action_target(&self) -> WorldPoint {
        WorldPoint::new(self.action.target_x, self.action.target_y)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.connection.timeout_ms)
    }

    pub fn cycle_interval(&self) -> Duration {
        Duration::from_millis(self.cycle.interval_ms)
    }
}
