//! HTTP client for the robot controller.
//!
//! The controller exposes a small GET-only JSON API:
//!
//! | Endpoint                  | Payload               |
//! |---------------------------|-----------------------|
//! | `/get/cleaning_grid_map`  | [`GridPayload`]       |
//! | `/get/rob_pose`           | [`PosePayload`]       |
//! | `/get/feature_map`        | [`FeatureMapPayload`] |
//! | `/get/n_n_polygons`       | [`PolygonsPayload`]   |
//! | `/set/clean_spot?...`     | (ignored)             |
//!
//! Requests are not retried here; the caller decides what a failed fetch
//! means for the current cycle.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::core::WorldPoint;
use crate::error::{MarjanaError, Result};
use crate::orchestrator::ActionGateway;

use super::payload::{FeatureMapPayload, GridPayload, PolygonsPayload, PosePayload};

/// Blocking HTTP client for the controller API.
#[derive(Clone, Debug)]
pub struct RobotClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl RobotClient {
    /// Create a client for `base_url` (e.g. `http://192.168.1.23:10009`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Fetch the cleaning grid map
    pub fn grid_map(&self) -> Result<GridPayload> {
        let body = self.get_text("get/cleaning_grid_map")?;
        GridPayload::from_json(&body)
    }

    /// Fetch the current robot pose
    pub fn robot_pose(&self) -> Result<PosePayload> {
        let body = self.get_text("get/rob_pose")?;
        PosePayload::from_json(&body)
    }

    /// Fetch the feature map (map id, walls, docking pose)
    pub fn feature_map(&self) -> Result<FeatureMapPayload> {
        self.get_json("get/feature_map")
    }

    /// Fetch room outlines
    pub fn polygons(&self) -> Result<PolygonsPayload> {
        self.get_json("get/n_n_polygons")
    }

    /// URL of a spot-clean request
    pub fn clean_spot_url(&self, map_id: &str, target: WorldPoint, parameter_set: u32) -> String {
        format!(
            "{}?map_id={}&x1={}&y1={}&cleaning_parameter_set={}",
            self.url("set/clean_spot"),
            map_id,
            target.x,
            target.y,
            parameter_set
        )
    }

    fn get_text(&self, path: &str) -> Result<String> {
        let url = self.url(path);
        tracing::trace!("GET {}", url);
        let response = self.client.get(&url).send()?.error_for_status()?;
        Ok(response.text()?)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::trace!("GET {}", url);
        let response = self.client.get(&url).send()?.error_for_status()?;
        response.json().map_err(MarjanaError::from)
    }
}

/// Sends spot-clean requests to the controller over HTTP.
#[derive(Clone, Debug)]
pub struct HttpActionGateway {
    client: RobotClient,
    cleaning_parameter_set: u32,
}

impl HttpActionGateway {
    pub fn new(client: RobotClient, cleaning_parameter_set: u32) -> Self {
        Self {
            client,
            cleaning_parameter_set,
        }
    }
}

impl ActionGateway for HttpActionGateway {
    fn request_spot_clean(&mut self, target: WorldPoint, map_id: &str) {
        let url = self
            .client
            .clean_spot_url(map_id, target, self.cleaning_parameter_set);
        tracing::info!("Requesting spot clean: {}", url);

        if let Err(e) = self.client.client.get(&url).send() {
            tracing::warn!("Spot clean request failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = RobotClient::new("http://10.0.0.5:10009/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://10.0.0.5:10009");
        assert_eq!(
            client.url("/get/rob_pose"),
            "http://10.0.0.5:10009/get/rob_pose"
        );
        assert_eq!(
            client.url("get/feature_map"),
            "http://10.0.0.5:10009/get/feature_map"
        );
    }

    #[test]
    fn test_clean_spot_url() {
        let client = RobotClient::new("http://10.0.0.5:10009", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.clean_spot_url("42", WorldPoint::ZERO, 1),
            "http://10.0.0.5:10009/set/clean_spot?map_id=42&x1=0&y1=0&cleaning_parameter_set=1"
        );
        assert_eq!(
            client.clean_spot_url("42", WorldPoint::new(-150.5, 20.0), 2),
            "http://10.0.0.5:10009/set/clean_spot?map_id=42&x1=-150.5&y1=20&cleaning_parameter_set=2"
        );
    }
}
