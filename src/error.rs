//! Error types for Marjana

use thiserror::Error;

/// Marjana error type
#[derive(Error, Debug)]
pub enum MarjanaError {
    /// Grid payload is missing a field or carries an invalid value
    #[error("Malformed grid payload: {0}")]
    MalformedGridPayload(String),

    /// Pose payload is missing `x1`/`y1`
    #[error("Missing pose data: {0}")]
    MissingPoseData(String),

    /// Centroid requested for a region with no cells
    #[error("Region has no cells")]
    EmptyRegion,

    /// Transport failure talking to the robot controller
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for MarjanaError {
    fn from(e: toml::de::Error) -> Self {
        MarjanaError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MarjanaError>;
