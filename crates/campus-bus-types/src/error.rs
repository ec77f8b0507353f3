//! Error types for campus-bus

use thiserror::Error;

/// Rejection reasons for a position report.
///
/// A report that fails any check is rejected as a whole and never partially
/// applied to the fleet store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("bus_id must not be empty")]
    EmptyBusId,

    #[error("route must not be empty")]
    EmptyRoute,

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("occupancy {0} is negative")]
    NegativeOccupancy(i64),

    #[error("occupancy {occupancy} exceeds capacity {capacity}")]
    OccupancyExceedsCapacity { occupancy: i64, capacity: u32 },

    #[error("unknown status '{0}' (expected on-time, late or breakdown)")]
    UnknownStatus(String),
}

impl ValidationError {
    /// Stable machine-readable code returned to HTTP clients
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::EmptyBusId => "empty_bus_id",
            ValidationError::EmptyRoute => "empty_route",
            ValidationError::LatitudeOutOfRange(_) => "invalid_latitude",
            ValidationError::LongitudeOutOfRange(_) => "invalid_longitude",
            ValidationError::NegativeOccupancy(_) => "negative_occupancy",
            ValidationError::OccupancyExceedsCapacity { .. } => "occupancy_exceeds_capacity",
            ValidationError::UnknownStatus(_) => "invalid_status",
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

/// Failures talking to a fleet service over the network.
///
/// The service never sees these; the calling client decides whether to retry.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Server responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Conversational assistant failures
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Assistant upstream unavailable: {0}")]
    Unavailable(String),

    #[error("No assistant API key configured")]
    MissingApiKey,

    #[error("Assistant returned an empty response")]
    EmptyResponse,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid position report: {0}")]
    Validation(#[from] ValidationError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),

    #[error("Seed data error: {0}")]
    Seed(String),

    #[error("Invalid geolocation samples: {0}")]
    Samples(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Bus not found: {0}")]
    BusNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
