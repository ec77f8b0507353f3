//! Position reports sent by drivers

use campus_bus_types::{BusStatus, GeoPoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position report as received on the wire.
///
/// Fields are kept loosely typed (signed occupancy, free-text status) so that
/// out-of-range values reach validation and produce a specific error code
/// instead of a generic decode failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionReport {
    pub bus_id: String,
    pub route: String,
    pub lat: f64,
    pub lng: f64,
    pub occupancy: i64,
    pub status: String,
}

impl PositionReport {
    pub fn new(
        bus_id: impl Into<String>,
        route: impl Into<String>,
        lat: f64,
        lng: f64,
        occupancy: i64,
        status: BusStatus,
    ) -> Self {
        Self {
            bus_id: bus_id.into(),
            route: route.into(),
            lat,
            lng,
            occupancy,
            status: status.to_string(),
        }
    }
}

/// A report that passed every check
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedReport {
    pub bus_id: String,
    pub route: String,
    pub position: GeoPoint,
    pub occupancy: u32,
    pub status: BusStatus,
}

/// One reading from a driver's geolocation source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoSample {
    pub lat: f64,
    pub lng: f64,
    /// Horizontal accuracy in meters, when the device reports it
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl GeoSample {
    pub fn at(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            accuracy: None,
            timestamp: None,
        }
    }
}
