//! Latest known state of a live-reporting bus

use campus_bus_types::{BusStatus, GeoPoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current state of one bus, keyed by `bus_id` in the fleet store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusState {
    pub bus_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus_number: Option<String>,
    pub route: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(flatten)]
    pub position: GeoPoint,
    pub occupancy: u32,
    pub capacity: u32,
    pub status: BusStatus,
    /// Receipt time of the most recent accepted report
    pub last_updated: DateTime<Utc>,
}
