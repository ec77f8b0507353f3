//! Read-side fleet record: a live bus or a roster placeholder

use campus_bus_types::{BusStatus, GeoPoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BusState, RosterEntry};

/// Where a fleet entry's fields came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FleetSource {
    Live,
    Roster,
}

/// One bus as served to polling clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetEntry {
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
    /// `None` until the bus has reported at least once
    pub last_updated: Option<DateTime<Utc>>,
    pub source: FleetSource,
    #[serde(default)]
    pub stale: bool,
    /// Seconds since the last report at query time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_secs: Option<i64>,
}

impl FleetEntry {
    pub fn is_live(&self) -> bool {
        self.source == FleetSource::Live
    }

    /// Compares everything except the query-time annotations (`age_secs`),
    /// which change on every poll.
    pub fn same_state(&self, other: &FleetEntry) -> bool {
        self.bus_id == other.bus_id
            && self.bus_number == other.bus_number
            && self.route == other.route
            && self.driver_name == other.driver_name
            && self.position == other.position
            && self.occupancy == other.occupancy
            && self.capacity == other.capacity
            && self.status == other.status
            && self.last_updated == other.last_updated
            && self.source == other.source
            && self.stale == other.stale
    }
}

impl From<BusState> for FleetEntry {
    fn from(state: BusState) -> Self {
        Self {
            bus_id: state.bus_id,
            bus_number: state.bus_number,
            route: state.route,
            driver_name: state.driver_name,
            position: state.position,
            occupancy: state.occupancy,
            capacity: state.capacity,
            status: state.status,
            last_updated: Some(state.last_updated),
            source: FleetSource::Live,
            stale: false,
            age_secs: None,
        }
    }
}

impl From<&RosterEntry> for FleetEntry {
    fn from(entry: &RosterEntry) -> Self {
        Self {
            bus_id: entry.bus_id.clone(),
            bus_number: Some(entry.bus_number.clone()),
            route: entry.route.clone(),
            driver_name: Some(entry.driver_name.clone()),
            position: entry.position(),
            occupancy: entry.occupancy,
            capacity: entry.capacity,
            status: entry.status,
            last_updated: None,
            source: FleetSource::Roster,
            stale: false,
            age_secs: None,
        }
    }
}
