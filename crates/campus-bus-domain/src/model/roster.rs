//! Roster seed data

use campus_bus_types::{BusStatus, GeoPoint};
use serde::{Deserialize, Serialize};

/// A bus expected to appear in the fleet even without a live report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub bus_id: String,
    pub bus_number: String,
    pub route: String,
    pub driver_name: String,
    pub capacity: u32,
    /// Seed position shown until the bus reports
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub occupancy: u32,
    #[serde(default)]
    pub status: BusStatus,
}

impl RosterEntry {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}
