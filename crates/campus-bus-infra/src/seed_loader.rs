//! Route table and roster loader from TOML
//!
//! ```toml
//! [[routes]]
//! id = "r1"
//! name = "Uttara - DSC"
//! stops = ["Uttara", "Airport", "Abdullahpur", "DSC"]
//! start_time = "07:30 AM"
//!
//! [[roster]]
//! bus_id = "b1"
//! bus_number = "DIU-102"
//! route = "Uttara - DSC"
//! driver_name = "Mr. Rahim"
//! capacity = 50
//! lat = 23.8759
//! lng = 90.3795
//! occupancy = 35
//! status = "on-time"
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use campus_bus_domain::model::{RosterEntry, Route};
use campus_bus_types::{ConfigError, Error, GeoPoint, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Routes and roster loaded together, since roster entries refer to routes by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetSeed {
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub roster: Vec<RosterEntry>,
}

impl FleetSeed {
    /// Build a seed from in-memory data, applying the same checks as file loading
    pub fn new(routes: Vec<Route>, roster: Vec<RosterEntry>) -> Result<Self> {
        let mut seed = Self { routes, roster };
        seed.normalize();
        seed.validate()?;
        Ok(seed)
    }

    /// Load seed data from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(ConfigError::ParseError(format!(
                "Failed to read seed file {}: {}",
                path.display(),
                e
            )))
        })?;

        let seed = Self::load_from_str(&content)?;
        debug!(
            path = %path.display(),
            routes = seed.routes.len(),
            roster = seed.roster.len(),
            "Loaded fleet seed"
        );
        Ok(seed)
    }

    /// Load seed data from a TOML string
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut seed: FleetSeed = toml::from_str(toml_content).map_err(|e| {
            Error::Config(ConfigError::ParseError(format!(
                "Failed to parse seed TOML: {}",
                e
            )))
        })?;
        seed.normalize();
        seed.validate()?;
        Ok(seed)
    }

    /// Trim ids and route names so they match trimmed position reports
    fn normalize(&mut self) {
        for route in &mut self.routes {
            trim_in_place(&mut route.name);
        }
        for entry in &mut self.roster {
            trim_in_place(&mut entry.bus_id);
            trim_in_place(&mut entry.route);
        }
    }

    fn validate(&self) -> Result<()> {
        let mut route_names = HashSet::new();
        for route in &self.routes {
            if route.name.trim().is_empty() {
                return Err(Error::Seed(format!("route '{}' has an empty name", route.id)));
            }
            if !route_names.insert(route.name.as_str()) {
                return Err(Error::Seed(format!("duplicate route name '{}'", route.name)));
            }
        }

        let mut bus_ids = HashSet::new();
        for entry in &self.roster {
            if entry.bus_id.trim().is_empty() {
                return Err(Error::Seed("roster entry with empty bus_id".to_string()));
            }
            if !bus_ids.insert(entry.bus_id.as_str()) {
                return Err(Error::Seed(format!("duplicate bus_id '{}'", entry.bus_id)));
            }
            if !route_names.contains(entry.route.as_str()) {
                return Err(Error::Seed(format!(
                    "bus '{}' refers to unknown route '{}'",
                    entry.bus_id, entry.route
                )));
            }
            if entry.capacity == 0 {
                return Err(Error::Seed(format!("bus '{}' has zero capacity", entry.bus_id)));
            }
            if entry.occupancy > entry.capacity {
                return Err(Error::Seed(format!(
                    "bus '{}' seed occupancy {} exceeds capacity {}",
                    entry.bus_id, entry.occupancy, entry.capacity
                )));
            }
            if !GeoPoint::new(entry.lat, entry.lng).is_valid() {
                return Err(Error::Seed(format!(
                    "bus '{}' has an out-of-range seed position",
                    entry.bus_id
                )));
            }
        }

        Ok(())
    }

    /// Look up a route by display name
    pub fn route(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    /// Look up a roster entry by bus ID
    pub fn roster_entry(&self, bus_id: &str) -> Option<&RosterEntry> {
        self.roster.iter().find(|r| r.bus_id == bus_id)
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}
