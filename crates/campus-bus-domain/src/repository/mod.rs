//! Repository trait definitions for fleet reference data

use campus_bus_types::Error;

use crate::model::{RosterEntry, Route};

/// Repository for the route table
pub trait RouteRepository {
    /// All routes in display order
    fn find_all(&self) -> Result<Vec<Route>, Error>;

    /// Find a route by its display name
    fn find_by_name(&self, name: &str) -> Result<Option<Route>, Error>;
}

/// Repository for the bus roster
pub trait RosterRepository {
    /// All roster entries
    fn find_all(&self) -> Result<Vec<RosterEntry>, Error>;

    /// Find a roster entry by bus ID
    fn find_by_bus_id(&self, bus_id: &str) -> Result<Option<RosterEntry>, Error>;
}
