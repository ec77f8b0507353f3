//! Domain model types

pub mod bus_state;
pub mod fleet_entry;
pub mod report;
pub mod roster;
pub mod route;

pub use bus_state::BusState;
pub use fleet_entry::{FleetEntry, FleetSource};
pub use report::{GeoSample, PositionReport, ValidatedReport};
pub use roster::RosterEntry;
pub use route::Route;
