//! Default DIU route table and roster, used when no seed file is configured

use campus_bus_domain::model::{RosterEntry, Route};
use campus_bus_infra::FleetSeed;
use campus_bus_types::BusStatus;

fn route(id: &str, name: &str, stops: [&str; 4], start_time: &str) -> Route {
    Route {
        id: id.to_string(),
        name: name.to_string(),
        stops: stops.iter().map(|s| s.to_string()).collect(),
        start_time: start_time.to_string(),
    }
}

pub fn default_routes() -> Vec<Route> {
    vec![
        route("r1", "Uttara - DSC", ["Uttara", "Airport", "Abdullahpur", "DSC"], "07:30 AM"),
        route("r2", "Mirpur - DSC", ["Mirpur 10", "Mirpur 1", "Gabtoli", "DSC"], "08:00 AM"),
        route("r3", "Dhanmondi - DSC", ["Dhanmondi 32", "Asad Gate", "Gabtoli", "DSC"], "07:45 AM"),
        route("r4", "Savar - DSC", ["Savar Bazar", "Radio Colony", "Baipal", "DSC"], "08:15 AM"),
        route("r5", "ECB - DSC", ["ECB Circle", "Kalshi", "Mirpur 12", "DSC"], "07:15 AM"),
    ]
}

#[allow(clippy::too_many_arguments)]
fn bus(
    bus_id: &str,
    bus_number: &str,
    route: &str,
    driver_name: &str,
    lat: f64,
    lng: f64,
    status: BusStatus,
    occupancy: u32,
) -> RosterEntry {
    RosterEntry {
        bus_id: bus_id.to_string(),
        bus_number: bus_number.to_string(),
        route: route.to_string(),
        driver_name: driver_name.to_string(),
        capacity: 50,
        lat,
        lng,
        occupancy,
        status,
    }
}

pub fn default_roster() -> Vec<RosterEntry> {
    vec![
        bus("b1", "DIU-102", "Uttara - DSC", "Mr. Rahim", 23.8759, 90.3795, BusStatus::OnTime, 35),
        bus("b2", "DIU-205", "Mirpur - DSC", "Mr. Karim", 23.8223, 90.3654, BusStatus::Late, 48),
        bus("b3", "DIU-309", "ECB - DSC", "Mr. Selim", 23.8243, 90.3925, BusStatus::OnTime, 20),
    ]
}

/// Built-in routes and roster
pub fn default_seed() -> FleetSeed {
    FleetSeed {
        routes: default_routes(),
        roster: default_roster(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_seed_is_consistent() {
        let seed = default_seed();
        // same checks a seed file goes through
        let checked = FleetSeed::new(seed.routes.clone(), seed.roster.clone()).unwrap();
        assert_eq!(checked.routes.len(), 5);
        assert_eq!(checked.roster.len(), 3);
        assert_eq!(checked.roster_entry("b2").unwrap().bus_number, "DIU-205");
    }
}
