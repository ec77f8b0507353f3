//! Fleet dashboard summary

use campus_bus_types::BusStatus;
use serde::{Deserialize, Serialize};

use crate::model::{FleetEntry, Route};

/// Aggregate occupancy for one route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOccupancy {
    pub route: String,
    pub buses: usize,
    pub live_buses: usize,
    pub occupancy: u32,
    pub capacity: u32,
}

/// Dashboard figures derived from a reconciled fleet listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSummary {
    pub total_buses: usize,
    pub live_buses: usize,
    pub stale_buses: usize,
    /// Riders on live-reporting buses; roster placeholders do not count
    pub total_passengers: u32,
    pub late: usize,
    pub breakdown: usize,
    pub alerts: usize,
    pub routes: Vec<RouteOccupancy>,
}

/// Summarize a fleet listing. Routes appear in route-table order, followed by
/// any route names used by buses but missing from the table, sorted by name.
pub fn summarize(entries: &[FleetEntry], routes: &[Route]) -> FleetSummary {
    let live: Vec<&FleetEntry> = entries.iter().filter(|e| e.is_live()).collect();

    let late = entries
        .iter()
        .filter(|e| e.status == BusStatus::Late)
        .count();
    let breakdown = entries
        .iter()
        .filter(|e| e.status == BusStatus::Breakdown)
        .count();

    let mut route_names: Vec<String> = routes.iter().map(|r| r.name.clone()).collect();
    let mut unknown: Vec<String> = entries
        .iter()
        .map(|e| e.route.clone())
        .filter(|name| !route_names.contains(name))
        .collect();
    unknown.sort();
    unknown.dedup();
    route_names.extend(unknown);

    let routes = route_names
        .into_iter()
        .map(|name| {
            let on_route: Vec<&FleetEntry> = entries.iter().filter(|e| e.route == name).collect();
            let live_on_route: Vec<&&FleetEntry> = on_route.iter().filter(|e| e.is_live()).collect();
            RouteOccupancy {
                buses: on_route.len(),
                live_buses: live_on_route.len(),
                occupancy: live_on_route.iter().map(|e| e.occupancy).sum(),
                capacity: on_route.iter().map(|e| e.capacity).sum(),
                route: name,
            }
        })
        .collect();

    FleetSummary {
        total_buses: entries.len(),
        live_buses: live.len(),
        stale_buses: entries.iter().filter(|e| e.stale).count(),
        total_passengers: live.iter().map(|e| e.occupancy).sum(),
        late,
        breakdown,
        alerts: entries.iter().filter(|e| e.status.is_alert()).count(),
        routes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FleetSource;
    use campus_bus_types::GeoPoint;
    use chrono::Utc;

    fn entry(id: &str, route: &str, occupancy: u32, status: BusStatus, live: bool) -> FleetEntry {
        FleetEntry {
            bus_id: id.to_string(),
            bus_number: None,
            route: route.to_string(),
            driver_name: None,
            position: GeoPoint::new(23.8, 90.3),
            occupancy,
            capacity: 50,
            status,
            last_updated: live.then(Utc::now),
            source: if live { FleetSource::Live } else { FleetSource::Roster },
            stale: false,
            age_secs: None,
        }
    }

    fn route(id: &str, name: &str) -> Route {
        Route {
            id: id.to_string(),
            name: name.to_string(),
            stops: vec![],
            start_time: "08:00 AM".to_string(),
        }
    }

    #[test]
    fn test_summary_counts() {
        let routes = vec![route("r1", "Uttara - DSC"), route("r2", "Mirpur - DSC")];
        let entries = vec![
            entry("b1", "Uttara - DSC", 40, BusStatus::OnTime, true),
            entry("b2", "Mirpur - DSC", 48, BusStatus::Late, false),
            entry("b3", "Uttara - DSC", 10, BusStatus::Breakdown, true),
            entry("b4", "Ashulia - DSC", 7, BusStatus::OnTime, true),
        ];
        let summary = summarize(&entries, &routes);

        assert_eq!(summary.total_buses, 4);
        assert_eq!(summary.live_buses, 3);
        assert_eq!(summary.total_passengers, 57);
        assert_eq!(summary.late, 1);
        assert_eq!(summary.breakdown, 1);
        assert_eq!(summary.alerts, 2);

        let names: Vec<_> = summary.routes.iter().map(|r| r.route.as_str()).collect();
        assert_eq!(names, vec!["Uttara - DSC", "Mirpur - DSC", "Ashulia - DSC"]);

        let uttara = &summary.routes[0];
        assert_eq!(uttara.buses, 2);
        assert_eq!(uttara.occupancy, 50);
        assert_eq!(uttara.capacity, 100);

        // roster-only bus contributes capacity but no riders
        let mirpur = &summary.routes[1];
        assert_eq!(mirpur.live_buses, 0);
        assert_eq!(mirpur.occupancy, 0);
    }

    #[test]
    fn test_empty_fleet() {
        let summary = summarize(&[], &[route("r1", "Uttara - DSC")]);
        assert_eq!(summary.total_buses, 0);
        assert_eq!(summary.routes.len(), 1);
        assert_eq!(summary.routes[0].buses, 0);
    }
}
