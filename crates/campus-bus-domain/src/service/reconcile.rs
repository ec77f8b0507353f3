//! Merge live bus state with the static roster

use std::collections::BTreeMap;

use crate::model::{BusState, FleetEntry, RosterEntry};

/// Combine live records with the roster into one fleet listing.
///
/// Every roster bus appears exactly once. A live record with the same
/// `bus_id` replaces the roster entry entirely; roster buses without a live
/// record are emitted from their seed values with `source = roster` and no
/// `last_updated`. Live buses missing from the roster are included too.
/// Output is ordered by `bus_id`.
pub fn reconcile(live: &[BusState], roster: &[RosterEntry]) -> Vec<FleetEntry> {
    let mut merged: BTreeMap<&str, FleetEntry> = BTreeMap::new();

    for entry in roster {
        merged
            .entry(entry.bus_id.as_str())
            .or_insert_with(|| FleetEntry::from(entry));
    }

    for state in live {
        merged.insert(state.bus_id.as_str(), FleetEntry::from(state.clone()));
    }

    merged.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FleetSource;
    use campus_bus_types::{BusStatus, GeoPoint};
    use chrono::Utc;

    fn roster_entry(id: &str, route: &str) -> RosterEntry {
        RosterEntry {
            bus_id: id.to_string(),
            bus_number: format!("DIU-{}", id),
            route: route.to_string(),
            driver_name: "Mr. Rahim".to_string(),
            capacity: 50,
            lat: 23.8759,
            lng: 90.3795,
            occupancy: 35,
            status: BusStatus::OnTime,
        }
    }

    fn live_state(id: &str, route: &str, occupancy: u32) -> BusState {
        BusState {
            bus_id: id.to_string(),
            bus_number: None,
            route: route.to_string(),
            driver_name: None,
            position: GeoPoint::new(23.90, 90.41),
            occupancy,
            capacity: 50,
            status: BusStatus::Late,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_roster_only() {
        let roster = vec![roster_entry("b2", "Mirpur - DSC"), roster_entry("b1", "Uttara - DSC")];
        let fleet = reconcile(&[], &roster);
        assert_eq!(fleet.len(), 2);
        assert_eq!(fleet[0].bus_id, "b1");
        assert_eq!(fleet[1].bus_id, "b2");
        assert!(fleet.iter().all(|e| e.source == FleetSource::Roster));
        assert!(fleet.iter().all(|e| e.last_updated.is_none()));
    }

    #[test]
    fn test_live_overrides_roster() {
        let roster = vec![roster_entry("b1", "Uttara - DSC")];
        let live = vec![live_state("b1", "Uttara - DSC", 12)];
        let fleet = reconcile(&live, &roster);

        assert_eq!(fleet.len(), 1);
        let entry = &fleet[0];
        assert_eq!(entry.source, FleetSource::Live);
        assert_eq!(entry.occupancy, 12);
        assert_eq!(entry.status, BusStatus::Late);
        assert_eq!(entry.position, GeoPoint::new(23.90, 90.41));
        // no field-level merge: roster identity is not carried over
        assert_eq!(entry.bus_number, None);
        assert!(entry.last_updated.is_some());
    }

    #[test]
    fn test_every_roster_bus_exactly_once() {
        let roster = vec![
            roster_entry("b1", "Uttara - DSC"),
            roster_entry("b2", "Mirpur - DSC"),
            roster_entry("b3", "ECB - DSC"),
        ];
        let live = vec![
            live_state("b2", "Mirpur - DSC", 10),
            live_state("x9", "Savar - DSC", 5),
        ];
        let fleet = reconcile(&live, &roster);

        for r in &roster {
            assert_eq!(fleet.iter().filter(|e| e.bus_id == r.bus_id).count(), 1);
        }
        assert_eq!(fleet.len(), 4);
        let ids: Vec<_> = fleet.iter().map(|e| e.bus_id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2", "b3", "x9"]);
    }

    #[test]
    fn test_duplicate_roster_ids_collapse() {
        let roster = vec![roster_entry("b1", "Uttara - DSC"), roster_entry("b1", "ECB - DSC")];
        let fleet = reconcile(&[], &roster);
        assert_eq!(fleet.len(), 1);
        assert_eq!(fleet[0].route, "Uttara - DSC");
    }
}
