//! Client-side diff between two fleet snapshots

use std::collections::HashMap;

use serde::Serialize;

use crate::model::FleetEntry;

/// Changes between a previous and current fleet snapshot
#[derive(Debug, Clone, Default, Serialize)]
pub struct FleetDiff {
    pub added: Vec<FleetEntry>,
    pub updated: Vec<FleetEntry>,
    pub removed: Vec<String>,
}

impl FleetDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    pub fn change_count(&self) -> usize {
        self.added.len() + self.updated.len() + self.removed.len()
    }
}

/// Diff two snapshots keyed by `bus_id`.
///
/// Query-time age annotations are ignored, so an unchanged bus whose report
/// merely got older is not reported as updated until it crosses into stale.
pub fn diff_snapshots(previous: &[FleetEntry], current: &[FleetEntry]) -> FleetDiff {
    let before: HashMap<&str, &FleetEntry> =
        previous.iter().map(|e| (e.bus_id.as_str(), e)).collect();
    let after: HashMap<&str, &FleetEntry> =
        current.iter().map(|e| (e.bus_id.as_str(), e)).collect();

    let mut diff = FleetDiff::default();

    for entry in current {
        match before.get(entry.bus_id.as_str()) {
            None => diff.added.push(entry.clone()),
            Some(old) if !old.same_state(entry) => diff.updated.push(entry.clone()),
            Some(_) => {}
        }
    }

    diff.removed = previous
        .iter()
        .filter(|e| !after.contains_key(e.bus_id.as_str()))
        .map(|e| e.bus_id.clone())
        .collect();

    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FleetSource;
    use campus_bus_types::{BusStatus, GeoPoint};

    fn entry(id: &str, occupancy: u32) -> FleetEntry {
        FleetEntry {
            bus_id: id.to_string(),
            bus_number: None,
            route: "Uttara - DSC".to_string(),
            driver_name: None,
            position: GeoPoint::new(23.88, 90.40),
            occupancy,
            capacity: 50,
            status: BusStatus::OnTime,
            last_updated: None,
            source: FleetSource::Roster,
            stale: false,
            age_secs: None,
        }
    }

    #[test]
    fn test_no_changes() {
        let snap = vec![entry("b1", 10), entry("b2", 20)];
        assert!(diff_snapshots(&snap, &snap).is_empty());
    }

    #[test]
    fn test_added_updated_removed() {
        let prev = vec![entry("b1", 10), entry("b2", 20)];
        let next = vec![entry("b1", 11), entry("b3", 5)];
        let diff = diff_snapshots(&prev, &next);

        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.added[0].bus_id, "b3");
        assert_eq!(diff.updated.len(), 1);
        assert_eq!(diff.updated[0].occupancy, 11);
        assert_eq!(diff.removed, vec!["b2".to_string()]);
        assert_eq!(diff.change_count(), 3);
    }

    #[test]
    fn test_age_only_change_ignored() {
        let prev = vec![entry("b1", 10)];
        let mut aged = entry("b1", 10);
        aged.age_secs = Some(42);
        assert!(diff_snapshots(&prev, &[aged]).is_empty());
    }
}
