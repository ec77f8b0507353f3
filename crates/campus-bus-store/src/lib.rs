//! In-memory store for the latest state of every live-reporting bus

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use campus_bus_domain::model::BusState;
use tracing::trace;

/// Keyed mapping from bus ID to its latest [`BusState`].
///
/// Writes replace a whole record under the write lock, so readers see either
/// the previous record or the new one and never a mix. Reads copy the current
/// records out under the read lock; a returned snapshot is unaffected by
/// later writes. Records are never evicted.
#[derive(Debug, Default)]
pub struct FleetStore {
    buses: RwLock<HashMap<String, BusState>>,
}

impl FleetStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave a half-written record: the
    // only mutation is a single `insert`.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, BusState>> {
        self.buses.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, BusState>> {
        self.buses.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace the record for `state.bus_id`, returning the previous one
    pub fn upsert(&self, state: BusState) -> Option<BusState> {
        trace!(bus_id = %state.bus_id, "upsert");
        self.write().insert(state.bus_id.clone(), state)
    }

    /// Copy of all records, sorted by bus ID
    pub fn snapshot(&self) -> Vec<BusState> {
        let mut buses: Vec<BusState> = self.read().values().cloned().collect();
        buses.sort_by(|a, b| a.bus_id.cmp(&b.bus_id));
        buses
    }

    /// Get a bus by ID
    pub fn get(&self, bus_id: &str) -> Option<BusState> {
        self.read().get(bus_id).cloned()
    }

    /// Number of buses that have reported at least once
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_bus_types::{BusStatus, GeoPoint};
    use chrono::Utc;
    use std::sync::Arc;
    use std::thread;

    fn state(id: &str, occupancy: u32) -> BusState {
        BusState {
            bus_id: id.to_string(),
            bus_number: None,
            route: "Uttara - DSC".to_string(),
            driver_name: None,
            position: GeoPoint::new(23.88, 90.40),
            occupancy,
            capacity: 50,
            status: BusStatus::OnTime,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_upsert_and_get() {
        let store = FleetStore::new();
        assert!(store.is_empty());

        assert!(store.upsert(state("b1", 10)).is_none());
        let previous = store.upsert(state("b1", 20)).unwrap();
        assert_eq!(previous.occupancy, 10);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("b1").unwrap().occupancy, 20);
        assert!(store.get("b2").is_none());
    }

    #[test]
    fn test_snapshot_is_sorted_and_detached() {
        let store = FleetStore::new();
        store.upsert(state("b2", 1));
        store.upsert(state("b1", 2));

        let snapshot = store.snapshot();
        let ids: Vec<_> = snapshot.iter().map(|s| s.bus_id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2"]);

        store.upsert(state("b1", 30));
        store.upsert(state("b3", 3));
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].occupancy, 2);
    }

    #[test]
    fn test_concurrent_upserts_to_different_buses() {
        let store = Arc::new(FleetStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for occupancy in 0..=40 {
                        store.upsert(state(&format!("b{i}"), occupancy));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 8);
        assert!(snapshot.iter().all(|s| s.occupancy == 40));
    }

    #[test]
    fn test_readers_never_see_torn_records() {
        let store = Arc::new(FleetStore::new());
        store.upsert(state("b1", 0));

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for n in 0..=50u32 {
                    let mut s = state("b1", n);
                    // position and occupancy always move together
                    s.position = GeoPoint::new(f64::from(n), f64::from(n));
                    store.upsert(s);
                }
            })
        };

        for _ in 0..200 {
            if let Some(s) = store.get("b1") {
                if s.occupancy > 0 {
                    assert_eq!(s.position.lat, f64::from(s.occupancy));
                    assert_eq!(s.position.lng, f64::from(s.occupancy));
                }
            }
        }
        writer.join().unwrap();
        assert_eq!(store.get("b1").unwrap().occupancy, 50);
    }
}
