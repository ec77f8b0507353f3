//! Ingest Service - Accept Position Reports

use std::sync::Arc;

use campus_bus_domain::model::{BusState, PositionReport};
use campus_bus_domain::repository::RosterRepository;
use campus_bus_domain::service::validate_report;
use campus_bus_infra::persistence::SeedRepository;
use campus_bus_store::FleetStore;
use campus_bus_types::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

/// Acknowledgement returned for an accepted report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
    pub bus_id: String,
    pub received_at: DateTime<Utc>,
    /// Correlates this acknowledgement with the server log line
    pub receipt_id: Uuid,
}

/// Validates driver reports and writes them to the fleet store.
///
/// Each accepted report is exactly one whole-record upsert. Ordering between
/// concurrent reporters is receipt order: the last accepted write wins.
#[derive(Clone)]
pub struct IngestService {
    store: Arc<FleetStore>,
    roster: Arc<SeedRepository>,
    default_capacity: u32,
}

impl IngestService {
    pub fn new(store: Arc<FleetStore>, roster: Arc<SeedRepository>, default_capacity: u32) -> Self {
        Self {
            store,
            roster,
            default_capacity,
        }
    }

    /// Accept a report, stamping it with the current time
    pub fn ingest(&self, report: &PositionReport) -> Result<Ack, ValidationError> {
        self.ingest_at(report, Utc::now())
    }

    /// Accept a report received at `received_at`.
    ///
    /// The roster supplies capacity and identity (bus number, driver) for
    /// known buses; unknown buses get the configured default capacity.
    pub fn ingest_at(
        &self,
        report: &PositionReport,
        received_at: DateTime<Utc>,
    ) -> Result<Ack, ValidationError> {
        let roster_entry = self
            .roster
            .find_by_bus_id(report.bus_id.trim())
            .ok()
            .flatten();
        let capacity = roster_entry
            .as_ref()
            .map(|e| e.capacity)
            .unwrap_or(self.default_capacity);

        let validated = validate_report(report, capacity).map_err(|e| {
            warn!(bus_id = %report.bus_id, code = e.code(), "Rejected position report: {e}");
            e
        })?;

        let state = BusState {
            bus_id: validated.bus_id,
            bus_number: roster_entry.as_ref().map(|e| e.bus_number.clone()),
            route: validated.route,
            driver_name: roster_entry.map(|e| e.driver_name),
            position: validated.position,
            occupancy: validated.occupancy,
            capacity,
            status: validated.status,
            last_updated: received_at,
        };

        let receipt_id = Uuid::new_v4();
        debug!(
            %receipt_id,
            bus_id = %state.bus_id,
            route = %state.route,
            position = %state.position,
            occupancy = state.occupancy,
            status = %state.status,
            "Accepted position report"
        );

        let bus_id = state.bus_id.clone();
        self.store.upsert(state);

        Ok(Ack {
            status: "success".to_string(),
            bus_id,
            received_at,
            receipt_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::default_seed;
    use campus_bus_types::BusStatus;

    fn service() -> (IngestService, Arc<FleetStore>) {
        let store = Arc::new(FleetStore::new());
        let roster = Arc::new(SeedRepository::new(default_seed()));
        (IngestService::new(Arc::clone(&store), roster, 40), store)
    }

    #[test]
    fn test_accepts_and_stamps_receipt_time() {
        let (service, store) = service();
        let before = Utc::now();
        let report = PositionReport::new("b1", "Uttara - DSC", 23.88, 90.40, 40, BusStatus::OnTime);
        let ack = service.ingest(&report).unwrap();

        assert_eq!(ack.status, "success");
        assert_eq!(ack.bus_id, "b1");
        assert!(ack.received_at >= before);

        let stored = store.get("b1").unwrap();
        assert_eq!(stored.last_updated, ack.received_at);
        assert_eq!(stored.bus_number.as_deref(), Some("DIU-102"));
        assert_eq!(stored.driver_name.as_deref(), Some("Mr. Rahim"));
        assert_eq!(stored.capacity, 50);
    }

    #[test]
    fn test_unknown_bus_uses_default_capacity() {
        let (service, store) = service();
        let report = PositionReport::new("x1", "Savar - DSC", 23.85, 90.26, 41, BusStatus::Late);
        assert_eq!(
            service.ingest(&report),
            Err(ValidationError::OccupancyExceedsCapacity {
                occupancy: 41,
                capacity: 40
            })
        );
        assert!(store.is_empty());

        let report = PositionReport::new("x1", "Savar - DSC", 23.85, 90.26, 40, BusStatus::Late);
        service.ingest(&report).unwrap();
        let stored = store.get("x1").unwrap();
        assert_eq!(stored.capacity, 40);
        assert!(stored.bus_number.is_none());
    }

    #[test]
    fn test_last_accepted_write_wins() {
        let (service, store) = service();
        let now = Utc::now();
        let first = PositionReport::new("b2", "Mirpur - DSC", 23.82, 90.36, 10, BusStatus::OnTime);
        let second = PositionReport::new("b2", "Mirpur - DSC", 23.83, 90.37, 12, BusStatus::Late);

        service.ingest_at(&first, now).unwrap();
        // receipt order, not timestamps, decides: an older stamp received later still wins
        service
            .ingest_at(&second, now - chrono::Duration::seconds(30))
            .unwrap();

        let stored = store.get("b2").unwrap();
        assert_eq!(stored.occupancy, 12);
        assert_eq!(stored.status, BusStatus::Late);
    }

    #[test]
    fn test_rejection_leaves_store_unchanged() {
        let (service, store) = service();
        service
            .ingest(&PositionReport::new("b1", "Uttara - DSC", 23.88, 90.40, 20, BusStatus::OnTime))
            .unwrap();
        let before = store.snapshot();

        let bad = PositionReport::new("b1", "Uttara - DSC", 123.0, 90.40, 25, BusStatus::OnTime);
        assert!(service.ingest(&bad).is_err());
        assert_eq!(store.snapshot(), before);
    }
}
