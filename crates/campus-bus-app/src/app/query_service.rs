//! Query Service - Read-Only Fleet Views
//!
//! Every call takes a fresh snapshot of the store, reconciles it with the
//! roster, and annotates staleness. Nothing here mutates the store.

use std::sync::Arc;

use campus_bus_domain::model::{FleetEntry, RosterEntry, Route};
use campus_bus_domain::repository::{RosterRepository, RouteRepository};
use campus_bus_domain::service::{annotate_freshness, reconcile, summarize, FleetSummary};
use campus_bus_infra::persistence::SeedRepository;
use campus_bus_store::FleetStore;
use chrono::{DateTime, Duration, Utc};

#[derive(Clone)]
pub struct QueryService {
    store: Arc<FleetStore>,
    seed: Arc<SeedRepository>,
    stale_after: Duration,
}

impl QueryService {
    pub fn new(store: Arc<FleetStore>, seed: Arc<SeedRepository>, stale_after: Duration) -> Self {
        Self {
            store,
            seed,
            stale_after,
        }
    }

    fn roster(&self) -> Vec<RosterEntry> {
        RosterRepository::find_all(self.seed.as_ref()).unwrap_or_default()
    }

    /// Current fleet, optionally restricted to one route by exact name
    pub fn query(&self, route_filter: Option<&str>) -> Vec<FleetEntry> {
        self.query_at(route_filter, Utc::now())
    }

    pub fn query_at(&self, route_filter: Option<&str>, now: DateTime<Utc>) -> Vec<FleetEntry> {
        let live = self.store.snapshot();
        let mut fleet = reconcile(&live, &self.roster());
        if let Some(route) = route_filter {
            fleet.retain(|entry| entry.route == route);
        }
        annotate_freshness(&mut fleet, now, self.stale_after);
        fleet
    }

    /// A single bus, live or roster-only
    pub fn bus(&self, bus_id: &str) -> Option<FleetEntry> {
        let mut entry = match self.store.get(bus_id) {
            Some(state) => FleetEntry::from(state),
            None => {
                let roster_entry = self.seed.find_by_bus_id(bus_id).ok().flatten()?;
                FleetEntry::from(&roster_entry)
            }
        };
        annotate_freshness(std::slice::from_mut(&mut entry), Utc::now(), self.stale_after);
        Some(entry)
    }

    /// The route table in display order
    pub fn routes(&self) -> Vec<Route> {
        RouteRepository::find_all(self.seed.as_ref()).unwrap_or_default()
    }

    /// Dashboard summary of the whole fleet
    pub fn summary(&self) -> FleetSummary {
        summarize(&self.query(None), &self.routes())
    }

    /// Number of buses that have reported at least once
    pub fn live_count(&self) -> usize {
        self.store.len()
    }
}
