//! Rider/admin-side fleet poller
//!
//! The service has no push channel; watchers poll on a fixed interval and
//! diff each snapshot against the previous one themselves.

use std::future::Future;
use std::time::Duration;

use campus_bus_domain::model::FleetEntry;
use campus_bus_domain::service::{diff_snapshots, FleetDiff};
use campus_bus_types::TransportError;
use tokio::time::MissedTickBehavior;
use tracing::warn;

use super::FleetClient;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub polls: u64,
    pub changes: u64,
    pub failed: u64,
}

pub struct Poller {
    client: FleetClient,
    route: Option<String>,
    interval: Duration,
    previous: Vec<FleetEntry>,
}

impl Poller {
    pub fn new(client: FleetClient, route: Option<String>, interval: Duration) -> Self {
        Self {
            client,
            route,
            interval,
            previous: Vec::new(),
        }
    }

    /// Last snapshot seen
    pub fn current(&self) -> &[FleetEntry] {
        &self.previous
    }

    /// Record a new snapshot and return what changed since the last one.
    /// The first snapshot reports every bus as added.
    pub fn observe(&mut self, snapshot: Vec<FleetEntry>) -> FleetDiff {
        let diff = diff_snapshots(&self.previous, &snapshot);
        self.previous = snapshot;
        diff
    }

    /// Fetch the fleet once and diff it against the previous snapshot
    pub async fn poll_once(&mut self) -> Result<FleetDiff, TransportError> {
        let snapshot = self.client.locations(self.route.as_deref()).await?;
        Ok(self.observe(snapshot))
    }

    /// Poll every interval until `max_polls` or `shutdown`, calling
    /// `on_change` whenever a poll finds differences. A failed poll keeps the
    /// previous snapshot so the next successful poll diffs against it.
    pub async fn run<F, C>(&mut self, max_polls: Option<u64>, shutdown: F, mut on_change: C) -> PollStats
    where
        F: Future<Output = ()>,
        C: FnMut(&FleetDiff, &[FleetEntry]),
    {
        let mut stats = PollStats::default();
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            if max_polls.is_some_and(|max| stats.polls >= max) {
                break;
            }
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
            }

            stats.polls += 1;
            match self.poll_once().await {
                Ok(diff) if diff.is_empty() => {}
                Ok(diff) => {
                    stats.changes += diff.change_count() as u64;
                    on_change(&diff, &self.previous);
                }
                Err(e) => {
                    stats.failed += 1;
                    warn!(error = %e, "Fleet poll failed");
                }
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_bus_domain::model::FleetSource;
    use campus_bus_types::{BusStatus, GeoPoint};

    fn entry(id: &str, occupancy: u32) -> FleetEntry {
        FleetEntry {
            bus_id: id.to_string(),
            bus_number: None,
            route: "ECB - DSC".to_string(),
            driver_name: None,
            position: GeoPoint::new(23.82, 90.39),
            occupancy,
            capacity: 50,
            status: BusStatus::OnTime,
            last_updated: None,
            source: FleetSource::Roster,
            stale: false,
            age_secs: None,
        }
    }

    fn poller() -> Poller {
        Poller::new(
            FleetClient::new("http://127.0.0.1:9").unwrap(),
            None,
            Duration::from_millis(5),
        )
    }

    #[test]
    fn test_observe_tracks_previous_snapshot() {
        let mut poller = poller();

        let first = poller.observe(vec![entry("b1", 1), entry("b2", 2)]);
        assert_eq!(first.added.len(), 2);

        let second = poller.observe(vec![entry("b1", 1), entry("b2", 3)]);
        assert!(second.added.is_empty());
        assert_eq!(second.updated.len(), 1);
        assert_eq!(poller.current().len(), 2);

        let third = poller.observe(vec![entry("b1", 1), entry("b2", 3)]);
        assert!(third.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_server_counts_failures() {
        let mut poller = Poller::new(
            FleetClient::with_timeout("http://127.0.0.1:9", Duration::from_secs(2)).unwrap(),
            None,
            Duration::from_millis(5),
        );
        poller.observe(vec![entry("b1", 1)]);

        let mut calls = 0;
        let stats = poller
            .run(Some(2), std::future::pending(), |_, _| calls += 1)
            .await;
        assert_eq!(stats.failed, 2);
        assert_eq!(calls, 0);
        // snapshot survives failed polls
        assert_eq!(poller.current().len(), 1);
    }
}
