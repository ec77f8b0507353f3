//! Driver-side position broadcaster
//!
//! Each tick publishes the most recent geolocation sample together with the
//! session's route, occupancy, and status. Ticks are independent: a failed
//! publish is logged and the next tick carries on. Retrying is left to the
//! next tick; the service never waits on the driver.

use std::fs;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

use campus_bus_domain::model::{GeoSample, PositionReport};
use campus_bus_types::{BusStatus, Error, Result, TransportError};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::FleetClient;

/// Destination for published reports
pub trait ReportSink: Send + Sync {
    fn publish(
        &self,
        report: &PositionReport,
    ) -> impl Future<Output = std::result::Result<(), TransportError>> + Send;
}

impl ReportSink for FleetClient {
    async fn publish(&self, report: &PositionReport) -> std::result::Result<(), TransportError> {
        let ack = self.report(report).await?;
        debug!(bus_id = %ack.bus_id, receipt_id = %ack.receipt_id, "Report acknowledged");
        Ok(())
    }
}

/// Sink for log-only mode: reports are written to the log and never sent
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOnlySink;

impl ReportSink for LogOnlySink {
    async fn publish(&self, report: &PositionReport) -> std::result::Result<(), TransportError> {
        info!(
            bus_id = %report.bus_id,
            route = %report.route,
            lat = report.lat,
            lng = report.lng,
            occupancy = report.occupancy,
            status = %report.status,
            "Position (log only)"
        );
        Ok(())
    }
}

/// What the driver is broadcasting as
#[derive(Debug, Clone)]
pub struct BroadcastSession {
    pub bus_id: String,
    pub route: String,
    pub occupancy: i64,
    pub status: BusStatus,
}

/// Geolocation samples replayed in order; the last one repeats once exhausted,
/// the way a stationary device keeps reporting its last fix.
#[derive(Debug, Clone)]
pub struct SampleFeed {
    samples: Vec<GeoSample>,
    next: usize,
}

impl SampleFeed {
    pub fn fixed(sample: GeoSample) -> Self {
        Self {
            samples: vec![sample],
            next: 0,
        }
    }

    pub fn from_samples(samples: Vec<GeoSample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::Samples("no samples".to_string()));
        }
        Ok(Self { samples, next: 0 })
    }

    /// Load samples from a JSON-lines file, one `GeoSample` per line
    pub fn load_jsonl(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        let samples = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str::<GeoSample>(line)
                    .map_err(|e| Error::Samples(format!("line {}: {}", index + 1, e)))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_samples(samples)
    }

    pub fn next_sample(&mut self) -> &GeoSample {
        let index = self.next.min(self.samples.len() - 1);
        if self.next < self.samples.len() {
            self.next += 1;
        }
        &self.samples[index]
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Counters for one broadcast run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastStats {
    pub ticks: u64,
    pub published: u64,
    pub failed: u64,
}

/// Publishes positions for one driver session on a fixed interval
pub struct Broadcaster<S> {
    sink: S,
    session: BroadcastSession,
    feed: SampleFeed,
    interval: Duration,
}

impl<S: ReportSink> Broadcaster<S> {
    pub fn new(sink: S, session: BroadcastSession, feed: SampleFeed, interval: Duration) -> Self {
        Self {
            sink,
            session,
            feed,
            interval,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Update occupancy mid-session, as the driver's counter changes
    pub fn set_occupancy(&mut self, occupancy: i64) {
        self.session.occupancy = occupancy;
    }

    pub fn set_status(&mut self, status: BusStatus) {
        self.session.status = status;
    }

    fn next_report(&mut self) -> PositionReport {
        let sample = self.feed.next_sample().clone();
        PositionReport::new(
            self.session.bus_id.clone(),
            self.session.route.clone(),
            sample.lat,
            sample.lng,
            self.session.occupancy,
            self.session.status,
        )
    }

    /// Publish the next sample once
    pub async fn tick(&mut self) -> std::result::Result<(), TransportError> {
        let report = self.next_report();
        self.sink.publish(&report).await
    }

    /// Publish on every interval until `max_ticks` is reached or `shutdown`
    /// resolves. Stopping does not retract the last published position.
    pub async fn run<F>(&mut self, max_ticks: Option<u64>, shutdown: F) -> BroadcastStats
    where
        F: Future<Output = ()>,
    {
        let mut stats = BroadcastStats::default();
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(
            bus_id = %self.session.bus_id,
            route = %self.session.route,
            interval_ms = self.interval.as_millis() as u64,
            "Broadcast started"
        );

        loop {
            if max_ticks.is_some_and(|max| stats.ticks >= max) {
                break;
            }
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
            }

            stats.ticks += 1;
            match self.tick().await {
                Ok(()) => stats.published += 1,
                Err(e) => {
                    stats.failed += 1;
                    warn!(bus_id = %self.session.bus_id, error = %e, "Failed to publish position");
                }
            }
        }

        info!(
            bus_id = %self.session.bus_id,
            published = stats.published,
            failed = stats.failed,
            "Broadcast stopped"
        );
        stats
    }
}
