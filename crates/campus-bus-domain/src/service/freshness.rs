//! Staleness classification for last-known bus positions

use chrono::{DateTime, Duration, Utc};

use crate::model::FleetEntry;

/// How recent a bus's last report is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh { age: Duration },
    Stale { age: Duration },
    NeverReported,
}

impl Freshness {
    /// A report exactly `threshold` old is still fresh.
    pub fn classify(
        last_updated: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        threshold: Duration,
    ) -> Self {
        match last_updated {
            None => Freshness::NeverReported,
            Some(at) => {
                // clock skew between report receipt and query must not yield negative ages
                let age = (now - at).max(Duration::zero());
                if age > threshold {
                    Freshness::Stale { age }
                } else {
                    Freshness::Fresh { age }
                }
            }
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Freshness::Stale { .. })
    }

    pub fn age(&self) -> Option<Duration> {
        match self {
            Freshness::Fresh { age } | Freshness::Stale { age } => Some(*age),
            Freshness::NeverReported => None,
        }
    }
}

/// Fill in `stale` and `age_secs` on each entry relative to `now`
pub fn annotate_freshness(entries: &mut [FleetEntry], now: DateTime<Utc>, threshold: Duration) {
    for entry in entries.iter_mut() {
        let freshness = Freshness::classify(entry.last_updated, now, threshold);
        entry.stale = freshness.is_stale();
        entry.age_secs = freshness.age().map(|age| age.num_seconds());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let now = Utc::now();
        let threshold = Duration::seconds(120);

        assert_eq!(
            Freshness::classify(None, now, threshold),
            Freshness::NeverReported
        );

        let fresh = Freshness::classify(Some(now - Duration::seconds(30)), now, threshold);
        assert!(!fresh.is_stale());
        assert_eq!(fresh.age(), Some(Duration::seconds(30)));

        let edge = Freshness::classify(Some(now - threshold), now, threshold);
        assert!(!edge.is_stale());

        let stale = Freshness::classify(Some(now - Duration::seconds(121)), now, threshold);
        assert!(stale.is_stale());
    }

    #[test]
    fn test_future_timestamp_clamped() {
        let now = Utc::now();
        let f = Freshness::classify(Some(now + Duration::seconds(5)), now, Duration::seconds(120));
        assert_eq!(f, Freshness::Fresh { age: Duration::zero() });
    }
}
