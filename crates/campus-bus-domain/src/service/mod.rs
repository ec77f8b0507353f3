//! Domain services

pub mod diff;
pub mod freshness;
pub mod reconcile;
pub mod summary;
pub mod validation;

pub use diff::{diff_snapshots, FleetDiff};
pub use freshness::{annotate_freshness, Freshness};
pub use reconcile::reconcile;
pub use summary::{summarize, FleetSummary, RouteOccupancy};
pub use validation::validate_report;
