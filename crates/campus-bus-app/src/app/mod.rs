//! Application Layer
//!
//! Orchestrates between the HTTP API / CLI and the domain and store layers:
//! - `ingest_service`: accept driver position reports
//! - `query_service`: read-only fleet views for polling clients

pub mod ingest_service;
pub mod query_service;

pub use ingest_service::{Ack, IngestService};
pub use query_service::QueryService;
