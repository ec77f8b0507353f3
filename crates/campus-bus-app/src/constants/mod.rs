//! Built-in reference data

pub mod seed;

pub use seed::{default_roster, default_routes, default_seed};
