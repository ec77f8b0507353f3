//! Infrastructure layer - seed data loading and repository implementations

pub mod persistence;
pub mod seed_loader;

pub use seed_loader::FleetSeed;
