//! Repository implementations
//!
//! Reference data is read-only for the lifetime of the service, so the
//! repository traits are served from an in-memory [`FleetSeed`]; the file
//! repository only loads one and remembers its path.

mod file_seed_repo;
mod seed_repo;

pub use file_seed_repo::FileSeedRepository;
pub use seed_repo::SeedRepository;
