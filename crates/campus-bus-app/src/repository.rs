//! Seed data adapters

use std::path::PathBuf;

use campus_bus_infra::persistence::FileSeedRepository;
use campus_bus_infra::FleetSeed;
use campus_bus_types::Result;
use tracing::info;

use crate::config::Config;
use crate::constants::default_seed;

/// Open the configured seed file, or fall back to the built-in seed
pub fn open_fleet_seed(config: &Config) -> Result<FleetSeed> {
    match config.seed_file {
        Some(ref path) => open_fleet_seed_at(path.clone()),
        None => {
            info!("No seed file configured, using built-in routes and roster");
            Ok(default_seed())
        }
    }
}

/// Open a seed file at a custom path
pub fn open_fleet_seed_at(path: PathBuf) -> Result<FleetSeed> {
    let repo = FileSeedRepository::open(path)?;
    info!(
        path = %repo.toml_path().display(),
        routes = repo.seed().routes.len(),
        roster = repo.seed().roster.len(),
        "Loaded seed file"
    );
    Ok(repo.into_seed())
}
