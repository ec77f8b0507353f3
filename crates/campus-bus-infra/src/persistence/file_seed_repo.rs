//! File-based route and roster repository (TOML)

use std::path::{Path, PathBuf};

use campus_bus_types::Error;

use super::SeedRepository;
use crate::FleetSeed;

/// Seed data loaded from a TOML file, remembering where it came from
pub struct FileSeedRepository {
    toml_path: PathBuf,
    inner: SeedRepository,
}

impl FileSeedRepository {
    /// Load the repository from a TOML file path
    pub fn open(toml_path: PathBuf) -> Result<Self, Error> {
        let seed = FleetSeed::load_from_file(&toml_path)?;
        Ok(Self {
            toml_path,
            inner: SeedRepository::new(seed),
        })
    }

    /// Get the TOML path
    pub fn toml_path(&self) -> &Path {
        &self.toml_path
    }

    pub fn seed(&self) -> &FleetSeed {
        self.inner.seed()
    }

    pub fn into_seed(self) -> FleetSeed {
        self.inner.into_seed()
    }
}
