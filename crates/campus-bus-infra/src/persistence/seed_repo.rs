use campus_bus_domain::model::{RosterEntry, Route};
use campus_bus_domain::repository::{RosterRepository, RouteRepository};
use campus_bus_types::Error;

use crate::FleetSeed;

/// Route and roster repository backed by an in-memory seed
#[derive(Debug, Clone, Default)]
pub struct SeedRepository {
    seed: FleetSeed,
}

impl SeedRepository {
    pub fn new(seed: FleetSeed) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> &FleetSeed {
        &self.seed
    }

    pub fn into_seed(self) -> FleetSeed {
        self.seed
    }
}

impl RouteRepository for SeedRepository {
    fn find_all(&self) -> Result<Vec<Route>, Error> {
        Ok(self.seed.routes.clone())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Route>, Error> {
        Ok(self.seed.route(name).cloned())
    }
}

impl RosterRepository for SeedRepository {
    fn find_all(&self) -> Result<Vec<RosterEntry>, Error> {
        Ok(self.seed.roster.clone())
    }

    fn find_by_bus_id(&self, bus_id: &str) -> Result<Option<RosterEntry>, Error> {
        Ok(self.seed.roster_entry(bus_id).cloned())
    }
}
