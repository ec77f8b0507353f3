use std::sync::Arc;

use campus_bus_assistant::{build_system_instruction, Assistant, AssistantConfig, GeminiBackend};
use campus_bus_domain::repository::RouteRepository;
use campus_bus_infra::persistence::SeedRepository;
use campus_bus_infra::FleetSeed;
use campus_bus_store::FleetStore;
use campus_bus_types::Result;

use crate::app::{IngestService, QueryService};
use crate::config::Config;

/// Shared service state. The fleet store inside is owned here for the
/// lifetime of the process and handed to both services by reference.
pub struct AppState {
    pub config: Config,
    pub ingest: IngestService,
    pub query: QueryService,
    pub assistant: Assistant<GeminiBackend>,
}

impl AppState {
    pub fn new(config: Config, seed: FleetSeed, api_key: Option<String>) -> Result<Arc<Self>> {
        let store = Arc::new(FleetStore::new());
        let seed = Arc::new(SeedRepository::new(seed));

        let ingest = IngestService::new(Arc::clone(&store), Arc::clone(&seed), config.default_capacity);
        let query = QueryService::new(store, Arc::clone(&seed), config.stale_after());

        let routes = RouteRepository::find_all(seed.as_ref())?;
        let backend = GeminiBackend::new(
            AssistantConfig::default()
                .with_model(config.assistant_model.clone())
                .with_api_key(api_key)
                .with_timeout(config.assistant_timeout()),
        )?;
        let assistant = Assistant::new(backend, build_system_instruction(&routes));

        Ok(Arc::new(Self {
            config,
            ingest,
            query,
            assistant,
        }))
    }
}
