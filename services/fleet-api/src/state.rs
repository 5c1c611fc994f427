use std::sync::Arc;

use dronefleet_core::Config;
use dronefleet_dispatch::FleetService;
use dronefleet_domain::FleetError;
use dronefleet_registry::{DroneStore, MemoryStore, SqliteStore};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DroneStore>,
    pub fleet: FleetService,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, FleetError> {
        let store: Arc<dyn DroneStore> = match &config.storage.db_path {
            Some(path) => Arc::new(SqliteStore::open(path)?),
            None => Arc::new(MemoryStore::new()),
        };
        let fleet = FleetService::new(store.clone(), config.limits.clone());

        Ok(AppState {
            config,
            store,
            fleet,
        })
    }
}
