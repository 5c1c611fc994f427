//! Periodic battery audit.
//!
//! Logs every drone's battery level and state on a fixed interval so
//! operators can follow fleet health from the logs. Pure observation;
//! never mutates state.

use dronefleet_registry::DroneStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Battery level audit task over the whole fleet.
pub struct BatteryAudit {
    store: Arc<dyn DroneStore>,
    period: Duration,
}

impl BatteryAudit {
    pub fn new(store: Arc<dyn DroneStore>, period: Duration) -> Self {
        Self { store, period }
    }

    /// Spawn the audit loop onto the runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.period);
            loop {
                ticker.tick().await;
                self.log_once().await;
            }
        })
    }

    /// One audit pass; exposed separately for tests.
    pub async fn log_once(&self) {
        match self.store.list_all().await {
            Ok(drones) => {
                for drone in &drones {
                    info!(
                        drone = %drone.id,
                        battery = drone.battery_level,
                        state = %drone.state,
                        "Battery audit"
                    );
                }
            }
            Err(err) => warn!(error = %err, "Battery audit failed to list drones"),
        }
    }
}
