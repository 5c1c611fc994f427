//! Drone lifecycle state machine.
//!
//! All state transitions of a drone go through this controller; nothing
//! else mutates `Drone::state`. The loading pipeline drives
//! IDLE -> LOADING -> LOADED, with a compensating LOADING -> IDLE
//! transition when the batch loader fails. Both directions are persisted
//! through the store, so a fresh read after a failed load observes IDLE.

use dronefleet_domain::{Drone, DroneId, DroneState, FleetError, FleetLimits, Result};
use dronefleet_registry::DroneStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Orchestrates guarded drone state transitions over a versioned store.
pub struct LifecycleController {
    store: Arc<dyn DroneStore>,
    limits: FleetLimits,
}

impl LifecycleController {
    pub fn new(store: Arc<dyn DroneStore>, limits: FleetLimits) -> Self {
        Self { store, limits }
    }

    /// Transition IDLE -> LOADING for the given drone.
    ///
    /// The guard requires `state == Idle` and battery at or above the
    /// loading threshold; violations fail with `Precondition` and leave
    /// state untouched. A version conflict on the save means another
    /// loader won the race: the drone is re-read and the guard re-checked,
    /// up to `FleetLimits::conflict_retries` times, after which the final
    /// `Conflict` propagates.
    pub async fn begin_loading(&self, id: DroneId) -> Result<Drone> {
        let mut attempts = 0;
        loop {
            let drone = self.get(id).await?;
            self.check_loading_guard(&drone)?;

            let expected = drone.version;
            let mut loading = drone;
            loading.state = DroneState::Loading;
            match self.store.save(loading, expected).await {
                Ok(drone) => {
                    debug!(drone = %drone.id, "Drone transitioned to LOADING");
                    return Ok(drone);
                }
                Err(err @ FleetError::Conflict { .. }) => {
                    attempts += 1;
                    if attempts > self.limits.conflict_retries {
                        warn!(drone = %id, attempts, "Giving up loading acquisition after version conflicts");
                        return Err(err);
                    }
                    debug!(drone = %id, attempt = attempts, "Version conflict, re-reading drone");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Compensating transition LOADING -> IDLE after a loader failure.
    ///
    /// The revert must reach the store; any failure here is fatal and
    /// surfaces as `Persistence`, displacing the loader's original error.
    pub async fn revert_to_idle(&self, id: DroneId) -> Result<Drone> {
        let drone = match self.get(id).await {
            Ok(drone) => drone,
            Err(err) => {
                return Err(FleetError::Persistence(format!(
                    "compensating transition failed to read drone {id}: {err}"
                )))
            }
        };

        let expected = drone.version;
        let mut idle = drone;
        idle.state = DroneState::Idle;
        match self.store.save(idle, expected).await {
            Ok(drone) => {
                info!(drone = %drone.id, "Drone reverted to IDLE");
                Ok(drone)
            }
            Err(err) => Err(FleetError::Persistence(format!(
                "compensating transition failed for drone {id}: {err}"
            ))),
        }
    }

    async fn get(&self, id: DroneId) -> Result<Drone> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| FleetError::NotFound(format!("No drone found with id: {id}")))
    }

    fn check_loading_guard(&self, drone: &Drone) -> Result<()> {
        if drone.state != DroneState::Idle {
            return Err(FleetError::Precondition(format!(
                "Drone with id: {} isn't available for loading (state is {})",
                drone.id, drone.state
            )));
        }
        if drone.battery_level < self.limits.min_battery_for_loading {
            return Err(FleetError::Precondition(format!(
                "Drone can't be loaded with medications with less than {}% battery",
                self.limits.min_battery_for_loading
            )));
        }
        Ok(())
    }
}
