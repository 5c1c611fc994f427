//! Fleet service facade.
//!
//! Ties the lifecycle controller, the batch loader and the registry
//! together into the operations the outside world consumes: registration,
//! the end-to-end medication loading pipeline, and the fleet queries.

use crate::lifecycle::LifecycleController;
use crate::loader::MedicationLoader;
use dronefleet_domain::{
    validation, Drone, DroneId, FleetError, FleetLimits, Medication, MedicationDescriptor,
    RegisterDrone, Result,
};
use dronefleet_registry::DroneStore;
use std::sync::Arc;
use tracing::{info, warn};

pub struct FleetService {
    store: Arc<dyn DroneStore>,
    limits: FleetLimits,
    lifecycle: LifecycleController,
    loader: MedicationLoader,
}

impl FleetService {
    pub fn new(store: Arc<dyn DroneStore>, limits: FleetLimits) -> Self {
        Self {
            lifecycle: LifecycleController::new(store.clone(), limits.clone()),
            loader: MedicationLoader::new(store.clone()),
            store,
            limits,
        }
    }

    /// Register a new drone. The record starts in IDLE at version 0.
    pub async fn register(&self, request: RegisterDrone) -> Result<Drone> {
        info!(serial = %request.serial_number, "Start creating new drone");
        validation::check_registration(&request, &self.limits)?;
        let drone = self.store.insert(request).await?;
        info!(drone = %drone.id, "Added drone");
        Ok(drone)
    }

    /// Load a medication batch onto the drone targeted by the first
    /// descriptor.
    ///
    /// Pipeline: batch shape check, IDLE -> LOADING acquisition (with
    /// bounded conflict retry), field and weight validation, atomic
    /// persist with the LOADED transition. Any failure past the
    /// acquisition reverts the drone to IDLE through the store before the
    /// original error is re-raised.
    pub async fn load_medications(
        &self,
        descriptors: Vec<MedicationDescriptor>,
        payloads: Vec<Vec<u8>>,
    ) -> Result<Vec<Medication>> {
        info!(batch = descriptors.len(), "Start creating new medications");
        validation::check_batch_shape(&descriptors, &payloads)?;

        let target = descriptors[0].drone_id;
        let loading = self.lifecycle.begin_loading(target).await?;

        match self.loader.load(loading, &descriptors, payloads).await {
            Ok(batch) => Ok(batch),
            Err(err) => {
                warn!(drone = %target, error = %err, "Load failed, reverting drone to IDLE");
                self.lifecycle.revert_to_idle(target).await?;
                Err(err)
            }
        }
    }

    /// All medications currently loaded on a drone.
    pub async fn medications(&self, id: DroneId) -> Result<Vec<Medication>> {
        info!(drone = %id, "Start getting all medications for drone");
        Ok(self.get_drone(id).await?.medications)
    }

    /// Drones available for loading: IDLE with battery at or above the
    /// loading threshold, in registration order.
    pub async fn available_drones(&self) -> Result<Vec<Drone>> {
        self.store
            .list_available(self.limits.min_battery_for_loading)
            .await
    }

    /// Current battery level of a drone. Read-only.
    pub async fn battery_level(&self, id: DroneId) -> Result<u8> {
        info!(drone = %id, "Check battery level for drone");
        Ok(self.get_drone(id).await?.battery_level)
    }

    async fn get_drone(&self, id: DroneId) -> Result<Drone> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| FleetError::NotFound(format!("No drone found with id: {id}")))
    }
}
