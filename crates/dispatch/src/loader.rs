//! Medication batch loader.
//!
//! Validates a batch against the target drone and persists it. The batch
//! and the LOADING -> LOADED transition land in a single store save, so
//! no reader ever sees the state set without the medications attached.

use chrono::Utc;
use dronefleet_domain::{validation, Drone, DroneState, Medication, MedicationDescriptor, Result};
use dronefleet_registry::DroneStore;
use std::sync::Arc;
use tracing::info;

/// Persists validated medication batches as owned by a drone.
pub struct MedicationLoader {
    store: Arc<dyn DroneStore>,
}

impl MedicationLoader {
    pub fn new(store: Arc<dyn DroneStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a batch onto a drone in LOADING state.
    ///
    /// Runs the field-format rules per descriptor and the aggregate weight
    /// rule against the drone's remaining capacity, then stamps store
    /// identities and the owning drone onto each medication and saves the
    /// whole record with state LOADED. Returns the persisted batch.
    pub async fn load(
        &self,
        mut drone: Drone,
        descriptors: &[MedicationDescriptor],
        payloads: Vec<Vec<u8>>,
    ) -> Result<Vec<Medication>> {
        for descriptor in descriptors {
            validation::check_descriptor_fields(descriptor)?;
        }
        validation::check_batch_weight(descriptors, &drone)?;

        let ids = self.store.allocate_medication_ids(descriptors.len()).await?;
        let now = Utc::now();
        let batch: Vec<Medication> = descriptors
            .iter()
            .zip(payloads)
            .zip(ids)
            .map(|((descriptor, image), id)| Medication {
                id,
                name: descriptor.name.clone(),
                weight: descriptor.weight,
                code: descriptor.code.clone(),
                image,
                drone_id: Some(drone.id),
                created_at: now,
            })
            .collect();

        let expected = drone.version;
        let first_new = drone.medications.len();
        drone.medications.extend(batch);
        drone.state = DroneState::Loaded;
        let saved = self.store.save(drone, expected).await?;

        info!(
            drone = %saved.id,
            count = saved.medications.len() - first_new,
            "Added medications to drone"
        );
        Ok(saved.medications[first_new..].to_vec())
    }
}
