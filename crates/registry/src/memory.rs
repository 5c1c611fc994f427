//! In-memory drone store.
//!
//! Suitable for tests and development. Record-level atomicity comes from
//! DashMap's per-entry locking: saves replace the whole record under the
//! entry lock, so readers see either the old or the new drone, never a
//! mix.

use crate::store::DroneStore;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use dronefleet_domain::{
    Drone, DroneId, DroneState, FleetError, MedicationId, RegisterDrone, Result,
};
use std::sync::atomic::{AtomicU64, Ordering};

/// DashMap-backed drone store.
pub struct MemoryStore {
    drones: DashMap<DroneId, Drone>,
    serials: DashMap<String, DroneId>,
    next_drone_id: AtomicU64,
    next_medication_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            drones: DashMap::new(),
            serials: DashMap::new(),
            next_drone_id: AtomicU64::new(1),
            next_medication_id: AtomicU64::new(1),
        }
    }

    fn snapshot_ordered(&self) -> Vec<Drone> {
        let mut drones: Vec<Drone> = self.drones.iter().map(|d| d.value().clone()).collect();
        // Ids are assigned monotonically, so id order is registration order.
        drones.sort_by_key(|d| d.id);
        drones
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DroneStore for MemoryStore {
    async fn insert(&self, request: RegisterDrone) -> Result<Drone> {
        match self.serials.entry(request.serial_number.clone()) {
            Entry::Occupied(_) => Err(FleetError::Validation(
                "Serial number already registered".to_string(),
            )),
            Entry::Vacant(slot) => {
                let id = DroneId(self.next_drone_id.fetch_add(1, Ordering::SeqCst));
                let now = Utc::now();
                let drone = Drone {
                    id,
                    serial_number: request.serial_number,
                    model: request.model,
                    weight_limit: request.weight_limit,
                    battery_level: request.battery_capacity,
                    state: DroneState::Idle,
                    medications: Vec::new(),
                    version: 0,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(id);
                self.drones.insert(id, drone.clone());
                Ok(drone)
            }
        }
    }

    async fn get(&self, id: DroneId) -> Result<Option<Drone>> {
        Ok(self.drones.get(&id).map(|d| d.value().clone()))
    }

    async fn save(&self, mut drone: Drone, expected_version: u64) -> Result<Drone> {
        match self.drones.get_mut(&drone.id) {
            None => Err(FleetError::NotFound(format!(
                "No drone found with id: {}",
                drone.id
            ))),
            Some(mut stored) => {
                if stored.version != expected_version {
                    return Err(FleetError::Conflict {
                        drone: drone.id,
                        expected: expected_version,
                        actual: stored.version,
                    });
                }
                drone.version = expected_version + 1;
                drone.updated_at = Utc::now();
                *stored = drone.clone();
                Ok(drone)
            }
        }
    }

    async fn list_available(&self, min_battery: u8) -> Result<Vec<Drone>> {
        Ok(self
            .snapshot_ordered()
            .into_iter()
            .filter(|d| d.is_available(min_battery))
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Drone>> {
        Ok(self.snapshot_ordered())
    }

    async fn allocate_medication_ids(&self, count: usize) -> Result<Vec<MedicationId>> {
        let start = self
            .next_medication_id
            .fetch_add(count as u64, Ordering::SeqCst);
        Ok((start..start + count as u64).map(MedicationId).collect())
    }
}
