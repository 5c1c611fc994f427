//! Shared helpers for the integration suite.

use dronefleet_domain::{DroneId, DroneModel, FleetLimits, MedicationDescriptor, RegisterDrone};
use dronefleet_registry::MemoryStore;
use dronefleet_dispatch::FleetService;
use std::sync::Arc;

/// Fleet service over a fresh in-memory store, default limits.
pub fn memory_fleet() -> (Arc<MemoryStore>, FleetService) {
    let store = Arc::new(MemoryStore::new());
    let service = FleetService::new(store.clone(), FleetLimits::default());
    (store, service)
}

pub fn register_request(serial: &str, battery: u8, weight_limit: u32) -> RegisterDrone {
    RegisterDrone {
        serial_number: serial.to_string(),
        model: DroneModel::Middleweight,
        battery_capacity: battery,
        weight_limit,
    }
}

pub fn descriptor(drone: DroneId, name: &str, code: &str, weight: u32) -> MedicationDescriptor {
    MedicationDescriptor {
        drone_id: drone,
        name: name.to_string(),
        weight,
        code: code.to_string(),
    }
}
