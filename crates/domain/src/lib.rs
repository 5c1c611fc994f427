//! Domain module for the dronefleet dispatch system
//!
//! This crate contains pure domain logic with no I/O dependencies:
//! - Drone and medication entity definitions
//! - The drone lifecycle state enumeration
//! - Fleet policy limits (battery and weight ceilings, loading threshold)
//! - Validation rules for registration and medication batches
//! - The fleet error taxonomy

pub mod error;
pub mod limits;
pub mod model;
pub mod validation;

pub use error::{FleetError, Result};
pub use limits::FleetLimits;
pub use model::{
    Drone, DroneId, DroneModel, DroneState, Medication, MedicationDescriptor, MedicationId,
    RegisterDrone,
};
