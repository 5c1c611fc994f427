//! Pure validation rules for registration and medication batches.
//!
//! The loading pipeline applies these in a fixed order and short-circuits
//! on the first violation: batch shape, field formats, aggregate weight.

use crate::error::{FleetError, Result};
use crate::limits::FleetLimits;
use crate::model::{Drone, MedicationDescriptor, RegisterDrone};

/// Check a registration request against the fleet limits.
pub fn check_registration(request: &RegisterDrone, limits: &FleetLimits) -> Result<()> {
    if request.battery_capacity > limits.max_battery_capacity
        || request.battery_capacity < limits.min_battery_capacity
    {
        return Err(FleetError::Validation(format!(
            "Battery capacity can't be more than {} or less than {}",
            limits.max_battery_capacity, limits.min_battery_capacity
        )));
    }
    if request.weight_limit > limits.max_weight_limit {
        return Err(FleetError::Validation(format!(
            "Weight limit can't be more than {}",
            limits.max_weight_limit
        )));
    }
    Ok(())
}

/// Check that descriptors and payloads are non-empty and positionally paired.
pub fn check_batch_shape(descriptors: &[MedicationDescriptor], payloads: &[Vec<u8>]) -> Result<()> {
    if descriptors.is_empty() || payloads.is_empty() {
        return Err(FleetError::Validation(
            "Medications haven't been provided".to_string(),
        ));
    }
    if descriptors.len() != payloads.len() {
        return Err(FleetError::Validation(
            "Medication files count isn't equal to medication descriptors count".to_string(),
        ));
    }
    Ok(())
}

/// Check name charset, code charset and weight of a single descriptor.
pub fn check_descriptor_fields(descriptor: &MedicationDescriptor) -> Result<()> {
    if !is_valid_name(&descriptor.name) {
        return Err(FleetError::Validation(
            "Only letters, numbers, underscore, dash available for name".to_string(),
        ));
    }
    if !is_valid_code(&descriptor.code) {
        return Err(FleetError::Validation(
            "Only upper case letters, underscore, numbers available for code".to_string(),
        ));
    }
    if descriptor.weight == 0 {
        return Err(FleetError::Validation(
            "Medication weight must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Check the aggregate batch weight against the drone's remaining capacity.
///
/// The sum is taken in u64: each weight is a valid u32 on its own, so a
/// u32 accumulator could wrap on a large batch and admit it.
pub fn check_batch_weight(descriptors: &[MedicationDescriptor], drone: &Drone) -> Result<()> {
    let total: u64 = descriptors.iter().map(|d| u64::from(d.weight)).sum();
    if total > drone.remaining_capacity() {
        return Err(FleetError::Validation(
            "Maximum weight capacity for drone has been reached".to_string(),
        ));
    }
    Ok(())
}

fn is_valid_name(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn is_valid_code(code: &str) -> bool {
    code.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
