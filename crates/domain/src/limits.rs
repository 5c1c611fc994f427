//! Fleet policy limits.
//!
//! All thresholds the validation rules and the lifecycle controller apply
//! are carried here so tests can exercise boundary values without touching
//! policy code.

use serde::{Deserialize, Serialize};

/// Named policy constants for the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetLimits {
    /// Lowest battery level a drone may register with (percent).
    pub min_battery_capacity: u8,
    /// Highest battery level a drone may register with (percent).
    pub max_battery_capacity: u8,
    /// Global ceiling on a drone's weight limit (grams).
    pub max_weight_limit: u32,
    /// Battery level below which loading is refused (percent).
    pub min_battery_for_loading: u8,
    /// How many times the loader re-reads and retries after a version
    /// conflict before giving up.
    pub conflict_retries: u32,
}

impl Default for FleetLimits {
    fn default() -> Self {
        Self {
            min_battery_capacity: 1,
            max_battery_capacity: 100,
            max_weight_limit: 500,
            min_battery_for_loading: 25,
            conflict_retries: 3,
        }
    }
}
