//! Drone and medication entity types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique drone identifier, assigned by the store at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DroneId(pub u64);

impl fmt::Display for DroneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique medication identifier, assigned by the store at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MedicationId(pub u64);

impl fmt::Display for MedicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Drone airframe category. Affects no business logic; stored as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DroneModel {
    Lightweight,
    Middleweight,
    Cruiserweight,
    Heavyweight,
}

impl fmt::Display for DroneModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DroneModel::Lightweight => "Lightweight",
            DroneModel::Middleweight => "Middleweight",
            DroneModel::Cruiserweight => "Cruiserweight",
            DroneModel::Heavyweight => "Heavyweight",
        };
        f.write_str(s)
    }
}

impl DroneModel {
    /// Parse the canonical form used by the SQLite store.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Lightweight" => Some(DroneModel::Lightweight),
            "Middleweight" => Some(DroneModel::Middleweight),
            "Cruiserweight" => Some(DroneModel::Cruiserweight),
            "Heavyweight" => Some(DroneModel::Heavyweight),
            _ => None,
        }
    }
}

/// Lifecycle state of a drone.
///
/// Only `Idle`, `Loading` and `Loaded` are driven by the loading pipeline.
/// `Delivering`, `Delivered` and `Returning` are declared for the delivery
/// tracking surface but no transition in this system produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DroneState {
    Idle,
    Loading,
    Loaded,
    Delivering,
    Delivered,
    Returning,
}

impl fmt::Display for DroneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DroneState::Idle => "IDLE",
            DroneState::Loading => "LOADING",
            DroneState::Loaded => "LOADED",
            DroneState::Delivering => "DELIVERING",
            DroneState::Delivered => "DELIVERED",
            DroneState::Returning => "RETURNING",
        };
        f.write_str(s)
    }
}

impl DroneState {
    /// Parse the canonical upper-case form used by the SQLite store.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "IDLE" => Some(DroneState::Idle),
            "LOADING" => Some(DroneState::Loading),
            "LOADED" => Some(DroneState::Loaded),
            "DELIVERING" => Some(DroneState::Delivering),
            "DELIVERED" => Some(DroneState::Delivered),
            "RETURNING" => Some(DroneState::Returning),
            _ => None,
        }
    }
}

/// A registered drone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drone {
    /// Store-assigned identity.
    pub id: DroneId,
    /// Unique serial number.
    pub serial_number: String,
    /// Airframe category.
    pub model: DroneModel,
    /// Maximum payload weight in grams.
    pub weight_limit: u32,
    /// Battery level in percent (0-100).
    pub battery_level: u8,
    /// Current lifecycle state.
    pub state: DroneState,
    /// Medications currently loaded, in load order.
    pub medications: Vec<Medication>,
    /// Optimistic concurrency version; bumped on every save.
    pub version: u64,
    /// When the drone was registered.
    pub created_at: DateTime<Utc>,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl Drone {
    /// Total weight of the currently loaded medications, in grams.
    ///
    /// Widened to u64 so the sum cannot wrap for any batch of u32
    /// weights.
    pub fn loaded_weight(&self) -> u64 {
        self.medications.iter().map(|m| u64::from(m.weight)).sum()
    }

    /// Payload weight the drone can still accept, in grams.
    pub fn remaining_capacity(&self) -> u64 {
        u64::from(self.weight_limit).saturating_sub(self.loaded_weight())
    }

    /// Whether the drone counts as available for loading at the given
    /// battery threshold.
    pub fn is_available(&self, min_battery: u8) -> bool {
        self.state == DroneState::Idle && self.battery_level >= min_battery
    }
}

/// A medication persisted as part of a drone's payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    /// Store-assigned identity.
    pub id: MedicationId,
    /// Medication name, `[A-Za-z0-9_-]*`.
    pub name: String,
    /// Weight in grams.
    pub weight: u32,
    /// Medication code, `[A-Z0-9_]*`.
    pub code: String,
    /// Attached image payload.
    pub image: Vec<u8>,
    /// Owning drone; set when the batch is persisted.
    pub drone_id: Option<DroneId>,
    /// When the medication was persisted.
    pub created_at: DateTime<Utc>,
}

/// Registration request for a new drone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterDrone {
    pub serial_number: String,
    pub model: DroneModel,
    pub battery_capacity: u8,
    pub weight_limit: u32,
}

/// One medication entry of a load request, before payload attachment.
///
/// Every descriptor in a batch targets the same drone; the pipeline
/// resolves the target from the first descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationDescriptor {
    pub drone_id: DroneId,
    pub name: String,
    pub weight: u32,
    pub code: String,
}
