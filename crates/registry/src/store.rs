//! Drone store trait.
//!
//! The lifecycle controller and the batch loader treat storage as a
//! versioned key-value store of drone records; schema layout is an
//! implementation concern.

use async_trait::async_trait;
use dronefleet_domain::{Drone, DroneId, MedicationId, RegisterDrone, Result};

/// Versioned store of drone records.
#[async_trait]
pub trait DroneStore: Send + Sync {
    /// Create a drone record from a validated registration request.
    ///
    /// Assigns the drone's identity, initializes its state to `Idle` at
    /// version 0 and enforces serial-number uniqueness (duplicate serials
    /// fail with `Validation`).
    async fn insert(&self, request: RegisterDrone) -> Result<Drone>;

    /// Fetch a drone by id.
    async fn get(&self, id: DroneId) -> Result<Option<Drone>>;

    /// Overwrite a drone record atomically, medications included.
    ///
    /// Fails with `Conflict` when the stored version differs from
    /// `expected_version`, and with `NotFound` for an unknown id. On
    /// success the stored version becomes `expected_version + 1` and the
    /// persisted record is returned.
    async fn save(&self, drone: Drone, expected_version: u64) -> Result<Drone>;

    /// Drones with `state == Idle` and battery at or above the threshold,
    /// in registration order.
    async fn list_available(&self, min_battery: u8) -> Result<Vec<Drone>>;

    /// All drones in registration order.
    async fn list_all(&self) -> Result<Vec<Drone>>;

    /// Reserve identities for a medication batch about to be persisted.
    async fn allocate_medication_ids(&self, count: usize) -> Result<Vec<MedicationId>>;
}
