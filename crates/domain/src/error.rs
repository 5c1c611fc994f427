//! Fleet errors
//!
//! Pure domain errors with no infrastructure dependencies. The taxonomy
//! distinguishes recoverable input problems (`Validation`), state-machine
//! guard failures (`Precondition`), optimistic version races (`Conflict`)
//! and store failures (`Persistence`).

use crate::model::DroneId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FleetError {
    /// Malformed or out-of-range input; no state change occurred.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A lifecycle guard rejected the transition; no state change occurred.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Unknown drone or medication identity.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Optimistic version race; the caller should re-read and retry.
    #[error("Version conflict for drone {drone}: expected {expected}, found {actual}")]
    Conflict {
        drone: DroneId,
        expected: u64,
        actual: u64,
    },

    /// Payload read or transport failure; no state change occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// Underlying store failure during a committed step.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

pub type Result<T> = std::result::Result<T, FleetError>;
