//! Drone registry - versioned persistence for the dronefleet core
//!
//! This crate owns the storage boundary of the fleet. It exposes the
//! `DroneStore` capability trait consumed by the lifecycle controller and
//! the batch loader, plus two implementations:
//! - `MemoryStore`: DashMap-backed, for tests and development
//! - `SqliteStore`: rusqlite-backed, single-transaction saves
//!
//! Every save is an atomic whole-record overwrite guarded by an optimistic
//! version counter; a reader never observes a half-updated drone.

pub mod memory;
pub mod sqlite;
pub mod store;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::DroneStore;
