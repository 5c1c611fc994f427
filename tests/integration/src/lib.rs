//! Integration tests for the dronefleet workspace
//!
//! This test suite validates:
//! - The full register -> load -> query flow over the in-memory store
//! - Concurrent loading of one drone (optimistic versioning, one winner)
//! - Durable compensation: a failed load leaves IDLE observable on re-read
//! - SQLite store round-trips of loaded drones

pub mod test_utils;

#[cfg(test)]
mod concurrency_tests;

#[cfg(test)]
mod loading_flow_tests;

#[cfg(test)]
mod sqlite_store_tests;
