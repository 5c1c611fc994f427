//! Shared infrastructure for the dronefleet workspace
//!
//! This crate carries the concerns every binary needs but no domain crate
//! should own:
//! - `logging`: tracing-subscriber initialization (format chosen by config)
//! - `config`: TOML/env configuration for services, including the fleet
//!   policy limits

pub mod config;
pub mod logging;

pub use config::Config;
