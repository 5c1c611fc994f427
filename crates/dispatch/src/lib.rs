//! Dispatch - the drone lifecycle state machine and loading pipeline
//!
//! This crate orchestrates the fleet's only stateful workflow:
//! - `lifecycle`: guarded IDLE -> LOADING -> LOADED transitions with a
//!   persisted compensating transition back to IDLE on loader failure
//! - `loader`: medication batch validation and atomic persistence
//! - `service`: the fleet facade (registration, loading, queries)
//! - `audit`: periodic battery level logging across the fleet

pub mod audit;
pub mod lifecycle;
pub mod loader;
pub mod service;

pub use audit::BatteryAudit;
pub use lifecycle::LifecycleController;
pub use loader::MedicationLoader;
pub use service::FleetService;
