//! The loading pipeline over the SQLite store, including reopen durability.

use crate::test_utils::{descriptor, register_request};
use dronefleet_dispatch::FleetService;
use dronefleet_domain::{DroneState, FleetError, FleetLimits};
use dronefleet_registry::{DroneStore, SqliteStore};
use std::sync::Arc;

#[tokio::test]
async fn test_pipeline_over_sqlite() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let fleet = FleetService::new(store.clone(), FleetLimits::default());

    let drone = fleet
        .register(register_request("SQL-1", 80, 500))
        .await
        .unwrap();
    let batch = fleet
        .load_medications(
            vec![
                descriptor(drone.id, "ASP-1", "C1", 200),
                descriptor(drone.id, "IBU-2", "C2", 100),
            ],
            vec![vec![1, 2, 3], vec![4, 5, 6]],
        )
        .await
        .unwrap();

    let stored = store.get(drone.id).await.unwrap().unwrap();
    assert_eq!(stored.state, DroneState::Loaded);
    assert_eq!(stored.medications, batch);
    assert_eq!(stored.medications[0].image, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_compensation_is_durable_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fleet.db");

    let drone_id = {
        let store = Arc::new(SqliteStore::open(&path).unwrap());
        let fleet = FleetService::new(store, FleetLimits::default());
        let drone = fleet
            .register(register_request("SQL-2", 80, 500))
            .await
            .unwrap();

        let err = fleet
            .load_medications(
                vec![descriptor(drone.id, "HEAVY", "C1", 600)],
                vec![vec![1]],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, FleetError::Validation(_)));
        drone.id
    };

    // A fresh connection sees the reverted state, not LOADING.
    let store = SqliteStore::open(&path).unwrap();
    let drone = store.get(drone_id).await.unwrap().unwrap();
    assert_eq!(drone.state, DroneState::Idle);
    assert!(drone.medications.is_empty());
}

#[tokio::test]
async fn test_loaded_batch_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fleet.db");

    let drone_id = {
        let store = Arc::new(SqliteStore::open(&path).unwrap());
        let fleet = FleetService::new(store, FleetLimits::default());
        let drone = fleet
            .register(register_request("SQL-3", 90, 400))
            .await
            .unwrap();
        fleet
            .load_medications(
                vec![descriptor(drone.id, "VIT_C", "VC_500", 150)],
                vec![vec![0xCA, 0xFE]],
            )
            .await
            .unwrap();
        drone.id
    };

    let store = SqliteStore::open(&path).unwrap();
    let drone = store.get(drone_id).await.unwrap().unwrap();
    assert_eq!(drone.state, DroneState::Loaded);
    assert_eq!(drone.medications.len(), 1);
    assert_eq!(drone.medications[0].name, "VIT_C");
    assert_eq!(drone.medications[0].image, vec![0xCA, 0xFE]);
}
