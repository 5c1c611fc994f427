//! End-to-end loading flow over the in-memory store.

use crate::test_utils::{descriptor, memory_fleet, register_request};
use dronefleet_domain::{DroneState, FleetError};
use dronefleet_registry::DroneStore;

#[tokio::test]
async fn test_register_load_query_happy_path() {
    let _ = tracing_subscriber::fmt::try_init();
    let (store, fleet) = memory_fleet();

    let drone = fleet
        .register(register_request("DRN-001", 80, 500))
        .await
        .unwrap();
    assert_eq!(drone.state, DroneState::Idle);

    let batch = fleet
        .load_medications(
            vec![descriptor(drone.id, "ASP-1", "C1", 200)],
            vec![vec![0x89, 0x50, 0x4E, 0x47]],
        )
        .await
        .unwrap();

    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].drone_id, Some(drone.id));
    assert_eq!(batch[0].weight, 200);

    let stored = store.get(drone.id).await.unwrap().unwrap();
    assert_eq!(stored.state, DroneState::Loaded);
    assert_eq!(fleet.medications(drone.id).await.unwrap(), batch);
    assert_eq!(fleet.battery_level(drone.id).await.unwrap(), 80);
}

#[tokio::test]
async fn test_failed_load_is_observably_idle_again() {
    let (store, fleet) = memory_fleet();
    let drone = fleet
        .register(register_request("DRN-002", 80, 500))
        .await
        .unwrap();

    let err = fleet
        .load_medications(
            vec![
                descriptor(drone.id, "A", "C1", 300),
                descriptor(drone.id, "B", "C2", 300),
            ],
            vec![vec![1], vec![2]],
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        FleetError::Validation("Maximum weight capacity for drone has been reached".to_string())
    );

    // The compensating transition went through the store, not just the
    // in-memory copy held by the pipeline.
    let fresh = store.get(drone.id).await.unwrap().unwrap();
    assert_eq!(fresh.state, DroneState::Idle);
    assert!(fresh.medications.is_empty());
    // Two saves happened: IDLE -> LOADING and LOADING -> IDLE.
    assert_eq!(fresh.version, 2);

    // The drone is usable again after the revert.
    fleet
        .load_medications(
            vec![descriptor(drone.id, "A", "C1", 300)],
            vec![vec![1]],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_available_drones_reflect_lifecycle() {
    let (_, fleet) = memory_fleet();
    let a = fleet
        .register(register_request("DRN-A", 80, 500))
        .await
        .unwrap();
    let b = fleet
        .register(register_request("DRN-B", 30, 500))
        .await
        .unwrap();
    fleet
        .register(register_request("DRN-C", 15, 500))
        .await
        .unwrap();

    let before: Vec<_> = fleet
        .available_drones()
        .await
        .unwrap()
        .iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(before, vec![a.id, b.id]);

    fleet
        .load_medications(vec![descriptor(a.id, "ASP", "C1", 100)], vec![vec![1]])
        .await
        .unwrap();

    let after: Vec<_> = fleet
        .available_drones()
        .await
        .unwrap()
        .iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(after, vec![b.id]);
}

#[tokio::test]
async fn test_error_kinds_across_the_pipeline() {
    let (_, fleet) = memory_fleet();
    let drone = fleet
        .register(register_request("DRN-X", 80, 500))
        .await
        .unwrap();

    // Unknown target drone.
    let err = fleet
        .load_medications(
            vec![descriptor(dronefleet_domain::DroneId(404), "A", "C1", 1)],
            vec![vec![1]],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, FleetError::NotFound(_)));

    // Malformed code short-circuits before the weight rule.
    let err = fleet
        .load_medications(
            vec![descriptor(drone.id, "A", "bad code", 9999)],
            vec![vec![1]],
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        FleetError::Validation(
            "Only upper case letters, underscore, numbers available for code".to_string()
        )
    );

    // Duplicate serial number.
    let err = fleet
        .register(register_request("DRN-X", 70, 500))
        .await
        .unwrap_err();
    assert!(matches!(err, FleetError::Validation(_)));
}
