use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use crate::state::AppState;
use dronefleet_domain::{Drone, DroneId, FleetError, Medication, MedicationDescriptor, RegisterDrone};

type ApiError = (StatusCode, Json<Value>);

pub async fn register_drone(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterDrone>,
) -> Result<Json<Drone>, ApiError> {
    let drone = state.fleet.register(request).await.map_err(error_response)?;
    Ok(Json(drone))
}

/// Multipart medication intake: one `medications` part holding the JSON
/// descriptor array plus one `files` part per descriptor, in order.
pub async fn load_medications(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Vec<Medication>>, ApiError> {
    let mut descriptors: Vec<MedicationDescriptor> = Vec::new();
    let mut payloads: Vec<Vec<u8>> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(read_failure)? {
        match field.name() {
            Some("medications") => {
                let text = field.text().await.map_err(read_failure)?;
                descriptors = serde_json::from_str(&text).map_err(|e| {
                    error_response(FleetError::Validation(format!(
                        "Malformed medications payload: {e}"
                    )))
                })?;
            }
            Some("files") => {
                payloads.push(field.bytes().await.map_err(read_failure)?.to_vec());
            }
            _ => {}
        }
    }

    let batch = state
        .fleet
        .load_medications(descriptors, payloads)
        .await
        .map_err(error_response)?;
    Ok(Json(batch))
}

pub async fn drone_medications(
    State(state): State<Arc<AppState>>,
    Path(drone_id): Path<u64>,
) -> Result<Json<Vec<Medication>>, ApiError> {
    let medications = state
        .fleet
        .medications(DroneId(drone_id))
        .await
        .map_err(error_response)?;
    Ok(Json(medications))
}

pub async fn available_drones(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Drone>>, ApiError> {
    let drones = state
        .fleet
        .available_drones()
        .await
        .map_err(error_response)?;
    Ok(Json(drones))
}

pub async fn battery_level(
    State(state): State<Arc<AppState>>,
    Path(drone_id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    let battery = state
        .fleet
        .battery_level(DroneId(drone_id))
        .await
        .map_err(error_response)?;
    Ok(Json(json!({ "drone_id": drone_id, "battery_level": battery })))
}

fn read_failure(err: axum::extract::multipart::MultipartError) -> ApiError {
    error_response(FleetError::Io(format!("Exception during reading file: {err}")))
}

fn error_response(err: FleetError) -> ApiError {
    let status = match &err {
        FleetError::Validation(_) | FleetError::Precondition(_) | FleetError::Io(_) => {
            StatusCode::BAD_REQUEST
        }
        FleetError::NotFound(_) => StatusCode::NOT_FOUND,
        FleetError::Conflict { .. } => StatusCode::CONFLICT,
        FleetError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(error = %err, "Request failed on the persistence layer");
    }
    (status, Json(json!({ "error": err.to_string() })))
}
