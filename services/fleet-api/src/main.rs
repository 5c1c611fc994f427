use axum::{
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tracing::info;

use dronefleet_core::{logging, Config};
use dronefleet_dispatch::BatteryAudit;

mod handlers;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    logging::init(config.logging.json);
    let state = Arc::new(AppState::new(config.clone())?);

    BatteryAudit::new(
        state.store.clone(),
        Duration::from_secs(config.audit.interval_secs),
    )
    .spawn();

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/drones/register", post(handlers::register_drone))
        .route("/api/drones/medication", post(handlers::load_medications))
        .route("/api/drones/available", get(handlers::available_drones))
        .route(
            "/api/drones/:drone_id/medications",
            get(handlers::drone_medications),
        )
        .route(
            "/api/drones/:drone_id/battery-level",
            get(handlers::battery_level),
        )
        .with_state(state)
        .layer(ServiceBuilder::new().into_inner());

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Fleet API service listening on {}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_check() -> Result<Json<Value>, StatusCode> {
    Ok(Json(json!({
        "status": "healthy",
        "service": "fleet-api",
        "timestamp": Utc::now().to_rfc3339()
    })))
}
