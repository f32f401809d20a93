//! Vehicle list and status handlers

use crate::dispatch::{BackendFlags, ScopedClient};
use crate::extract::VehiclePath;
use crate::{ApiError, AppState, AuthenticatedSession};
use axum::{
    extract::{Extension, State},
    Json,
};
use mazda_client::{Vehicle, VehicleStatus};
use std::sync::Arc;
use tracing::instrument;

/// GET /vehicles - List the account's vehicles
#[instrument(skip_all, fields(user = %session.user))]
pub async fn list_vehicles(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthenticatedSession>,
    flags: BackendFlags,
) -> Result<Json<Vec<Vehicle>>, ApiError> {
    let client = ScopedClient::open(&state, &session.credentials, &flags)?;
    let outcome = client.get_vehicles().await;
    client.release().await;

    Ok(Json(outcome?))
}

/// GET /vehicle/status/{vid} - Raw vehicle status report
#[instrument(skip_all, fields(user = %session.user, vehicle_id = vehicle_id))]
pub async fn vehicle_status(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthenticatedSession>,
    VehiclePath(vehicle_id): VehiclePath,
    flags: BackendFlags,
) -> Result<Json<VehicleStatus>, ApiError> {
    let client = ScopedClient::open(&state, &session.credentials, &flags)?;
    let outcome = client.get_vehicle_status(vehicle_id).await;
    client.release().await;

    Ok(Json(outcome?))
}
