//! Door handlers

use super::run_command;
use crate::dispatch::{BackendFlags, ScopedClient};
use crate::extract::VehiclePath;
use crate::status::DoorsStatus;
use crate::{ApiError, AppState, AuthenticatedSession};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use mazda_client::VehicleCommand;
use std::sync::Arc;
use tracing::instrument;

/// GET /doors/status/{vid} - Summarized door, lock and window state
#[instrument(skip_all, fields(user = %session.user, vehicle_id = vehicle_id))]
pub async fn doors_status(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthenticatedSession>,
    VehiclePath(vehicle_id): VehiclePath,
    flags: BackendFlags,
) -> Result<Json<DoorsStatus>, ApiError> {
    let client = ScopedClient::open(&state, &session.credentials, &flags)?;
    let outcome = client.get_vehicle_status(vehicle_id).await;
    client.release().await;

    Ok(Json(DoorsStatus::from(&outcome?)))
}

/// GET /doors/lock/{vid}
pub async fn lock_doors(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthenticatedSession>,
    VehiclePath(vehicle_id): VehiclePath,
    flags: BackendFlags,
) -> Result<StatusCode, ApiError> {
    run_command(&state, &session, &flags, vehicle_id, VehicleCommand::LockDoors).await
}

/// GET /doors/unlock/{vid}
pub async fn unlock_doors(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthenticatedSession>,
    VehiclePath(vehicle_id): VehiclePath,
    flags: BackendFlags,
) -> Result<StatusCode, ApiError> {
    run_command(&state, &session, &flags, vehicle_id, VehicleCommand::UnlockDoors).await
}
