//! Remote engine handlers

use super::run_command;
use crate::dispatch::BackendFlags;
use crate::extract::VehiclePath;
use crate::{ApiError, AppState, AuthenticatedSession};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
};
use mazda_client::VehicleCommand;
use std::sync::Arc;

/// GET /engine/start/{vid}
pub async fn start_engine(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthenticatedSession>,
    VehiclePath(vehicle_id): VehiclePath,
    flags: BackendFlags,
) -> Result<StatusCode, ApiError> {
    run_command(&state, &session, &flags, vehicle_id, VehicleCommand::StartEngine).await
}

/// GET /engine/stop/{vid}
pub async fn stop_engine(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthenticatedSession>,
    VehiclePath(vehicle_id): VehiclePath,
    flags: BackendFlags,
) -> Result<StatusCode, ApiError> {
    run_command(&state, &session, &flags, vehicle_id, VehicleCommand::StopEngine).await
}
