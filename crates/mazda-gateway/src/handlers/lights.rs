//! Hazard light handlers

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

/// GET /lights/on/{vid}
pub async fn hazard_lights_on(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthenticatedSession>,
    VehiclePath(vehicle_id): VehiclePath,
    flags: BackendFlags,
) -> Result<StatusCode, ApiError> {
    run_command(&state, &session, &flags, vehicle_id, VehicleCommand::HazardLightsOn).await
}

/// GET /lights/off/{vid}
pub async fn hazard_lights_off(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthenticatedSession>,
    VehiclePath(vehicle_id): VehiclePath,
    flags: BackendFlags,
) -> Result<StatusCode, ApiError> {
    run_command(&state, &session, &flags, vehicle_id, VehicleCommand::HazardLightsOff).await
}
