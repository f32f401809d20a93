//! Vehicle API request handlers

pub mod auth;
pub mod doors;
pub mod engine;
pub mod lights;
pub mod service;
pub mod vehicles;

pub use auth::*;
pub use doors::*;
pub use engine::*;
pub use lights::*;
pub use service::*;
pub use vehicles::*;

use crate::dispatch::{BackendFlags, ScopedClient};
use crate::{ApiError, AppState, AuthenticatedSession};
use axum::http::StatusCode;
use mazda_client::{VehicleCommand, VehicleId};
use tracing::{info, warn};

/// Run one payload-less command and answer 204
pub(crate) async fn run_command(
    state: &AppState,
    session: &AuthenticatedSession,
    flags: &BackendFlags,
    vehicle_id: VehicleId,
    command: VehicleCommand,
) -> Result<StatusCode, ApiError> {
    let client = ScopedClient::open(state, &session.credentials, flags)?;
    let outcome = client.execute(command, vehicle_id).await;
    client.release().await;

    match outcome {
        Ok(()) => {
            info!(user = %session.user, vehicle_id, %command, "Vehicle command sent");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            warn!(user = %session.user, vehicle_id, %command, error = %e, "Vehicle command failed");
            Err(ApiError::backend(e))
        }
    }
}
