//! Token issuing handler

use crate::dispatch::{BackendFlags, ScopedClient};
use crate::extract::ValidatedJson;
use crate::schema::AuthRequest;
use crate::{ApiError, AppState};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// POST /auth - Exchange vehicle-cloud credentials for a session token
#[instrument(skip_all)]
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    flags: BackendFlags,
    ValidatedJson(request): ValidatedJson<AuthRequest>,
) -> Result<Response, ApiError> {
    let credentials = request.into_credentials()?;
    let user = credentials.fingerprint();

    let client = ScopedClient::open(&state, &credentials, &flags).map_err(|e| {
        warn!(user = %user, error = %e, "Could not build backend client");
        ApiError::authentication(&e)
    })?;
    let outcome = client.validate_credentials().await;
    client.release().await;

    if let Err(e) = outcome {
        warn!(user = %user, error = %e, "Credential validation failed");
        return Err(ApiError::authentication(&e));
    }

    let token = state.tokens.encode(&credentials)?;
    info!(user = %user, region = %credentials.region, "Session token issued");

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        token,
    )
        .into_response())
}
