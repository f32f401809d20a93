//! Validating extractors
//!
//! Rejections are reported through [`ApiError`] so every failure shares the
//! JSON error body.

use crate::dispatch::BackendFlags;
use crate::error::{ApiError, ErrorCode, FieldErrors};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use mazda_client::VehicleId;
use serde::de::DeserializeOwned;
use std::ops::Deref;
use validator::{Validate, ValidationErrors};

/// JSON body extractor with automatic validation.
///
/// Malformed JSON and constraint violations are both reported as
/// `ValidationError` (422).
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::malformed_body(rejection.body_text()))?;
        value.validate().map_err(validation_error)?;
        Ok(Self(value))
    }
}

pub(crate) fn validation_error(errors: ValidationErrors) -> ApiError {
    let fields: FieldErrors = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect();

    ApiError::Validation {
        message: "Validation error".to_string(),
        fields,
    }
}

/// Integer vehicle id from the last path segment.
///
/// Anything that is not an integer does not name a route, so it is a 404.
#[derive(Debug, Clone, Copy)]
pub struct VehiclePath(pub VehicleId);

impl<S> FromRequestParts<S> for VehiclePath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(vehicle_id) = Path::<VehicleId>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::new(ErrorCode::NotFound, "Not found"))?;
        Ok(Self(vehicle_id))
    }
}

/// `?mock=` override; an unparseable query string is a `ValidationError`
impl<S> FromRequestParts<S> for BackendFlags
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(flags) = Query::<BackendFlags>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation {
                message: "Invalid query string".to_string(),
                fields: FieldErrors::from([("mock".to_string(), vec![rejection.body_text()])]),
            })?;
        Ok(flags)
    }
}
