//! HTTP route definitions

use crate::{handlers, middleware, AppState};
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main router
pub fn create_router(state: Arc<AppState>) -> Router {
    // Routes behind the bearer-token gate
    let protected = Router::new()
        .route("/vehicles", get(handlers::list_vehicles))
        .route("/vehicle/status/{vid}", get(handlers::vehicle_status))
        .route("/doors/status/{vid}", get(handlers::doors_status))
        .route("/doors/lock/{vid}", get(handlers::lock_doors))
        .route("/doors/unlock/{vid}", get(handlers::unlock_doors))
        .route("/lights/on/{vid}", get(handlers::hazard_lights_on))
        .route("/lights/off/{vid}", get(handlers::hazard_lights_off))
        .route("/engine/start/{vid}", get(handlers::start_engine))
        .route("/engine/stop/{vid}", get(handlers::stop_engine))
        .route_layer(axum_middleware::from_fn_with_state(
            Arc::clone(&state),
            middleware::auth_middleware,
        ));

    let api = Router::new()
        .route("/auth", post(handlers::issue_token))
        .route("/health", get(handlers::health_check))
        .merge(protected);

    let prefix = state.config.normalized_prefix();
    let router = if prefix.is_empty() {
        Router::new().merge(api)
    } else {
        Router::new().nest(&prefix, api)
    };

    let router = router
        .fallback(handlers::not_found)
        // Apply middleware
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(state.config.max_body_size));

    let router = if state.config.cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers(Any);
        router.layer(cors)
    } else {
        router
    };

    router.with_state(state)
}
