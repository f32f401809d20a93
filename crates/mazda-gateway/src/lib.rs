//! # Mazda Gateway
//!
//! Authenticated HTTP gateway for Mazda connected-vehicle control.
//!
//! This crate provides:
//! - **Session tokens**: stateless HS256 tokens carrying the account credentials
//! - **Auth gate**: bearer-token middleware in front of every vehicle route
//! - **Dispatch**: one backend call per request, with guaranteed client release
//!   and a uniform JSON error taxonomy
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   HTTP Clients                      │
//! │          (mobile apps, shortcuts, curl, ...)        │
//! └─────────────────────────┬───────────────────────────┘
//!                           │
//! ┌─────────────────────────▼───────────────────────────┐
//! │                   Mazda Gateway                     │
//! ├─────────────────────────────────────────────────────┤
//! │ Credential Schema │ Token Codec │ Auth Gate          │
//! ├─────────────────────────────────────────────────────┤
//! │        Dispatch / Error Mapping Handlers            │
//! │   (vehicles, status, doors, lights, engine)         │
//! ├─────────────────────────────────────────────────────┤
//! │                   mazda-client                      │
//! │         (live vehicle cloud | stand-in)             │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod schema;
pub mod server;
pub mod state;
pub mod status;

pub use auth::{TokenCodec, TokenError};
pub use config::GatewayConfig;
pub use dispatch::{BackendConnector, Connector};
pub use error::{ApiError, ErrorCode};
pub use server::{run_server, run_server_with_shutdown};
pub use state::{AppState, AuthenticatedSession};
