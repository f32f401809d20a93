//! # Mazda Client
//!
//! Vehicle-cloud collaborator for the Mazda gateway.
//!
//! This crate provides:
//! - **`VehicleClient`**: the async interface every backend implements
//! - **Live backend**: `RemoteClient`, JSON over HTTP to a vehicle-cloud bridge
//! - **Stand-in backend**: `StandInClient`, deterministic local data for
//!   development and tests
//! - **Selection**: `select_backend` and `BackendClient::connect`, which turn a
//!   configuration toggle plus a per-request flag into a ready client
//!
//! ## Example
//!
//! ```rust,ignore
//! use mazda_client::{BackendClient, BackendKind, ClientConfig, Credentials, Region, VehicleClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let credentials = Credentials::new("driver@example.com", "secret", Region::Mnao);
//!     let client = BackendClient::connect(BackendKind::StandIn, credentials, &ClientConfig::default())?;
//!
//!     client.validate_credentials().await?;
//!     for vehicle in client.get_vehicles().await? {
//!         println!("{:?} ({:?})", vehicle.get("nickname"), vehicle.vin());
//!     }
//!     client.close().await?;
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod remote;
mod stand_in;
mod types;

pub use client::{is_truthy, select_backend, BackendClient, BackendKind, VehicleClient};
pub use config::ClientConfig;
pub use error::{ClientError, Result, UnknownRegion};
pub use remote::RemoteClient;
pub use stand_in::StandInClient;
pub use types::*;
