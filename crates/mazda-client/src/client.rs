//! Backend interface and selection

use crate::{
    ClientConfig, Credentials, RemoteClient, Result, StandInClient, Vehicle, VehicleCommand,
    VehicleId, VehicleStatus,
};
use async_trait::async_trait;
use tracing::debug;

/// Operations offered by the vehicle cloud
///
/// A client is built for one set of credentials and must be `close`d once the
/// caller is done with it.
#[async_trait]
pub trait VehicleClient: Send + Sync {
    /// Check the credentials against the vehicle cloud
    async fn validate_credentials(&self) -> Result<()>;

    /// List the vehicles registered to the account
    async fn get_vehicles(&self) -> Result<Vec<Vehicle>>;

    /// Fetch the latest status report for a vehicle
    async fn get_vehicle_status(&self, vehicle_id: VehicleId) -> Result<VehicleStatus>;

    async fn lock_doors(&self, vehicle_id: VehicleId) -> Result<()>;

    async fn unlock_doors(&self, vehicle_id: VehicleId) -> Result<()>;

    async fn turn_on_hazard_lights(&self, vehicle_id: VehicleId) -> Result<()>;

    async fn turn_off_hazard_lights(&self, vehicle_id: VehicleId) -> Result<()>;

    async fn start_engine(&self, vehicle_id: VehicleId) -> Result<()>;

    async fn stop_engine(&self, vehicle_id: VehicleId) -> Result<()>;

    /// Release any session held with the vehicle cloud
    async fn close(&self) -> Result<()>;

    /// Run a payload-less command
    async fn execute(&self, command: VehicleCommand, vehicle_id: VehicleId) -> Result<()> {
        match command {
            VehicleCommand::LockDoors => self.lock_doors(vehicle_id).await,
            VehicleCommand::UnlockDoors => self.unlock_doors(vehicle_id).await,
            VehicleCommand::HazardLightsOn => self.turn_on_hazard_lights(vehicle_id).await,
            VehicleCommand::HazardLightsOff => self.turn_off_hazard_lights(vehicle_id).await,
            VehicleCommand::StartEngine => self.start_engine(vehicle_id).await,
            VehicleCommand::StopEngine => self.stop_engine(vehicle_id).await,
        }
    }
}

/// Which backend serves a request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// The real vehicle cloud
    Live,
    /// Deterministic local data
    StandIn,
}

/// Pick the backend for one request.
///
/// The stand-in wins if either the process-wide toggle or the request flag
/// asks for it.
pub fn select_backend(use_stand_in: bool, request_flag: Option<bool>) -> BackendKind {
    if use_stand_in || request_flag.unwrap_or(false) {
        BackendKind::StandIn
    } else {
        BackendKind::Live
    }
}

/// Parse a boolean flag the way the `MOCK_CLIENT` variable is read
pub fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "t")
}

/// Either backend behind one type
pub enum BackendClient {
    Live(RemoteClient),
    StandIn(StandInClient),
}

impl BackendClient {
    /// Build a client of the requested kind for these credentials
    pub fn connect(kind: BackendKind, credentials: Credentials, config: &ClientConfig) -> Result<Self> {
        debug!(?kind, user = %credentials.fingerprint(), "Building backend client");
        match kind {
            BackendKind::Live => Ok(Self::Live(RemoteClient::new(config, credentials)?)),
            BackendKind::StandIn => Ok(Self::StandIn(StandInClient::new(credentials))),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Live(_) => BackendKind::Live,
            Self::StandIn(_) => BackendKind::StandIn,
        }
    }
}

#[async_trait]
impl VehicleClient for BackendClient {
    async fn validate_credentials(&self) -> Result<()> {
        match self {
            Self::Live(client) => client.validate_credentials().await,
            Self::StandIn(client) => client.validate_credentials().await,
        }
    }

    async fn get_vehicles(&self) -> Result<Vec<Vehicle>> {
        match self {
            Self::Live(client) => client.get_vehicles().await,
            Self::StandIn(client) => client.get_vehicles().await,
        }
    }

    async fn get_vehicle_status(&self, vehicle_id: VehicleId) -> Result<VehicleStatus> {
        match self {
            Self::Live(client) => client.get_vehicle_status(vehicle_id).await,
            Self::StandIn(client) => client.get_vehicle_status(vehicle_id).await,
        }
    }

    async fn lock_doors(&self, vehicle_id: VehicleId) -> Result<()> {
        match self {
            Self::Live(client) => client.lock_doors(vehicle_id).await,
            Self::StandIn(client) => client.lock_doors(vehicle_id).await,
        }
    }

    async fn unlock_doors(&self, vehicle_id: VehicleId) -> Result<()> {
        match self {
            Self::Live(client) => client.unlock_doors(vehicle_id).await,
            Self::StandIn(client) => client.unlock_doors(vehicle_id).await,
        }
    }

    async fn turn_on_hazard_lights(&self, vehicle_id: VehicleId) -> Result<()> {
        match self {
            Self::Live(client) => client.turn_on_hazard_lights(vehicle_id).await,
            Self::StandIn(client) => client.turn_on_hazard_lights(vehicle_id).await,
        }
    }

    async fn turn_off_hazard_lights(&self, vehicle_id: VehicleId) -> Result<()> {
        match self {
            Self::Live(client) => client.turn_off_hazard_lights(vehicle_id).await,
            Self::StandIn(client) => client.turn_off_hazard_lights(vehicle_id).await,
        }
    }

    async fn start_engine(&self, vehicle_id: VehicleId) -> Result<()> {
        match self {
            Self::Live(client) => client.start_engine(vehicle_id).await,
            Self::StandIn(client) => client.start_engine(vehicle_id).await,
        }
    }

    async fn stop_engine(&self, vehicle_id: VehicleId) -> Result<()> {
        match self {
            Self::Live(client) => client.stop_engine(vehicle_id).await,
            Self::StandIn(client) => client.stop_engine(vehicle_id).await,
        }
    }

    async fn close(&self) -> Result<()> {
        match self {
            Self::Live(client) => client.close().await,
            Self::StandIn(client) => client.close().await,
        }
    }
}
