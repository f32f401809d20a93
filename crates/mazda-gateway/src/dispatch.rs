//! Backend selection and request-scoped client handles

use crate::state::AppState;
use mazda_client::{
    is_truthy, select_backend, BackendClient, BackendKind, ClientConfig, Credentials, Result,
    VehicleClient,
};
use serde::Deserialize;
use std::ops::Deref;
use std::sync::Arc;
use tracing::{debug, warn};

/// Builds backend clients for the dispatch layer
pub trait Connector: Send + Sync {
    fn connect(&self, kind: BackendKind, credentials: Credentials) -> Result<Box<dyn VehicleClient>>;
}

/// Connector for the built-in live and stand-in backends
pub struct BackendConnector {
    config: ClientConfig,
}

impl BackendConnector {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

impl Connector for BackendConnector {
    fn connect(&self, kind: BackendKind, credentials: Credentials) -> Result<Box<dyn VehicleClient>> {
        Ok(Box::new(BackendClient::connect(kind, credentials, &self.config)?))
    }
}

/// Per-request backend override (`?mock=true`)
#[derive(Debug, Default, Deserialize)]
pub struct BackendFlags {
    pub mock: Option<String>,
}

impl BackendFlags {
    pub fn stand_in(&self) -> Option<bool> {
        self.mock.as_deref().map(is_truthy)
    }
}

/// A backend client that is closed exactly once.
///
/// Call [`ScopedClient::release`] on every normal path. If the handle is
/// dropped unreleased (request cancelled, panic) the close runs on a spawned
/// task instead.
pub struct ScopedClient {
    client: Arc<dyn VehicleClient>,
    user: String,
    released: bool,
}

impl ScopedClient {
    /// Select a backend for this request and build a client for `credentials`
    pub fn open(state: &AppState, credentials: &Credentials, flags: &BackendFlags) -> Result<Self> {
        let kind = select_backend(state.config.use_stand_in, flags.stand_in());
        let user = credentials.fingerprint();
        debug!(user = %user, ?kind, "Opening backend client");

        let client = state.connector.connect(kind, credentials.clone())?;
        Ok(Self {
            client: Arc::from(client),
            user,
            released: false,
        })
    }

    /// Close the client; close failures are logged, never surfaced
    pub async fn release(mut self) {
        self.released = true;
        if let Err(e) = self.client.close().await {
            warn!(user = %self.user, error = %e, "Failed to close backend client");
        }
    }
}

impl Deref for ScopedClient {
    type Target = dyn VehicleClient;

    fn deref(&self) -> &Self::Target {
        self.client.as_ref()
    }
}

impl Drop for ScopedClient {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        let client = Arc::clone(&self.client);
        let user = std::mem::take(&mut self.user);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!(user = %user, "Backend client dropped unreleased, closing in background");
                handle.spawn(async move {
                    if let Err(e) = client.close().await {
                        warn!(user = %user, error = %e, "Failed to close backend client");
                    }
                });
            }
            Err(_) => warn!(user = %user, "Backend client dropped outside a runtime, not closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GatewayConfig;
    use async_trait::async_trait;
    use mazda_client::{ClientError, Region, Vehicle, VehicleId, VehicleStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct Counters {
        connects: AtomicUsize,
        closes: AtomicUsize,
    }

    struct CountingClient(Arc<Counters>);

    #[async_trait]
    impl VehicleClient for CountingClient {
        async fn validate_credentials(&self) -> Result<()> {
            Ok(())
        }
        async fn get_vehicles(&self) -> Result<Vec<Vehicle>> {
            // Parks forever so the caller can be cancelled mid-call
            std::future::pending().await
        }
        async fn get_vehicle_status(&self, _: VehicleId) -> Result<VehicleStatus> {
            Err(ClientError::InvalidResponse("boom".to_string()))
        }
        async fn lock_doors(&self, _: VehicleId) -> Result<()> {
            Ok(())
        }
        async fn unlock_doors(&self, _: VehicleId) -> Result<()> {
            Ok(())
        }
        async fn turn_on_hazard_lights(&self, _: VehicleId) -> Result<()> {
            Ok(())
        }
        async fn turn_off_hazard_lights(&self, _: VehicleId) -> Result<()> {
            Ok(())
        }
        async fn start_engine(&self, _: VehicleId) -> Result<()> {
            Ok(())
        }
        async fn stop_engine(&self, _: VehicleId) -> Result<()> {
            Ok(())
        }
        async fn close(&self) -> Result<()> {
            self.0.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct CountingConnector(Arc<Counters>);

    impl Connector for CountingConnector {
        fn connect(&self, _: BackendKind, _: Credentials) -> Result<Box<dyn VehicleClient>> {
            self.0.connects.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(CountingClient(Arc::clone(&self.0))))
        }
    }

    fn state(counters: &Arc<Counters>) -> AppState {
        let config = GatewayConfig {
            secret_key: "test-secret".to_string(),
            ..Default::default()
        };
        AppState::with_connector(config, Arc::new(CountingConnector(Arc::clone(counters)))).unwrap()
    }

    fn credentials() -> Credentials {
        Credentials::new("a@b.com", "p", Region::Mnao)
    }

    #[test]
    fn test_flags() {
        assert_eq!(BackendFlags::default().stand_in(), None);
        assert_eq!(BackendFlags { mock: Some("T".to_string()) }.stand_in(), Some(true));
        assert_eq!(BackendFlags { mock: Some("no".to_string()) }.stand_in(), Some(false));
    }

    #[tokio::test]
    async fn test_release_closes_once() {
        let counters = Arc::new(Counters::default());
        let state = state(&counters);

        let client = ScopedClient::open(&state, &credentials(), &BackendFlags::default()).unwrap();
        assert!(client.get_vehicle_status(1).await.is_err());
        client.release().await;

        assert_eq!(counters.connects.load(Ordering::SeqCst), 1);
        assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancelled_call_still_closes() {
        let counters = Arc::new(Counters::default());
        let state = state(&counters);

        let client = ScopedClient::open(&state, &credentials(), &BackendFlags::default()).unwrap();
        let call = async move {
            let vehicles = client.get_vehicles().await;
            client.release().await;
            vehicles
        };
        assert!(tokio::time::timeout(Duration::from_millis(20), call).await.is_err());

        // Give the spawned close a chance to run
        for _ in 0..50 {
            if counters.closes.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stand_in_connector_builds_client() {
        let connector = BackendConnector::new(ClientConfig::default());
        assert!(connector.connect(BackendKind::StandIn, credentials()).is_ok());
        assert!(connector.connect(BackendKind::Live, credentials()).is_err());
    }
}
