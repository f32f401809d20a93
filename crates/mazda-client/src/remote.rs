//! Live vehicle-cloud client

use crate::{
    ClientConfig, ClientError, Credentials, Result, Vehicle, VehicleClient, VehicleId,
    VehicleStatus,
};
use async_trait::async_trait;
use reqwest::{header, Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
    region: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    access_token: String,
}

/// Client for the vehicle-cloud bridge.
///
/// Logs in lazily on the first call that needs a session and logs out on
/// `close`. One instance serves one request.
pub struct RemoteClient {
    credentials: Credentials,
    base_url: String,
    http: Client,
    access_token: Mutex<Option<String>>,
    closed: AtomicBool,
}

impl RemoteClient {
    /// Create a client for these credentials
    pub fn new(config: &ClientConfig, credentials: Credentials) -> Result<Self> {
        let base_url = config.base_url()?;

        let user_agent = header::HeaderValue::from_str(&config.user_agent)
            .map_err(|e| ClientError::Config(format!("invalid user agent: {}", e)))?;
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, user_agent);

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            credentials,
            base_url,
            http,
            access_token: Mutex::new(None),
            closed: AtomicBool::new(false),
        })
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(ClientError::Closed);
        }
        Ok(())
    }

    async fn login(&self) -> Result<String> {
        let body = LoginRequest {
            email: &self.credentials.email,
            password: &self.credentials.password,
            region: self.credentials.region.as_str(),
        };

        let url = format!("{}/auth/login", self.base_url);
        debug!(user = %self.credentials.fingerprint(), region = %self.credentials.region, "Logging in to vehicle cloud");
        let response = check(self.http.post(&url).json(&body).send().await?).await?;
        let login: LoginResponse = read_json(response).await?;

        if login.access_token.is_empty() {
            return Err(ClientError::LoginFailed("empty access token".to_string()));
        }
        Ok(login.access_token)
    }

    /// Current session token, logging in if none is held yet
    async fn session(&self) -> Result<String> {
        let mut token = self.access_token.lock().await;
        if let Some(existing) = token.as_ref() {
            return Ok(existing.clone());
        }
        let fresh = self.login().await?;
        *token = Some(fresh.clone());
        Ok(fresh)
    }

    async fn request(&self, method: Method, path: &str) -> Result<Response> {
        self.ensure_open()?;
        let token = self.session().await?;
        let url = format!("{}{}", self.base_url, path);

        debug!("Sending {} request to {}", method, url);
        let response = self
            .http
            .request(method, &url)
            .bearer_auth(token)
            .send()
            .await?;

        check(response).await
    }

    async fn command(&self, vehicle_id: VehicleId, action: &str) -> Result<()> {
        let path = format!("/vehicles/{}/{}", vehicle_id, action);
        self.request(Method::POST, &path).await?;
        Ok(())
    }
}

/// Turn non-success responses into errors
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    Err(ClientError::from_response(status.as_u16(), &text))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl VehicleClient for RemoteClient {
    #[instrument(skip(self), fields(user = %self.credentials.fingerprint()))]
    async fn validate_credentials(&self) -> Result<()> {
        self.ensure_open()?;
        let token = self.login().await?;
        *self.access_token.lock().await = Some(token);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_vehicles(&self) -> Result<Vec<Vehicle>> {
        let response = self.request(Method::GET, "/vehicles").await?;
        read_json(response).await
    }

    #[instrument(skip(self))]
    async fn get_vehicle_status(&self, vehicle_id: VehicleId) -> Result<VehicleStatus> {
        let path = format!("/vehicles/{}/status", vehicle_id);
        let response = self.request(Method::GET, &path).await?;
        read_json(response).await
    }

    #[instrument(skip(self))]
    async fn lock_doors(&self, vehicle_id: VehicleId) -> Result<()> {
        self.command(vehicle_id, "doors/lock").await
    }

    #[instrument(skip(self))]
    async fn unlock_doors(&self, vehicle_id: VehicleId) -> Result<()> {
        self.command(vehicle_id, "doors/unlock").await
    }

    #[instrument(skip(self))]
    async fn turn_on_hazard_lights(&self, vehicle_id: VehicleId) -> Result<()> {
        self.command(vehicle_id, "hazard-lights/on").await
    }

    #[instrument(skip(self))]
    async fn turn_off_hazard_lights(&self, vehicle_id: VehicleId) -> Result<()> {
        self.command(vehicle_id, "hazard-lights/off").await
    }

    #[instrument(skip(self))]
    async fn start_engine(&self, vehicle_id: VehicleId) -> Result<()> {
        self.command(vehicle_id, "engine/start").await
    }

    #[instrument(skip(self))]
    async fn stop_engine(&self, vehicle_id: VehicleId) -> Result<()> {
        self.command(vehicle_id, "engine/stop").await
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let Some(token) = self.access_token.lock().await.take() else {
            return Ok(());
        };

        let url = format!("{}/auth/logout", self.base_url);
        let result = match self.http.post(&url).bearer_auth(token).send().await {
            Ok(response) => check(response).await.map(|_| ()),
            Err(e) => Err(e.into()),
        };
        if let Err(ref e) = result {
            warn!(error = %e, "Vehicle-cloud logout failed");
        }
        result
    }
}
