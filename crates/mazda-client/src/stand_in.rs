//! Local stand-in for the vehicle cloud

use crate::{
    ClientError, Credentials, Result, Vehicle, VehicleClient, VehicleId, VehicleStatus,
};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Deterministic backend for local development and tests.
///
/// Every credential validates, commands succeed, and reads return one fixed
/// vehicle with all doors closed and locked.
pub struct StandInClient {
    credentials: Credentials,
    closed: AtomicBool,
}

impl StandInClient {
    pub fn new(credentials: Credentials) -> Self {
        debug!(user = %credentials.fingerprint(), region = %credentials.region, "Stand-in client created");
        Self {
            credentials,
            closed: AtomicBool::new(false),
        }
    }

    /// The vehicle list every stand-in account owns
    pub fn fixture_vehicles() -> Vec<Vehicle> {
        vec![Vehicle::new(object(json!({
            "vin": "JMXXXXXXXXXXXXXXX",
            "id": 12345,
            "nickname": "Nickname",
            "carlineCode": "C30",
            "carlineName": "CX-30 PREFERRED FWD",
            "modelYear": "2020",
            "modelCode": "C30  PF  2A",
            "modelName": "CX-30 WITH PREFERRED PACKAGE FWD",
            "automaticTransmission": true,
            "interiorColorCode": "D1P",
            "interiorColorName": "BLACK",
            "exteriorColorCode": "25D",
            "exteriorColorName": "SNOWFLAKE WHITE PEARL MC",
            "isElectric": false
        })))]
    }

    /// The status report returned for any vehicle id
    pub fn fixture_status() -> VehicleStatus {
        VehicleStatus::new(object(json!({
            "lastUpdatedTimestamp": "20210227145504",
            "latitude": 0.0,
            "longitude": 0.0,
            "positionTimestamp": "20210227145503",
            "fuelRemainingPercent": 18.0,
            "fuelDistanceRemainingKm": 79.15,
            "odometerKm": 3105.8,
            "doors": {
                "driverDoorOpen": false,
                "passengerDoorOpen": false,
                "rearLeftDoorOpen": false,
                "rearRightDoorOpen": false,
                "trunkOpen": false,
                "hoodOpen": false,
                "fuelLidOpen": false
            },
            "doorLocks": {
                "driverDoorUnlocked": false,
                "passengerDoorUnlocked": false,
                "rearLeftDoorUnlocked": false,
                "rearRightDoorUnlocked": false
            },
            "windows": {
                "driverWindowOpen": false,
                "passengerWindowOpen": false,
                "rearLeftWindowOpen": false,
                "rearRightWindowOpen": false
            },
            "hazardLightsOn": false,
            "tirePressure": {
                "frontLeftTirePressurePsi": 33.0,
                "frontRightTirePressurePsi": 35.0,
                "rearLeftTirePressurePsi": 33.0,
                "rearRightTirePressurePsi": 33.0
            }
        })))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(ClientError::Closed);
        }
        Ok(())
    }

    fn command(&self, name: &str, vehicle_id: VehicleId) -> Result<()> {
        self.ensure_open()?;
        debug!(user = %self.credentials.fingerprint(), vehicle_id, command = name, "Stand-in command accepted");
        Ok(())
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[async_trait]
impl VehicleClient for StandInClient {
    async fn validate_credentials(&self) -> Result<()> {
        self.ensure_open()
    }

    async fn get_vehicles(&self) -> Result<Vec<Vehicle>> {
        self.ensure_open()?;
        Ok(Self::fixture_vehicles())
    }

    async fn get_vehicle_status(&self, _vehicle_id: VehicleId) -> Result<VehicleStatus> {
        self.ensure_open()?;
        Ok(Self::fixture_status())
    }

    async fn lock_doors(&self, vehicle_id: VehicleId) -> Result<()> {
        self.command("lock_doors", vehicle_id)
    }

    async fn unlock_doors(&self, vehicle_id: VehicleId) -> Result<()> {
        self.command("unlock_doors", vehicle_id)
    }

    async fn turn_on_hazard_lights(&self, vehicle_id: VehicleId) -> Result<()> {
        self.command("turn_on_hazard_lights", vehicle_id)
    }

    async fn turn_off_hazard_lights(&self, vehicle_id: VehicleId) -> Result<()> {
        self.command("turn_off_hazard_lights", vehicle_id)
    }

    async fn start_engine(&self, vehicle_id: VehicleId) -> Result<()> {
        self.command("start_engine", vehicle_id)
    }

    async fn stop_engine(&self, vehicle_id: VehicleId) -> Result<()> {
        self.command("stop_engine", vehicle_id)
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Region;

    fn client() -> StandInClient {
        StandInClient::new(Credentials::new("a@b.com", "p", Region::Mnao))
    }

    #[tokio::test]
    async fn test_fixture_vehicle_list() {
        let vehicles = client().get_vehicles().await.unwrap();

        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].id(), Some(12345));
        assert_eq!(vehicles[0].vin(), Some("JMXXXXXXXXXXXXXXX"));
        assert_eq!(vehicles[0]["modelYear"], json!("2020"));
    }

    #[tokio::test]
    async fn test_fixture_status_is_all_closed() {
        let status = client().get_vehicle_status(12345).await.unwrap();

        assert!(!status.any_door_open());
        assert!(!status.any_door_unlocked());
        assert!(!status.any_window_open());
        assert_eq!(status["odometerKm"], json!(3105.8));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let client = client();
        client.close().await.unwrap();
        client.close().await.unwrap();

        assert!(matches!(client.get_vehicles().await, Err(ClientError::Closed)));
    }
}
