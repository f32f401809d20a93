//! Common types shared by the gateway and the backends

use crate::UnknownRegion;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Vehicle identifier assigned by the vehicle cloud
pub type VehicleId = i64;

/// Vehicle-cloud region
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// North America
    #[default]
    #[serde(rename = "MNAO")]
    Mnao,
    /// Europe
    #[serde(rename = "MME")]
    Mme,
    /// Japan
    #[serde(rename = "MJO")]
    Mjo,
}

impl Region {
    /// Every supported region
    pub const ALL: [Region; 3] = [Region::Mnao, Region::Mme, Region::Mjo];

    /// Region code as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mnao => "MNAO",
            Self::Mme => "MME",
            Self::Mjo => "MJO",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRegion(s.to_string()))
    }
}

/// Vehicle-cloud account credentials
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub region: Region,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>, region: Region) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            region,
        }
    }

    /// Short, stable identifier for logs that does not expose the email
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"mazda:user:");
        hasher.update(self.email.as_bytes());
        hex::encode(&hasher.finalize().as_bytes()[..8])
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}

/// Status groups the door summary reads
pub const DOORS: &str = "doors";
pub const DOOR_LOCKS: &str = "doorLocks";
pub const WINDOWS: &str = "windows";

/// A vehicle registered to the account, exactly as the vehicle cloud sent it
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vehicle(Map<String, Value>);

impl Vehicle {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn id(&self) -> Option<VehicleId> {
        self.0.get("id").and_then(Value::as_i64)
    }

    pub fn vin(&self) -> Option<&str> {
        self.0.get("vin").and_then(Value::as_str)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl Deref for Vehicle {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Vehicle status report, exactly as the vehicle cloud sent it
///
/// Only the `doors`, `doorLocks` and `windows` flag groups are interpreted.
/// Missing groups and non-boolean flags count as not set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleStatus(Map<String, Value>);

impl VehicleStatus {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Boolean flags of one group, skipping anything that is not a bool
    pub fn flags<'a>(&'a self, group: &str) -> impl Iterator<Item = (&'a str, bool)> + 'a {
        self.0
            .get(group)
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|flags| flags.iter())
            .filter_map(|(name, value)| value.as_bool().map(|set| (name.as_str(), set)))
    }

    /// Set one flag, creating the group when needed
    pub fn set_flag(&mut self, group: &str, name: &str, set: bool) {
        let entry = self
            .0
            .entry(group.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(flags) = entry {
            flags.insert(name.to_string(), Value::Bool(set));
        }
    }

    fn any_set(&self, group: &str) -> bool {
        self.flags(group).any(|(_, set)| set)
    }

    pub fn any_door_open(&self) -> bool {
        self.any_set(DOORS)
    }

    pub fn any_door_unlocked(&self) -> bool {
        self.any_set(DOOR_LOCKS)
    }

    pub fn any_window_open(&self) -> bool {
        self.any_set(WINDOWS)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl Deref for VehicleStatus {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Remote command without a response payload
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VehicleCommand {
    LockDoors,
    UnlockDoors,
    HazardLightsOn,
    HazardLightsOff,
    StartEngine,
    StopEngine,
}

impl VehicleCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LockDoors => "lock_doors",
            Self::UnlockDoors => "unlock_doors",
            Self::HazardLightsOn => "hazard_lights_on",
            Self::HazardLightsOff => "hazard_lights_off",
            Self::StartEngine => "start_engine",
            Self::StopEngine => "stop_engine",
        }
    }
}

impl fmt::Display for VehicleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
