//! Door and window summary derived from a vehicle status report

use mazda_client::VehicleStatus;
use serde::{Deserialize, Serialize};

/// Aggregate door/window state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoorsStatus {
    pub doors_closed: bool,
    pub doors_locked: bool,
    pub windows_closed: bool,
}

impl Default for DoorsStatus {
    fn default() -> Self {
        Self {
            doors_closed: true,
            doors_locked: true,
            windows_closed: true,
        }
    }
}

impl From<&VehicleStatus> for DoorsStatus {
    fn from(status: &VehicleStatus) -> Self {
        let mut summary = Self::default();

        // An open door counts as unlocked; lock flags are not consulted then.
        if status.any_door_open() {
            summary.doors_closed = false;
            summary.doors_locked = false;
        } else if status.any_door_unlocked() {
            summary.doors_locked = false;
        }

        if status.any_window_open() {
            summary.windows_closed = false;
        }

        summary
    }
}
