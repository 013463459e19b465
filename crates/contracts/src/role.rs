//! DeviceRole - which side of the bilateral pair a log belongs to

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timing role of a device.
///
/// The leader anchors the phase reference; the follower is measured against
/// it. Firmware logs call these roles `SERVER` and `CLIENT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceRole {
    Leader,
    Follower,
}

impl DeviceRole {
    /// Lowercase name used in logs and CLI arguments
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceRole::Leader => "leader",
            DeviceRole::Follower => "follower",
        }
    }

    /// Map a firmware role label (`SERVER` / `CLIENT`) to a role
    pub fn from_firmware_label(label: &str) -> Option<Self> {
        match label.to_ascii_uppercase().as_str() {
            "SERVER" => Some(DeviceRole::Leader),
            "CLIENT" => Some(DeviceRole::Follower),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "leader" | "server" => Ok(DeviceRole::Leader),
            "follower" | "client" => Ok(DeviceRole::Follower),
            other => Err(format!("unknown device role: {other}")),
        }
    }
}
