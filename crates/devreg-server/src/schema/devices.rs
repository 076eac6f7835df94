//! Device and command types.
//!
//! [`Device`] is both the HTTP body shape and the JSON stored under
//! `device:<id>`. [`Command`] is the body of `POST /devices/{id}/command`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// One managed device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Unique identifier, used verbatim in the store key.
    pub id: String,
    /// Free-form display label.
    pub name: String,
    /// Free-form category, e.g. "Router".
    #[serde(rename = "type")]
    pub kind: String,
    /// Usually "online" or "offline", but not restricted.
    pub status: String,
    /// Descriptions of applied commands, oldest first.
    pub command_history: Vec<String>,
}

impl Device {
    /// Checks the constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.id.is_empty() {
            return Err(ApiError::ValidationFailed(
                "device id must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Applies `command` in place and records it in the history.
    pub fn apply_command(&mut self, command: &Command) {
        match command {
            Command::Status(value) => {
                self.status = value.as_str().to_string();
                self.command_history.push(format!("Set status to {}", value));
            }
        }
    }
}

/// Status values a command may set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command sent to a device.
///
/// On the wire: `{"action": "status", "value": "online"}`. New actions are
/// added as new variants; unknown actions fail deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "lowercase")]
pub enum Command {
    Status(DeviceStatus),
}

/// Response from `POST /devices/{device_id}/command`.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    pub message: String,
    /// The device as persisted after the command.
    pub device: Device,
}

/// Response from `DELETE /devices/{device_id}`.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub msg: String,
}
