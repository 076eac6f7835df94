//! DeviceService: the device operations behind the HTTP handlers.
//!
//! A [`DeviceService`] owns exactly one store connection, acquired when the
//! request starts and released when the service is dropped. Handlers stay
//! thin wrappers that delegate to these methods.
//!
//! Each device lives under the key `device:<id>` as its JSON encoding. There
//! is no secondary index: listing scans `device:*`.
//!
//! `send_command` is a plain read-modify-write. Two commands racing on the
//! same device can lose one history entry; the store's per-key atomicity is
//! the only guarantee.

use devreg_storage::{KvBackend, KvConnection};

use crate::error::ApiError;
use crate::schema::devices::{Command, Device};

/// Key prefix shared by every device record.
pub const DEVICE_KEY_PREFIX: &str = "device:";

/// Store key for the device with `id`.
pub fn device_key(id: &str) -> String {
    format!("{}{}", DEVICE_KEY_PREFIX, id)
}

/// Glob matching every device key.
pub fn device_key_pattern() -> String {
    format!("{}*", DEVICE_KEY_PREFIX)
}

/// Device operations over a single, request-scoped store connection.
pub struct DeviceService {
    conn: Box<dyn KvConnection>,
}

impl DeviceService {
    /// Acquires a connection from `backend` for the lifetime of the service.
    pub async fn acquire(backend: &dyn KvBackend) -> Result<Self, ApiError> {
        let conn = backend.connect().await?;
        tracing::debug!(backend = backend.name(), "acquired store connection");
        Ok(DeviceService { conn })
    }

    /// Returns every stored device, in no particular order.
    ///
    /// Keys that disappear between the scan and the read are skipped.
    pub async fn list_devices(&mut self) -> Result<Vec<Device>, ApiError> {
        let keys = self.conn.keys(&device_key_pattern()).await?;
        let mut devices = Vec::with_capacity(keys.len());

        for key in keys {
            match self.conn.get(&key).await? {
                Some(raw) => devices.push(decode(&key, &raw)?),
                None => tracing::debug!(%key, "key vanished during listing"),
            }
        }

        Ok(devices)
    }

    /// Stores `device`, replacing any record with the same id.
    pub async fn create_device(&mut self, device: Device) -> Result<Device, ApiError> {
        device.validate()?;
        self.put(&device).await?;
        tracing::info!(device_id = %device.id, "device stored");
        Ok(device)
    }

    /// Fetches the device with `id`.
    pub async fn get_device(&mut self, id: &str) -> Result<Device, ApiError> {
        let key = device_key(id);
        match self.conn.get(&key).await? {
            Some(raw) => decode(&key, &raw),
            None => Err(ApiError::device_not_found()),
        }
    }

    /// Removes the device with `id`. Missing devices are reported as not found.
    pub async fn delete_device(&mut self, id: &str) -> Result<(), ApiError> {
        let key = device_key(id);
        if self.conn.get(&key).await?.is_none() {
            return Err(ApiError::device_not_found());
        }

        self.conn.delete(&key).await?;
        tracing::info!(device_id = %id, "device deleted");
        Ok(())
    }

    /// Applies `command` to the device with `id` and writes the whole record back.
    pub async fn send_command(
        &mut self,
        id: &str,
        command: &Command,
    ) -> Result<Device, ApiError> {
        let mut device = self.get_device(id).await?;
        device.apply_command(command);
        self.conn.set(&device_key(id), &encode(&device)?).await?;

        tracing::info!(device_id = %id, status = %device.status, "command applied");
        Ok(device)
    }

    async fn put(&mut self, device: &Device) -> Result<(), ApiError> {
        let raw = encode(device)?;
        self.conn.set(&device_key(&device.id), &raw).await?;
        Ok(())
    }
}

fn encode(device: &Device) -> Result<String, ApiError> {
    serde_json::to_string(device)
        .map_err(|e| ApiError::InternalError(format!("failed to encode device: {}", e)))
}

fn decode(key: &str, raw: &str) -> Result<Device, ApiError> {
    serde_json::from_str(raw).map_err(|e| {
        tracing::warn!(%key, error = %e, "stored device record is corrupt");
        ApiError::InternalError(format!("corrupt record at {}: {}", key, e))
    })
}
