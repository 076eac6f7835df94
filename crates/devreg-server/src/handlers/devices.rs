//! Device handlers (list, create, get, delete, command).

use axum::extract::{Path, State};
use axum::Json;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::schema::devices::{Command, CommandResponse, DeleteResponse, Device};
use crate::service::DeviceService;
use crate::state::AppState;

/// Lists all devices.
///
/// `GET /devices`
pub async fn list_devices(
    State(state): State<AppState>,
) -> Result<Json<Vec<Device>>, ApiError> {
    let mut service = DeviceService::acquire(state.store.as_ref()).await?;
    let devices = service.list_devices().await?;
    Ok(Json(devices))
}

/// Creates (or replaces) a device and echoes it back.
///
/// `POST /devices`
pub async fn create_device(
    State(state): State<AppState>,
    ApiJson(device): ApiJson<Device>,
) -> Result<Json<Device>, ApiError> {
    let mut service = DeviceService::acquire(state.store.as_ref()).await?;
    let device = service.create_device(device).await?;
    Ok(Json(device))
}

/// `GET /devices/{device_id}`
pub async fn get_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<Json<Device>, ApiError> {
    let mut service = DeviceService::acquire(state.store.as_ref()).await?;
    let device = service.get_device(&device_id).await?;
    Ok(Json(device))
}

/// `DELETE /devices/{device_id}`
pub async fn delete_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let mut service = DeviceService::acquire(state.store.as_ref()).await?;
    service.delete_device(&device_id).await?;
    Ok(Json(DeleteResponse {
        msg: format!("Device {} deleted", device_id),
    }))
}

/// Applies a command to a device.
///
/// `POST /devices/{device_id}/command`
pub async fn send_command(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    ApiJson(command): ApiJson<Command>,
) -> Result<Json<CommandResponse>, ApiError> {
    let mut service = DeviceService::acquire(state.store.as_ref()).await?;
    let device = service.send_command(&device_id, &command).await?;
    Ok(Json(CommandResponse {
        message: format!("Command sent to device {}", device_id),
        device,
    }))
}
