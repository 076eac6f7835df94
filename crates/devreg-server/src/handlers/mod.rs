//! HTTP handler modules for the device API.
//!
//! Handlers parse requests, acquire a request-scoped [`DeviceService`],
//! delegate to it, and return JSON responses. No business logic lives in
//! handlers.
//!
//! [`DeviceService`]: crate::service::DeviceService

pub mod devices;
pub mod openapi;
