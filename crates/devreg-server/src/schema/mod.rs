//! API schema types for request/response definitions.
//!
//! Types use serde derives for JSON serialization/deserialization. The same
//! [`devices::Device`] shape is what gets persisted in the store.

pub mod devices;
