//! HTTP/JSON API server for device records kept in a key-value store.
//!
//! Provides five REST operations (list, create, fetch, delete, send command)
//! over device records stored under `device:<id>` keys. This crate contains
//! the server framework, API schema types, error handling, configuration and
//! route definitions; persistence lives in `devreg-storage`.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
