//! Typed wrappers for every route of the task service.
//!
//! Each function takes the shared [`RequestTransport`] and returns decoded
//! entities. Request payloads are defined next to the routes that accept
//! them.
//!
//! [`RequestTransport`]: crate::RequestTransport

pub mod auth;
pub mod projects;
pub mod tasks;
pub mod users;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Decode the entity a committed mutation echoes back.
///
/// A body that does not decode as `T` is logged and dropped.
fn decode_echo<T: DeserializeOwned>(endpoint: &str, echo: Option<Value>) -> Option<T> {
    let echo = echo?;
    serde_json::from_value(echo)
        .inspect_err(|e| warn!(endpoint, error = %e, "ignoring unrecognised response body"))
        .ok()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
