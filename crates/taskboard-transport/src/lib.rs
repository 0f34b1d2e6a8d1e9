//! # taskboard-transport
//!
//! HTTP plumbing between the taskboard client and the remote task service:
//!
//! - [`RequestTransport`]: JSON call wrapper with cookie credentials and
//!   error normalization into [`TransportError`]
//! - [`SessionSignals`]: process-wide "session invalidated" broadcast,
//!   emitted on every `401`
//! - [`api`]: typed wrappers for the `/auth`, `/users`, `/projects` and
//!   `/tasks` routes

#![deny(unsafe_code)]

pub mod api;
pub mod client;
pub mod errors;
pub mod signal;

pub use api::projects::NewProject;
pub use api::tasks::{TaskFilter, TaskPayload};
pub use api::users::NewUser;
pub use client::{DEFAULT_TIMEOUT, RequestTransport, error_message};
pub use errors::TransportError;
pub use signal::{SessionInvalidated, SessionSignals};

/// Re-exported so callers can name HTTP methods without depending on `reqwest`.
pub use reqwest::Method;
