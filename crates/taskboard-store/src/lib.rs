//! # taskboard-store
//!
//! The data store keeps the client's view of users, projects and tasks and
//! the active project. It is re-synchronized wholesale: every refresh
//! request re-fetches everything and replaces the snapshot, there is no
//! incremental merge path.

#![deny(unsafe_code)]

pub mod snapshot;
pub mod store;

pub use snapshot::{Snapshot, resolve_active_project};
pub use store::{DataStore, LoadOutcome};
