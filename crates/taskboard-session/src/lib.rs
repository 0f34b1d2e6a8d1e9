//! # taskboard-session
//!
//! The session gate tracks whether the client is authenticated and exposes
//! login, registration and logout. Protected views read its state through a
//! `watch` channel; nothing else writes it.

#![deny(unsafe_code)]

pub mod gate;

pub use gate::{AuthFailure, REGISTERED_MESSAGE, SessionGate};
