//! # taskboard
//!
//! Composition root of the taskboard client. [`App`] owns exactly one
//! session gate, data store and mutation pipeline, wired together by
//! explicit injection:
//!
//! - the transport's session-invalidated signal is routed to the gate
//! - the store follows the gate's session (load on login, clear on logout)
//! - the pipeline refreshes the store after every successful mutation
//!
//! [`Board`] projects the store snapshot into Kanban columns.

#![deny(unsafe_code)]

pub mod app;
pub mod board;

pub use app::{App, Route};
pub use board::{Board, Card, Column};
