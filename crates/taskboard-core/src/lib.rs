//! # taskboard-core
//!
//! Foundation types shared by every taskboard crate:
//!
//! - **Branded IDs**: `UserId`, `ProjectId`, `TaskId` as integer newtypes
//! - **Entities**: `User`, `Project`, `Task` with `TaskStatus` and `Priority`
//! - **Session**: the authenticated-identity state machine value
//! - **Logging**: `tracing` subscriber setup and test capture

#![deny(unsafe_code)]

pub mod ids;
pub mod logging;
pub mod session;
pub mod types;

pub use ids::{ParseIdError, ProjectId, TaskId, UserId};
pub use session::{Session, SessionStatus};
pub use types::{Priority, Project, Task, TaskStatus, UnknownVariant, User};
