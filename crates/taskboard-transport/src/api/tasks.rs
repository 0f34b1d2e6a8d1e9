//! `/tasks` routes.

use reqwest::Method;
use serde::Serialize;
use taskboard_core::{Priority, ProjectId, Task, TaskId, TaskStatus, UserId};

use super::decode_echo;
use crate::client::RequestTransport;
use crate::errors::TransportError;

/// Optional filters for `GET /tasks`. Only set fields reach the query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Assignee.
    pub user_id: Option<UserId>,
    /// Owning project.
    pub project_id: Option<ProjectId>,
    /// Board column.
    pub status: Option<TaskStatus>,
}

impl TaskFilter {
    /// Endpoint path including the query string.
    pub fn endpoint(&self) -> String {
        let mut params = Vec::new();
        if let Some(id) = self.user_id {
            params.push(format!("user_id={id}"));
        }
        if let Some(id) = self.project_id {
            params.push(format!("project_id={id}"));
        }
        if let Some(status) = self.status {
            params.push(format!("status={status}"));
        }
        if params.is_empty() {
            "/tasks".to_string()
        } else {
            format!("/tasks?{}", params.join("&"))
        }
    }
}

/// Body for task create (`POST`) and update (`PATCH`).
///
/// IDs serialize as integers; an absent `due_date` serializes as `null`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaskPayload {
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Board column.
    pub status: TaskStatus,
    /// Priority.
    pub priority: Priority,
    /// Assignee.
    pub user_id: UserId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Full timestamp (`YYYY-MM-DDTHH:MM:SS`) or absent.
    pub due_date: Option<String>,
}

/// `GET /tasks` with optional filters.
pub async fn list(
    transport: &RequestTransport,
    filter: &TaskFilter,
) -> Result<Vec<Task>, TransportError> {
    transport.get(&filter.endpoint()).await
}

/// `GET /tasks/{id}`.
pub async fn get(transport: &RequestTransport, id: TaskId) -> Result<Task, TransportError> {
    transport.get(&format!("/tasks/{id}")).await
}

/// `POST /tasks`. Returns the created task when the service echoes one.
pub async fn create(
    transport: &RequestTransport,
    payload: &TaskPayload,
) -> Result<Option<Task>, TransportError> {
    let echo = transport.send(Method::POST, "/tasks", payload).await?;
    Ok(decode_echo("/tasks", echo))
}

/// `PATCH /tasks/{id}`. Returns the updated task when the service echoes one.
pub async fn update(
    transport: &RequestTransport,
    id: TaskId,
    payload: &TaskPayload,
) -> Result<Option<Task>, TransportError> {
    let endpoint = format!("/tasks/{id}");
    let echo = transport.send(Method::PATCH, &endpoint, payload).await?;
    Ok(decode_echo(&endpoint, echo))
}

/// `DELETE /tasks/{id}`.
pub async fn delete(transport: &RequestTransport, id: TaskId) -> Result<(), TransportError> {
    let _ = transport
        .call(Method::DELETE, &format!("/tasks/{id}"), None)
        .await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
