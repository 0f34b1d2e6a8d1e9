//! `/projects` routes.

use reqwest::Method;
use serde::Serialize;
use taskboard_core::{Project, ProjectId, UserId};

use super::decode_echo;
use crate::client::RequestTransport;
use crate::errors::TransportError;

/// Payload for creating a project.
#[derive(Clone, Debug, Serialize)]
pub struct NewProject {
    /// Project name.
    pub name: String,
}

/// `GET /projects`. Order is whatever the service returns.
pub async fn list(transport: &RequestTransport) -> Result<Vec<Project>, TransportError> {
    transport.get("/projects").await
}

/// `GET /projects/{id}`.
pub async fn get(transport: &RequestTransport, id: ProjectId) -> Result<Project, TransportError> {
    transport.get(&format!("/projects/{id}")).await
}

/// `POST /projects?user_id={owner}`. Returns the created project when the
/// service echoes one.
pub async fn create(
    transport: &RequestTransport,
    project: &NewProject,
    owner: UserId,
) -> Result<Option<Project>, TransportError> {
    let echo = transport
        .send(Method::POST, &format!("/projects?user_id={owner}"), project)
        .await?;
    Ok(decode_echo("/projects", echo))
}

/// `DELETE /projects/{id}`.
pub async fn delete(transport: &RequestTransport, id: ProjectId) -> Result<(), TransportError> {
    let _ = transport
        .call(Method::DELETE, &format!("/projects/{id}"), None)
        .await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
