//! `/users` routes.

use reqwest::Method;
use serde::Serialize;
use taskboard_core::{User, UserId};

use crate::client::RequestTransport;
use crate::errors::TransportError;

/// Payload for creating a collaborator account.
#[derive(Clone, Debug, Serialize)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Initial password, when the account can log in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// `GET /users`.
pub async fn list(transport: &RequestTransport) -> Result<Vec<User>, TransportError> {
    transport.get("/users").await
}

/// `GET /users/{id}`.
pub async fn get(transport: &RequestTransport, id: UserId) -> Result<User, TransportError> {
    transport.get(&format!("/users/{id}")).await
}

/// `POST /users`.
pub async fn create(transport: &RequestTransport, user: &NewUser) -> Result<User, TransportError> {
    transport.send_fetch(Method::POST, "/users", user).await
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
