//! `/auth/*` routes.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use taskboard_core::User;

use crate::client::RequestTransport;
use crate::errors::TransportError;

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    user: User,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// `POST /auth/login`. On success the service sets the session cookie.
pub async fn login(
    transport: &RequestTransport,
    email: &str,
    password: &str,
) -> Result<User, TransportError> {
    let response: LoginResponse = transport
        .send_fetch(Method::POST, "/auth/login", &LoginRequest { email, password })
        .await?;
    Ok(response.user)
}

/// `POST /auth/register`. Creates the account without logging in.
pub async fn register(
    transport: &RequestTransport,
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), TransportError> {
    let _ = transport
        .send(
            Method::POST,
            "/auth/register",
            &RegisterRequest {
                name,
                email,
                password,
            },
        )
        .await?;
    Ok(())
}

/// `POST /auth/logout`.
pub async fn logout(transport: &RequestTransport) -> Result<(), TransportError> {
    let _ = transport.call(Method::POST, "/auth/logout", None).await?;
    Ok(())
}

/// `GET /auth/me`. Fails with `Unauthorized` when no session exists.
pub async fn me(transport: &RequestTransport) -> Result<User, TransportError> {
    transport.get("/auth/me").await
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_TIMEOUT, SessionSignals};
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn user_json() -> serde_json::Value {
        json!({"id": 1, "name": "Ada", "email": "ada@example.com", "created_at": null})
    }

    #[tokio::test]
    async fn login_unwraps_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({"email": "ada@example.com", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": user_json()})))
            .expect(1)
            .mount(&server)
            .await;

        let t = RequestTransport::new(server.uri(), DEFAULT_TIMEOUT, SessionSignals::new()).unwrap();
        let user = login(&t, "ada@example.com", "pw").await.unwrap();
        assert_eq!(user.name, "Ada");
    }

    #[tokio::test]
    async fn register_sends_all_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .and(body_json(json!({"name": "Ada", "email": "ada@example.com", "password": "pw"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(user_json()))
            .expect(1)
            .mount(&server)
            .await;

        let t = RequestTransport::new(server.uri(), DEFAULT_TIMEOUT, SessionSignals::new()).unwrap();
        register(&t, "Ada", "ada@example.com", "pw").await.unwrap();
    }

    #[tokio::test]
    async fn session_cookie_is_replayed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "session=abc; Path=/")
                    .set_body_json(json!({"user": user_json()})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .and(wiremock::matchers::header("cookie", "session=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .expect(1)
            .mount(&server)
            .await;

        let t = RequestTransport::new(server.uri(), DEFAULT_TIMEOUT, SessionSignals::new()).unwrap();
        let _ = login(&t, "ada@example.com", "pw").await.unwrap();
        let user = me(&t).await.unwrap();
        assert_eq!(user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn me_without_session_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let t = RequestTransport::new(server.uri(), DEFAULT_TIMEOUT, SessionSignals::new()).unwrap();
        assert_matches!(me(&t).await, Err(TransportError::Unauthorized));
    }

    #[tokio::test]
    async fn logout_accepts_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let t = RequestTransport::new(server.uri(), DEFAULT_TIMEOUT, SessionSignals::new()).unwrap();
        logout(&t).await.unwrap();
    }
}
