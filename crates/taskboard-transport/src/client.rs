//! Uniform HTTP call wrapper for the task service.
//!
//! Every call:
//! - sends `Content-Type: application/json` and the session cookie
//! - succeeds with `None` on `204` (or any success without a JSON body)
//! - on `401`, broadcasts [`SessionSignals::invalidate`] and then fails
//!   with [`TransportError::Unauthorized`]
//! - on other non-2xx, reads the raw body as text first and extracts a
//!   message from `detail`/`message` when the text is JSON, otherwise fails
//!   with the generic `"Request failed"`

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::TransportError;
use crate::signal::SessionSignals;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Cookie-carrying JSON client bound to one service base URL.
#[derive(Clone, Debug)]
pub struct RequestTransport {
    client: reqwest::Client,
    base_url: String,
    signals: SessionSignals,
}

impl RequestTransport {
    /// Create a transport with its own cookie jar.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        signals: SessionSignals,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, base_url, signals))
    }

    /// Create a transport around an existing client.
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        signals: SessionSignals,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            signals,
        }
    }

    /// Base URL endpoints are appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The session-invalidated channel this transport emits on.
    pub fn signals(&self) -> &SessionSignals {
        &self.signals
    }

    /// Perform one call and return the decoded JSON body, if any.
    #[tracing::instrument(skip(self, body))]
    pub async fn call(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>, TransportError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self
            .client
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| TransportError::RequestFailed(format!("invalid request body: {e}")))?;
            request = request.body(bytes);
        }

        let response = request.send().await.map_err(|e| {
            debug!(error = %e, "request did not complete");
            TransportError::from(e)
        })?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if status == StatusCode::UNAUTHORIZED {
            let receivers = self.signals.invalidate(endpoint);
            warn!(endpoint, receivers, "session invalidated by server");
            return Err(TransportError::Unauthorized);
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));
        let text = response.text().await?;
        let has_json_body = is_json && !text.trim().is_empty();

        if !status.is_success() {
            let parsed = if has_json_body {
                serde_json::from_str::<Value>(&text).ok()
            } else {
                None
            };
            let message = error_message(parsed.as_ref());
            debug!(status = status.as_u16(), %message, "request rejected");
            return Err(TransportError::RequestFailed(message));
        }

        if !has_json_body {
            return Ok(None);
        }
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| TransportError::RequestFailed(format!("invalid response body: {e}")))
    }

    /// Call and decode a required JSON body into `T`.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<T, TransportError> {
        let value = self.call(method, endpoint, body).await?.ok_or_else(|| {
            TransportError::RequestFailed("invalid response body: empty".to_string())
        })?;
        serde_json::from_value(value)
            .map_err(|e| TransportError::RequestFailed(format!("invalid response body: {e}")))
    }

    /// `GET` and decode.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, TransportError> {
        self.fetch(Method::GET, endpoint, None).await
    }

    /// Send `body` with `method`, returning the raw response body if any.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<Option<Value>, TransportError> {
        let value = to_body(body)?;
        self.call(method, endpoint, Some(&value)).await
    }

    /// Send `body` with `method` and decode the response into `T`.
    pub async fn send_fetch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<T, TransportError> {
        let value = to_body(body)?;
        self.fetch(method, endpoint, Some(&value)).await
    }
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, TransportError> {
    serde_json::to_value(body)
        .map_err(|e| TransportError::RequestFailed(format!("invalid request body: {e}")))
}

/// Extract a human-readable reason from an error body.
///
/// Preference: `detail` string, `detail` list of `{msg}` objects (joined
/// with `"; "`), `message` string, then the generic failure text.
pub fn error_message(body: Option<&Value>) -> String {
    let Some(body) = body else {
        return TransportError::GENERIC_FAILURE.to_string();
    };

    match body.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => return detail.clone(),
        Some(Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if !msgs.is_empty() {
                return msgs.join("; ");
            }
        }
        _ => {}
    }

    match body.get("message") {
        Some(Value::String(message)) if !message.is_empty() => message.clone(),
        _ => TransportError::GENERIC_FAILURE.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
