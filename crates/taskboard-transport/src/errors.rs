//! Transport error taxonomy.

/// Failure of a single call to the task service.
///
/// Every transport-level failure is normalized into one of these three
/// kinds. Local validation failures are a separate, purely client-side
/// kind and never appear here.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The service answered `401`: the session cookie is missing or expired.
    #[error("Unauthorized")]
    Unauthorized,

    /// The service rejected the request with a human-readable reason.
    #[error("{0}")]
    RequestFailed(String),

    /// No usable response (connection refused, timeout, broken body).
    #[error("network error: {0}")]
    NetworkError(String),
}

impl TransportError {
    /// Generic message for a rejected request without a readable reason.
    pub const GENERIC_FAILURE: &'static str = "Request failed";

    /// Message suitable for an inline banner, falling back to `fallback`
    /// when the server gave no reason.
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            Self::RequestFailed(msg) if msg.trim().is_empty() => fallback.to_string(),
            other => other.to_string(),
        }
    }

    /// Whether this error means the session is gone.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::NetworkError(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
