//! Session state machine.
//!
//! ```text
//! Unknown ──check_session──▶ Checking ──▶ Authenticated(user)
//!                                     └─▶ Unauthenticated
//! Authenticated ──logout / invalidate──▶ Unauthenticated
//! Unauthenticated ──login──▶ Authenticated(user)
//! ```
//!
//! Operations never fail across this boundary with a transport error: a
//! failed identity check resolves to `Unauthenticated`, a failed login
//! returns an [`AuthFailure`] carrying a display message, and logout always
//! ends unauthenticated.

use taskboard_core::{Session, SessionStatus, User};
use taskboard_transport::{RequestTransport, TransportError, api};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Confirmation shown after a successful registration.
pub const REGISTERED_MESSAGE: &str = "Account created successfully! Please sign in.";

/// Failed login or registration, with a message ready for display.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthFailure {
    /// Human-readable reason.
    pub message: String,
}

impl AuthFailure {
    fn from_transport(err: &TransportError, fallback: &str) -> Self {
        Self {
            message: err.display_message(fallback),
        }
    }
}

/// Owner of the [`Session`] value for one client instance.
#[derive(Debug)]
pub struct SessionGate {
    transport: RequestTransport,
    state: watch::Sender<Session>,
}

impl SessionGate {
    /// Create a gate in the `Unknown` state.
    pub fn new(transport: RequestTransport) -> Self {
        let (state, _) = watch::channel(Session::Unknown);
        Self { transport, state }
    }

    /// Current session value.
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Current status without the user.
    pub fn status(&self) -> SessionStatus {
        self.state.borrow().status()
    }

    /// Logged-in user, if any.
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    /// Observe every session transition.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Resolve the boot-time identity via `GET /auth/me`.
    ///
    /// Any failure, `Unauthorized` included, means "not logged in".
    #[tracing::instrument(skip_all)]
    pub async fn check_session(&self) -> SessionStatus {
        self.transition(Session::Checking);
        match api::auth::me(&self.transport).await {
            Ok(user) => {
                info!(user_id = %user.id, "session restored");
                self.transition(Session::Authenticated(user));
            }
            Err(e) => {
                debug!(error = %e, "no active session");
                self.transition(Session::Unauthenticated);
            }
        }
        self.status()
    }

    /// Log in. On failure the session is left as it was.
    #[tracing::instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthFailure> {
        match api::auth::login(&self.transport, email, password).await {
            Ok(user) => {
                info!(user_id = %user.id, "logged in");
                self.transition(Session::Authenticated(user.clone()));
                Ok(user)
            }
            Err(e) => {
                debug!(error = %e, "login rejected");
                Err(AuthFailure::from_transport(&e, "Login failed"))
            }
        }
    }

    /// Create an account. Does not log in; the caller must call
    /// [`login`](Self::login) afterwards.
    #[tracing::instrument(skip_all)]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), AuthFailure> {
        api::auth::register(&self.transport, name, email, password)
            .await
            .map_err(|e| {
                debug!(error = %e, "registration rejected");
                AuthFailure::from_transport(&e, "Registration failed")
            })
    }

    /// Log out. The remote call is best-effort; the local session always
    /// ends `Unauthenticated`.
    #[tracing::instrument(skip_all)]
    pub async fn logout(&self) {
        if let Err(e) = api::auth::logout(&self.transport).await {
            warn!(error = %e, "logout call failed, clearing session locally");
        }
        self.transition(Session::Unauthenticated);
    }

    /// Force `Unauthenticated`, e.g. on a session-invalidated signal.
    pub fn invalidate(&self) {
        if self.state.borrow().is_authenticated() {
            info!("session invalidated");
        }
        self.transition(Session::Unauthenticated);
    }

    fn transition(&self, next: Session) {
        let previous = self.state.send_replace(next);
        debug!(from = ?previous.status(), to = ?self.status(), "session transition");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
