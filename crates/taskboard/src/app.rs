//! Application wiring and route gating.

use std::sync::Arc;
use std::time::Duration;

use taskboard_core::{Session, SessionStatus};
use taskboard_mutation::MutationPipeline;
use taskboard_session::SessionGate;
use taskboard_settings::TaskboardSettings;
use taskboard_store::DataStore;
use taskboard_transport::{RequestTransport, SessionSignals, TransportError};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Top-level view selected by the session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Boot-time identity check still running.
    Loading,
    /// Not logged in.
    Login,
    /// Logged in; the Kanban board.
    Board,
}

impl Route {
    /// Route for a session value.
    pub fn for_session(session: &Session) -> Self {
        match session {
            Session::Unknown | Session::Checking => Self::Loading,
            Session::Unauthenticated => Self::Login,
            Session::Authenticated(_) => Self::Board,
        }
    }
}

/// One client instance: a session gate, a data store and a mutation
/// pipeline sharing a transport.
///
/// Must be created inside a Tokio runtime. Background tasks are aborted
/// when the app is dropped.
#[derive(Debug)]
pub struct App {
    transport: RequestTransport,
    gate: Arc<SessionGate>,
    store: Arc<DataStore>,
    pipeline: MutationPipeline,
    route: watch::Receiver<Route>,
    sync: Option<JoinHandle<()>>,
    background: Vec<JoinHandle<()>>,
}

impl App {
    /// Wire an app around `transport`.
    pub fn new(transport: RequestTransport) -> Self {
        let gate = Arc::new(SessionGate::new(transport.clone()));
        let store = Arc::new(DataStore::new(transport.clone(), gate.subscribe()));
        let pipeline = MutationPipeline::new(transport.clone(), Arc::clone(&store));

        let (route_tx, route) = watch::channel(Route::Loading);
        let background = vec![
            spawn_invalidation_listener(transport.signals(), Arc::clone(&gate)),
            spawn_router(gate.subscribe(), route_tx),
        ];

        Self {
            transport,
            gate,
            store,
            pipeline,
            route,
            sync: None,
            background,
        }
    }

    /// Wire an app from loaded settings.
    pub fn from_settings(settings: &TaskboardSettings) -> Result<Self, TransportError> {
        let transport = RequestTransport::new(
            settings.api.base_url.clone(),
            Duration::from_millis(settings.api.request_timeout_ms),
            SessionSignals::new(),
        )?;
        Ok(Self::new(transport))
    }

    /// Start keeping the store in sync with the session. Idempotent.
    pub fn start_sync(&mut self) {
        if self.sync.is_none() {
            self.sync = Some(self.store.spawn_sync());
        }
    }

    /// Start syncing and run the single boot-time session check.
    ///
    /// When the check authenticates, the sync loop performs the initial
    /// load.
    pub async fn boot(&mut self) -> SessionStatus {
        self.start_sync();
        self.gate.check_session().await
    }

    /// Shared transport.
    pub fn transport(&self) -> &RequestTransport {
        &self.transport
    }

    /// Session gate.
    pub fn gate(&self) -> &Arc<SessionGate> {
        &self.gate
    }

    /// Data store.
    pub fn store(&self) -> &Arc<DataStore> {
        &self.store
    }

    /// Mutation pipeline.
    pub fn pipeline(&self) -> &MutationPipeline {
        &self.pipeline
    }

    /// Route for the current session.
    pub fn route(&self) -> Route {
        Route::for_session(&self.gate.session())
    }

    /// Observe route changes.
    pub fn subscribe_route(&self) -> watch::Receiver<Route> {
        self.route.clone()
    }
}

impl Drop for App {
    fn drop(&mut self) {
        for handle in self.sync.iter().chain(&self.background) {
            handle.abort();
        }
    }
}

/// Force the gate to `Unauthenticated` on every session-invalidated signal.
fn spawn_invalidation_listener(signals: &SessionSignals, gate: Arc<SessionGate>) -> JoinHandle<()> {
    let mut rx = signals.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(signal) => {
                    if gate.session().is_authenticated() {
                        warn!(endpoint = %signal.endpoint, "session lost, returning to login");
                    }
                    gate.invalidate();
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "invalidation signals lagged");
                    gate.invalidate();
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

/// Publish the route for every session transition.
fn spawn_router(mut session: watch::Receiver<Session>, route: watch::Sender<Route>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let next = Route::for_session(&session.borrow_and_update());
            let changed = route.send_if_modified(|current| {
                let changed = *current != next;
                *current = next;
                changed
            });
            if changed {
                debug!(route = ?next, "route changed");
            }
            if session.changed().await.is_err() {
                break;
            }
        }
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use taskboard_core::{User, UserId};
    use taskboard_transport::DEFAULT_TIMEOUT;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app(server: &MockServer) -> App {
        let transport =
            RequestTransport::new(server.uri(), DEFAULT_TIMEOUT, SessionSignals::new()).unwrap();
        App::new(transport)
    }

    async fn wait_route(app: &App, want: Route) {
        let mut rx = app.subscribe_route();
        let _ = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|r| *r == want))
            .await
            .unwrap()
            .unwrap();
    }

    #[test]
    fn route_follows_session() {
        let user = User {
            id: UserId::new(1),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            created_at: None,
        };
        assert_eq!(Route::for_session(&Session::Unknown), Route::Loading);
        assert_eq!(Route::for_session(&Session::Checking), Route::Loading);
        assert_eq!(Route::for_session(&Session::Unauthenticated), Route::Login);
        assert_eq!(Route::for_session(&Session::Authenticated(user)), Route::Board);
    }

    #[tokio::test]
    async fn starts_loading() {
        let server = MockServer::start().await;
        let app = app(&server);
        assert_eq!(app.route(), Route::Loading);
        assert_eq!(*app.subscribe_route().borrow(), Route::Loading);
    }

    #[tokio::test]
    async fn boot_without_session_routes_to_login() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let mut app = app(&server);
        assert_eq!(app.boot().await, SessionStatus::Unauthenticated);
        wait_route(&app, Route::Login).await;
    }

    #[tokio::test]
    async fn invalidation_signal_forces_login() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 1, "name": "Ada", "email": "ada@example.com"})),
            )
            .mount(&server)
            .await;

        let app = app(&server);
        let _ = app.gate().check_session().await;
        wait_route(&app, Route::Board).await;

        let _ = app.transport().signals().invalidate("/tasks");
        wait_route(&app, Route::Login).await;
        assert_eq!(app.gate().status(), SessionStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn from_settings_uses_base_url() {
        let mut settings = TaskboardSettings::default();
        settings.api.base_url = "http://tasks.internal:9000/".into();
        let app = App::from_settings(&settings).unwrap();
        assert_eq!(app.transport().base_url(), "http://tasks.internal:9000");
    }
}
