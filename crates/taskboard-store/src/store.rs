//! Data store with refresh-generation driven re-synchronization.
//!
//! - [`DataStore::load`] fetches users, projects and tasks concurrently and
//!   replaces the snapshot only when all three succeed. Loads run only while
//!   the session is authenticated.
//! - [`DataStore::request_refresh`] bumps the refresh generation; the sync
//!   loop started by [`DataStore::spawn_sync`] answers every bump with a
//!   fresh load.
//! - The snapshot is written when a load *completes*, so with overlapping
//!   loads the last one to finish wins. A load only lands if the user it
//!   started under is still the logged-in user.

use std::sync::Arc;

use parking_lot::RwLock;
use taskboard_core::{Project, Session, UserId};
use taskboard_transport::{RequestTransport, TaskFilter, TransportError, api};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::snapshot::{Snapshot, resolve_active_project};

/// Result of a [`DataStore::load`] that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The snapshot was replaced.
    Loaded,
    /// Not authenticated, or the session changed hands during the fetch;
    /// nothing changed.
    Skipped,
}

/// Local view of the remote users, projects and tasks.
#[derive(Debug)]
pub struct DataStore {
    transport: RequestTransport,
    session: watch::Receiver<Session>,
    snapshot: RwLock<Snapshot>,
    generation: watch::Sender<u64>,
    version: watch::Sender<u64>,
}

impl DataStore {
    /// Create an empty store gated on `session`.
    pub fn new(transport: RequestTransport, session: watch::Receiver<Session>) -> Self {
        let (generation, _) = watch::channel(0);
        let (version, _) = watch::channel(0);
        Self {
            transport,
            session,
            snapshot: RwLock::new(Snapshot::default()),
            generation,
            version,
        }
    }

    /// Clone of the current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.read().clone()
    }

    /// Read the snapshot without cloning it.
    pub fn with_snapshot<R>(&self, f: impl FnOnce(&Snapshot) -> R) -> R {
        f(&self.snapshot.read())
    }

    /// Selected project.
    pub fn active_project(&self) -> Option<Project> {
        self.snapshot.read().active_project.clone()
    }

    /// Current refresh generation.
    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    /// Observe refresh requests.
    pub fn subscribe_refresh(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    /// Observe snapshot replacements (loads and clears).
    pub fn subscribe_snapshot(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Ask every subscriber to re-fetch. Returns the new generation.
    pub fn request_refresh(&self) -> u64 {
        self.generation.send_modify(|g| *g += 1);
        let generation = self.generation();
        debug!(generation, "refresh requested");
        generation
    }

    /// Set the active project to the snapshot's copy of `project`.
    ///
    /// Returns `false` and leaves the selection alone when no project with
    /// that ID is in the current collection.
    pub fn select_project(&self, project: &Project) -> bool {
        let mut snapshot = self.snapshot.write();
        let Some(live) = snapshot.project(project.id).cloned() else {
            debug!(project_id = %project.id, "ignoring selection of unknown project");
            return false;
        };
        snapshot.active_project = Some(live);
        drop(snapshot);
        self.bump_version();
        true
    }

    /// Fetch users, projects and tasks and replace the snapshot.
    ///
    /// On failure the previous snapshot stays in place and the error is
    /// logged and returned. A `401` is additionally handled by the
    /// session-invalidated signal.
    #[tracing::instrument(skip_all, fields(generation = self.generation()))]
    pub async fn load(&self) -> Result<LoadOutcome, TransportError> {
        let Some(owner) = self.session_owner() else {
            debug!("not authenticated, skipping load");
            return Ok(LoadOutcome::Skipped);
        };

        let generation = self.generation();
        let all_tasks = TaskFilter::default();
        let fetched = tokio::try_join!(
            api::users::list(&self.transport),
            api::projects::list(&self.transport),
            api::tasks::list(&self.transport, &all_tasks),
        );
        let (users, projects, tasks) = match fetched {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, generation, "refresh failed, keeping previous snapshot");
                return Err(e);
            }
        };

        if self.session_owner() != Some(owner) {
            debug!(user_id = %owner, "session changed during load, discarding result");
            return Ok(LoadOutcome::Skipped);
        }

        let mut snapshot = self.snapshot.write();
        let active_project = resolve_active_project(snapshot.active_project.as_ref(), &projects);
        info!(
            users = users.len(),
            projects = projects.len(),
            tasks = tasks.len(),
            generation,
            "snapshot loaded"
        );
        *snapshot = Snapshot {
            users,
            projects,
            tasks,
            active_project,
            generation,
        };
        drop(snapshot);
        self.bump_version();
        Ok(LoadOutcome::Loaded)
    }

    /// Drop all data, e.g. after logout.
    pub fn clear(&self) {
        *self.snapshot.write() = Snapshot::default();
        self.bump_version();
        debug!("snapshot cleared");
    }

    /// Start the background loop that keeps the snapshot in sync.
    ///
    /// - each refresh generation bump triggers a load
    /// - becoming (or re-entering) authenticated triggers a load
    /// - leaving the authenticated state, or switching to another user,
    ///   clears the snapshot; passing through `Checking` before the first
    ///   login does not
    ///
    /// Each load runs as its own task and is never cancelled.
    pub fn spawn_sync(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        let mut refresh = self.generation.subscribe();
        let mut session = self.session.clone();
        let mut owner = current_owner(&session.borrow_and_update());

        tokio::spawn(async move {
            if owner.is_some() {
                store.spawn_load();
            }
            loop {
                tokio::select! {
                    changed = refresh.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let _ = *refresh.borrow_and_update();
                        store.spawn_load();
                    }
                    changed = session.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let now = current_owner(&session.borrow_and_update());
                        if owner.is_some() && now != owner {
                            store.clear();
                        }
                        if now.is_some() {
                            store.spawn_load();
                        }
                        owner = now;
                    }
                }
            }
        })
    }

    fn session_owner(&self) -> Option<UserId> {
        current_owner(&self.session.borrow())
    }

    fn spawn_load(self: &Arc<Self>) {
        let store = Arc::clone(self);
        drop(tokio::spawn(async move {
            // failures are logged inside load
            let _ = store.load().await;
        }));
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

fn current_owner(session: &Session) -> Option<UserId> {
    session.user().map(|u| u.id)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use assert_matches::assert_matches;
    use serde_json::json;
    use taskboard_core::logging::capture_logs;
    use taskboard_core::{ProjectId, User, UserId};
    use taskboard_transport::{DEFAULT_TIMEOUT, SessionSignals};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ada() -> User {
        User {
            id: UserId::new(1),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            created_at: None,
        }
    }

    fn bo() -> User {
        User {
            id: UserId::new(2),
            name: "Bo".into(),
            email: "bo@example.com".into(),
            created_at: None,
        }
    }

    fn store_for(server: &MockServer, session: Session) -> (DataStore, watch::Sender<Session>) {
        let transport =
            RequestTransport::new(server.uri(), DEFAULT_TIMEOUT, SessionSignals::new()).unwrap();
        let (tx, rx) = watch::channel(session);
        (DataStore::new(transport, rx), tx)
    }

    async fn mount_list(server: &MockServer, route: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    async fn mount_once(server: &MockServer, route: &str, body: serde_json::Value, delay_ms: u64) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(body)
                    .set_delay(Duration::from_millis(delay_ms)),
            )
            .up_to_n_times(1)
            .mount(server)
            .await;
    }

    async fn mount_basics(server: &MockServer) {
        mount_list(server, "/users", json!([{"id": 1, "name": "Ada", "email": "ada@example.com"}])).await;
        mount_list(server, "/tasks", json!([
            {"id": 10, "title": "a", "status": "pending", "priority": "Low", "user_id": 1, "project_id": 1},
            {"id": 11, "title": "b", "status": "completed", "priority": "High", "user_id": 1, "project_id": 2}
        ]))
        .await;
    }

    fn project_ids(snapshot: &Snapshot) -> Vec<i64> {
        snapshot.projects.iter().map(|p| p.id.get()).collect()
    }

    #[tokio::test]
    async fn load_populates_and_defaults_active_project() {
        let server = MockServer::start().await;
        mount_basics(&server).await;
        mount_list(&server, "/projects", json!([{"id": 1, "name": "A"}, {"id": 2, "name": "B"}])).await;

        let (store, _tx) = store_for(&server, Session::Authenticated(ada()));
        assert_eq!(store.load().await.unwrap(), LoadOutcome::Loaded);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.users.len(), 1);
        assert_eq!(project_ids(&snapshot), [1, 2]);
        assert_eq!(snapshot.tasks.len(), 2);
        assert_eq!(snapshot.active_project.map(|p| p.id), Some(ProjectId::new(1)));
    }

    #[tokio::test]
    async fn load_skipped_when_unauthenticated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let (store, _tx) = store_for(&server, Session::Unauthenticated);
        assert_eq!(store.load().await.unwrap(), LoadOutcome::Skipped);
        assert_eq!(store.snapshot(), Snapshot::default());
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_snapshot() {
        let server = MockServer::start().await;
        mount_basics(&server).await;
        mount_once(&server, "/projects", json!([{"id": 1, "name": "A"}]), 0).await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "db down"})))
            .mount(&server)
            .await;

        let (store, _tx) = store_for(&server, Session::Authenticated(ada()));
        let _ = store.load().await.unwrap();
        let before = store.snapshot();

        let (logs, _guard) = capture_logs();
        let err = store.load().await.unwrap_err();
        assert_eq!(err, TransportError::RequestFailed("db down".into()));
        assert_eq!(store.snapshot(), before);
        assert!(logs.has_event(tracing::Level::WARN, "refresh failed"));
    }

    #[tokio::test]
    async fn vanished_active_project_resets_to_first() {
        let server = MockServer::start().await;
        mount_basics(&server).await;
        mount_once(&server, "/projects", json!([{"id": 1, "name": "A"}, {"id": 2, "name": "B"}]), 0).await;
        mount_list(&server, "/projects", json!([{"id": 1, "name": "A"}])).await;

        let (store, _tx) = store_for(&server, Session::Authenticated(ada()));
        let _ = store.load().await.unwrap();
        let second = store.snapshot().projects[1].clone();
        assert!(store.select_project(&second));
        assert_eq!(store.active_project().map(|p| p.id), Some(ProjectId::new(2)));

        let _ = store.load().await.unwrap();
        assert_eq!(store.active_project().map(|p| p.id), Some(ProjectId::new(1)));
    }

    #[tokio::test]
    async fn empty_project_list_clears_active() {
        let server = MockServer::start().await;
        mount_basics(&server).await;
        mount_once(&server, "/projects", json!([{"id": 1, "name": "A"}]), 0).await;
        mount_list(&server, "/projects", json!([])).await;

        let (store, _tx) = store_for(&server, Session::Authenticated(ada()));
        let _ = store.load().await.unwrap();
        assert!(store.active_project().is_some());
        let _ = store.load().await.unwrap();
        assert!(store.active_project().is_none());
    }

    #[tokio::test]
    async fn select_unknown_project_is_ignored() {
        let server = MockServer::start().await;
        mount_basics(&server).await;
        mount_list(&server, "/projects", json!([{"id": 1, "name": "A"}])).await;

        let (store, _tx) = store_for(&server, Session::Authenticated(ada()));
        let _ = store.load().await.unwrap();
        let stale = Project {
            id: ProjectId::new(99),
            name: "gone".into(),
            member_ids: Vec::new(),
        };
        assert!(!store.select_project(&stale));
        assert_eq!(store.active_project().map(|p| p.id), Some(ProjectId::new(1)));
    }

    #[tokio::test]
    async fn last_completed_load_wins() {
        let server = MockServer::start().await;
        mount_basics(&server).await;
        // first request is slow, second is fast
        mount_once(&server, "/projects", json!([{"id": 1, "name": "slow"}]), 400).await;
        mount_once(&server, "/projects", json!([{"id": 2, "name": "fast"}]), 0).await;

        let (store, _tx) = store_for(&server, Session::Authenticated(ada()));
        let (first, second) = tokio::join!(store.load(), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            store.load().await
        });
        assert_matches!(first, Ok(LoadOutcome::Loaded));
        assert_matches!(second, Ok(LoadOutcome::Loaded));

        assert_eq!(project_ids(&store.snapshot()), [1]);
    }

    #[tokio::test]
    async fn load_discarded_if_session_ends_midway() {
        let server = MockServer::start().await;
        mount_basics(&server).await;
        mount_once(&server, "/projects", json!([{"id": 1, "name": "A"}]), 200).await;

        let (store, tx) = store_for(&server, Session::Authenticated(ada()));
        let (outcome, ()) = tokio::join!(store.load(), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = tx.send_replace(Session::Unauthenticated);
        });
        assert_eq!(outcome.unwrap(), LoadOutcome::Skipped);
        assert!(store.snapshot().projects.is_empty());
    }

    #[tokio::test]
    async fn load_from_previous_account_is_discarded() {
        let server = MockServer::start().await;
        mount_basics(&server).await;
        mount_once(&server, "/projects", json!([{"id": 1, "name": "A-private"}]), 300).await;
        mount_list(&server, "/projects", json!([{"id": 2, "name": "B"}])).await;

        let (store, tx) = store_for(&server, Session::Authenticated(ada()));
        let (stale, fresh) = tokio::join!(store.load(), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = tx.send_replace(Session::Unauthenticated);
            store.clear();
            let _ = tx.send_replace(Session::Authenticated(bo()));
            store.load().await
        });
        assert_eq!(fresh.unwrap(), LoadOutcome::Loaded);
        assert_eq!(stale.unwrap(), LoadOutcome::Skipped);
        assert_eq!(project_ids(&store.snapshot()), [2]);
    }

    #[tokio::test]
    async fn sync_loop_clears_when_user_switches() {
        let server = MockServer::start().await;
        mount_basics(&server).await;
        mount_once(&server, "/projects", json!([{"id": 1, "name": "A-private"}]), 0).await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"id": 2, "name": "B"}]))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;

        let (store, tx) = store_for(&server, Session::Authenticated(ada()));
        let store = Arc::new(store);
        let mut version = store.subscribe_snapshot();
        let handle = store.spawn_sync();
        let _ = tokio::time::timeout(Duration::from_secs(5), version.wait_for(|v| *v >= 1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(project_ids(&store.snapshot()), [1]);

        let _ = tx.send_replace(Session::Authenticated(bo()));
        let _ = tokio::time::timeout(Duration::from_secs(5), version.wait_for(|v| *v >= 2))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(store.snapshot(), Snapshot::default());

        let _ = tokio::time::timeout(Duration::from_secs(5), version.wait_for(|v| *v >= 3))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(project_ids(&store.snapshot()), [2]);

        handle.abort();
    }

    #[tokio::test]
    async fn request_refresh_increments_generation() {
        let server = MockServer::start().await;
        let (store, _tx) = store_for(&server, Session::Unauthenticated);
        let mut rx = store.subscribe_refresh();
        assert_eq!(store.generation(), 0);
        assert_eq!(store.request_refresh(), 1);
        assert_eq!(store.request_refresh(), 2);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 2);
    }

    #[tokio::test]
    async fn sync_loop_loads_on_refresh_and_clears_on_logout() {
        let server = MockServer::start().await;
        mount_basics(&server).await;
        mount_once(&server, "/projects", json!([{"id": 1, "name": "A"}]), 0).await;
        mount_list(&server, "/projects", json!([{"id": 1, "name": "A"}, {"id": 3, "name": "C"}])).await;

        let (store, tx) = store_for(&server, Session::Authenticated(ada()));
        let store = Arc::new(store);
        let mut version = store.subscribe_snapshot();
        let handle = store.spawn_sync();

        // initial load
        let _ = tokio::time::timeout(Duration::from_secs(5), version.wait_for(|v| *v >= 1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(project_ids(&store.snapshot()), [1]);

        let _ = store.request_refresh();
        let _ = tokio::time::timeout(Duration::from_secs(5), version.wait_for(|v| *v >= 2))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(project_ids(&store.snapshot()), [1, 3]);

        let _ = tx.send_replace(Session::Unauthenticated);
        let _ = tokio::time::timeout(Duration::from_secs(5), version.wait_for(|v| *v >= 3))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(store.snapshot(), Snapshot::default());

        handle.abort();
    }
}
