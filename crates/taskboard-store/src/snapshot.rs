//! Immutable view of the last successful load.

use taskboard_core::{Project, ProjectId, Task, TaskId, User, UserId};

/// Users, projects and tasks as of the last completed load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// All users, in server order.
    pub users: Vec<User>,
    /// All projects, in server order.
    pub projects: Vec<Project>,
    /// All tasks, in server order.
    pub tasks: Vec<Task>,
    /// Selected project; always an element of `projects` when set.
    pub active_project: Option<Project>,
    /// Refresh generation observed when the load that produced this began.
    pub generation: u64,
}

impl Snapshot {
    /// Look up a user by ID.
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Look up a project by ID.
    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Look up a task by ID.
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks of the active project, in server order. Empty when no project
    /// is active.
    pub fn active_tasks(&self) -> impl Iterator<Item = &Task> {
        let active = self.active_project.as_ref().map(|p| p.id);
        self.tasks
            .iter()
            .filter(move |t| Some(t.project_id) == active)
    }
}

/// Pick the active project for a freshly fetched collection.
///
/// Keeps the current selection (refreshed to the new copy) when its ID is
/// still present, otherwise falls back to the first project, or `None` for
/// an empty collection.
pub fn resolve_active_project(current: Option<&Project>, projects: &[Project]) -> Option<Project> {
    current
        .and_then(|cur| projects.iter().find(|p| p.id == cur.id))
        .or_else(|| projects.first())
        .cloned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
