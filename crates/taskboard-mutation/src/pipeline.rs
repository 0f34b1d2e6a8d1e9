//! Submission of task and project mutations.
//!
//! Every mutation follows the same path: validate locally, make one
//! transport call, and on success bump the store's refresh generation
//! exactly once. Nothing is applied to the snapshot directly; the board
//! reflects the change when the triggered reload completes. On failure the
//! caller's draft is untouched and no refresh is requested.

use std::sync::Arc;

use taskboard_core::{Project, Task, TaskStatus, UserId};
use taskboard_store::DataStore;
use taskboard_transport::{NewProject, RequestTransport, TransportError, api};
use tracing::{debug, info};

use crate::draft::{Field, TaskDraft, ValidationReport, check_references};

/// Banner text when the server gives no reason for a rejected task save.
const SAVE_FAILED: &str = "Failed to save task";

/// Failed mutation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// Rejected locally; no request was sent.
    #[error("invalid input: {0}")]
    Validation(ValidationReport),

    /// Rejected by the transport or the server.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SubmitError {
    /// Message for a dismissible banner.
    pub fn message(&self) -> String {
        match self {
            Self::Validation(report) => report.to_string(),
            Self::Transport(TransportError::RequestFailed(msg))
                if msg.trim().is_empty() || msg == TransportError::GENERIC_FAILURE =>
            {
                SAVE_FAILED.to_string()
            }
            Self::Transport(err) => err.display_message(SAVE_FAILED),
        }
    }

    /// Field errors, when the failure was local.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Validation(report) => Some(report),
            Self::Transport(_) => None,
        }
    }
}

/// Answer to a yes/no delete prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    /// User said yes.
    Confirmed,
    /// User said no.
    Declined,
}

impl From<bool> for Confirmation {
    fn from(yes: bool) -> Self {
        if yes { Self::Confirmed } else { Self::Declined }
    }
}

/// What a delete call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Removed on the server; a refresh was requested.
    Deleted,
    /// Declined by the user; nothing was sent.
    Cancelled,
}

/// Validated mutations against the task service.
#[derive(Clone, Debug)]
pub struct MutationPipeline {
    transport: RequestTransport,
    store: Arc<DataStore>,
}

impl MutationPipeline {
    /// Create a pipeline that refreshes `store` after every success.
    pub fn new(transport: RequestTransport, store: Arc<DataStore>) -> Self {
        Self { transport, store }
    }

    /// Store refreshed by this pipeline.
    pub fn store(&self) -> &Arc<DataStore> {
        &self.store
    }

    /// Create a task, or update `existing` when given.
    ///
    /// Returns the task echoed by the service, if any.
    #[tracing::instrument(skip_all, fields(task_id = existing.map(|t| t.id.get())))]
    pub async fn submit(
        &self,
        draft: &TaskDraft,
        existing: Option<&Task>,
    ) -> Result<Option<Task>, SubmitError> {
        let payload = draft.to_payload().map_err(SubmitError::Validation)?;

        let report = self
            .store
            .with_snapshot(|snapshot| check_references(&payload, snapshot));
        if !report.is_valid() {
            debug!(%report, "draft references unknown records");
            return Err(SubmitError::Validation(report));
        }

        let saved = match existing {
            Some(task) => api::tasks::update(&self.transport, task.id, &payload).await,
            None => api::tasks::create(&self.transport, &payload).await,
        }
        .inspect_err(|e| debug!(error = %e, "task save failed"))?;

        match existing {
            Some(task) => info!(task_id = %task.id, "task updated"),
            None => info!(task_id = ?saved.as_ref().map(|t| t.id.get()), "task created"),
        }
        let _ = self.store.request_refresh();
        Ok(saved)
    }

    /// Move `task` to another board column.
    ///
    /// Same as submitting the task's own draft with only `status` changed.
    pub async fn move_task(
        &self,
        task: &Task,
        status: TaskStatus,
    ) -> Result<Option<Task>, SubmitError> {
        let draft = TaskDraft {
            status,
            ..TaskDraft::from_task(task)
        };
        self.submit(&draft, Some(task)).await
    }

    /// Prompt text for [`delete`](Self::delete).
    pub fn delete_prompt(task: &Task) -> String {
        format!("Are you sure you want to delete \"{}\"?", task.title)
    }

    /// Delete `task` once the user confirmed.
    ///
    /// On failure the task stays in the snapshot.
    #[tracing::instrument(skip_all, fields(task_id = task.id.get()))]
    pub async fn delete(
        &self,
        task: &Task,
        confirmation: Confirmation,
    ) -> Result<DeleteOutcome, SubmitError> {
        if confirmation == Confirmation::Declined {
            debug!("delete declined");
            return Ok(DeleteOutcome::Cancelled);
        }
        api::tasks::delete(&self.transport, task.id)
            .await
            .inspect_err(|e| debug!(error = %e, "task delete failed"))?;
        info!("task deleted");
        let _ = self.store.request_refresh();
        Ok(DeleteOutcome::Deleted)
    }

    /// Create a project owned by `owner`.
    ///
    /// Returns the project echoed by the service, if any.
    #[tracing::instrument(skip_all, fields(owner = owner.get()))]
    pub async fn create_project(
        &self,
        name: &str,
        owner: UserId,
    ) -> Result<Option<Project>, SubmitError> {
        let name = name.trim();
        if name.is_empty() {
            let mut report = ValidationReport::default();
            report.insert(Field::Name, "Project name is required");
            return Err(SubmitError::Validation(report));
        }
        let project = api::projects::create(
            &self.transport,
            &NewProject {
                name: name.to_string(),
            },
            owner,
        )
        .await
        .inspect_err(|e| debug!(error = %e, "project create failed"))?;
        info!(project_id = ?project.as_ref().map(|p| p.id.get()), "project created");
        let _ = self.store.request_refresh();
        Ok(project)
    }

    /// Delete `project` once the user confirmed.
    ///
    /// If it was the active project, the next load falls back to the first
    /// remaining one.
    #[tracing::instrument(skip_all, fields(project_id = project.id.get()))]
    pub async fn delete_project(
        &self,
        project: &Project,
        confirmation: Confirmation,
    ) -> Result<DeleteOutcome, SubmitError> {
        if confirmation == Confirmation::Declined {
            return Ok(DeleteOutcome::Cancelled);
        }
        api::projects::delete(&self.transport, project.id).await?;
        info!("project deleted");
        let _ = self.store.request_refresh();
        Ok(DeleteOutcome::Deleted)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
