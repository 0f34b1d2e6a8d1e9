//! Task form model, local validation, and payload coercion.
//!
//! A draft holds exactly what a form holds: strings. [`validate`] is a pure
//! function of the draft. [`TaskDraft::to_payload`] turns a valid draft into
//! the wire payload: IDs become integers and a date-only due date becomes a
//! midnight timestamp (an empty due date becomes absent).

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use taskboard_core::{Priority, Project, ProjectId, Task, TaskStatus, UserId};
use taskboard_store::Snapshot;
use taskboard_transport::TaskPayload;

/// Form field an error is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Task title.
    Title,
    /// Project name.
    Name,
    /// Assignee.
    User,
    /// Owning project.
    Project,
    /// Due date.
    DueDate,
}

impl Field {
    /// Wire/form name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Name => "name",
            Self::User => "user_id",
            Self::Project => "project_id",
            Self::DueDate => "due_date",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field errors of a draft. Empty means valid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: BTreeMap<Field, String>,
}

impl ValidationReport {
    /// Whether there are no field errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error message for `field`, if any.
    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// All field errors, ordered by field.
    pub fn errors(&self) -> &BTreeMap<Field, String> {
        &self.errors
    }

    /// Number of field errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether the report is empty.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn insert(&mut self, field: Field, message: &str) {
        let _ = self.errors.entry(field).or_insert_with(|| message.to_string());
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, msg)| format!("{field}: {msg}"))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Form state for creating or editing a task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskDraft {
    /// Title input.
    pub title: String,
    /// Description input.
    pub description: String,
    /// Status select.
    pub status: TaskStatus,
    /// Priority select.
    pub priority: Priority,
    /// Assignee select value (empty when nothing is selected).
    pub user_id: String,
    /// Project select value (empty when nothing is selected).
    pub project_id: String,
    /// Date input (`YYYY-MM-DD`, or empty).
    pub due_date: String,
}

impl TaskDraft {
    /// Empty form for a new task, pre-selecting the first project.
    pub fn blank(projects: &[Project]) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            status: TaskStatus::Pending,
            priority: Priority::Normal,
            user_id: String::new(),
            project_id: projects.first().map(|p| p.id.to_string()).unwrap_or_default(),
            due_date: String::new(),
        }
    }

    /// Form pre-filled from an existing task.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status,
            priority: task.priority,
            user_id: task.user_id.to_string(),
            project_id: task.project_id.to_string(),
            due_date: task.due_day().unwrap_or_default().to_string(),
        }
    }

    /// Coerce a valid draft into the wire payload.
    pub fn to_payload(&self) -> Result<TaskPayload, ValidationReport> {
        let report = validate(self);
        // every parse failure here is already in the report
        let (Ok(user_id), Ok(project_id), Ok(due_date), true) = (
            self.user_id.parse::<UserId>(),
            self.project_id.parse::<ProjectId>(),
            normalize_due_date(&self.due_date),
            report.is_valid(),
        ) else {
            return Err(report);
        };
        Ok(TaskPayload {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            status: self.status,
            priority: self.priority,
            user_id,
            project_id,
            due_date,
        })
    }
}

/// Check a draft without consulting the server.
///
/// Required: non-blank title, an assignee, a project. IDs must be integers
/// and a non-empty due date must be a `YYYY-MM-DD` date.
pub fn validate(draft: &TaskDraft) -> ValidationReport {
    let mut report = ValidationReport::default();

    if draft.title.trim().is_empty() {
        report.insert(Field::Title, "Title is required");
    }

    if draft.user_id.trim().is_empty() {
        report.insert(Field::User, "Please assign a user");
    } else if draft.user_id.parse::<UserId>().is_err() {
        report.insert(Field::User, "Invalid user");
    }

    if draft.project_id.trim().is_empty() {
        report.insert(Field::Project, "Please select a project");
    } else if draft.project_id.parse::<ProjectId>().is_err() {
        report.insert(Field::Project, "Invalid project");
    }

    if normalize_due_date(&draft.due_date).is_err() {
        report.insert(Field::DueDate, "Invalid due date");
    }

    report
}

/// Check that the payload's assignee and project exist in `snapshot`.
pub fn check_references(payload: &TaskPayload, snapshot: &Snapshot) -> ValidationReport {
    let mut report = ValidationReport::default();
    if snapshot.user(payload.user_id).is_none() {
        report.insert(Field::User, "Selected user no longer exists");
    }
    if snapshot.project(payload.project_id).is_none() {
        report.insert(Field::Project, "Selected project no longer exists");
    }
    report
}

/// Turn a date input into a midnight timestamp.
///
/// `""` → `Ok(None)`, `"2024-05-01"` → `Ok(Some("2024-05-01T00:00:00"))`,
/// anything else is an error.
pub fn normalize_due_date(input: &str) -> Result<Option<String>, chrono::ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")?;
    Ok(Some(format!("{}T00:00:00", date.format("%Y-%m-%d"))))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
