//! Entity types mirroring the task service's JSON wire format.
//!
//! Field names are `snake_case` on the wire, matching the service. Unknown
//! fields are ignored so the client tolerates additive server changes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids::{ProjectId, TaskId, UserId};

/// A user account. Read-only from the client's perspective.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Creation timestamp as reported by the service.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A project grouping tasks and members.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Server-assigned ID.
    pub id: ProjectId,
    /// Project name.
    pub name: String,
    /// Users that belong to this project.
    #[serde(default, alias = "memberIds")]
    pub member_ids: Vec<UserId>,
}

/// Kanban column a task lives in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Pending,
    /// Being worked on.
    InProgress,
    /// Done.
    Completed,
}

impl TaskStatus {
    /// All statuses in board column order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Human-readable column title.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Task priority. Capitalized on the wire (`"Low"`, `"Normal"`, `"High"`);
/// lowercase is accepted when reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Low priority.
    #[serde(alias = "low")]
    Low,
    /// Default priority.
    #[default]
    #[serde(alias = "normal")]
    Normal,
    /// High priority.
    #[serde(alias = "high")]
    High,
}

impl Priority {
    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" | "low" => Ok(Self::Low),
            "Normal" | "normal" => Ok(Self::Normal),
            "High" | "high" => Ok(Self::High),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Error for an unrecognized status or priority string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown value: {0:?}")]
pub struct UnknownVariant(pub String);

/// A task on the board. The only entity the client mutates directly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned ID.
    pub id: TaskId,
    /// Short title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Board column.
    #[serde(default)]
    pub status: TaskStatus,
    /// Priority.
    #[serde(default)]
    pub priority: Priority,
    /// Assignee.
    pub user_id: UserId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Due timestamp (`YYYY-MM-DDTHH:MM:SS`), if any.
    #[serde(default)]
    pub due_date: Option<String>,
}

impl Task {
    /// Date part of `due_date` (`YYYY-MM-DD`), as shown in a date input.
    pub fn due_day(&self) -> Option<&str> {
        self.due_date
            .as_deref()
            .and_then(|d| d.split('T').next())
            .filter(|d| !d.is_empty())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn task_json() -> serde_json::Value {
        json!({
            "id": 11,
            "title": "Write docs",
            "description": null,
            "status": "in_progress",
            "priority": "High",
            "user_id": 3,
            "project_id": 7,
            "due_date": "2024-05-01T00:00:00",
            "created_at": "2024-04-01T09:30:00"
        })
    }

    #[test]
    fn task_deserializes_from_wire() {
        let task: Task = serde_json::from_value(task_json()).unwrap();
        assert_eq!(task.id, TaskId::new(11));
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.user_id, UserId::new(3));
        assert_eq!(task.project_id, ProjectId::new(7));
        assert!(task.description.is_none());
    }

    #[test]
    fn task_missing_optional_fields_default() {
        let task: Task = serde_json::from_value(json!({
            "id": 1, "title": "t", "user_id": 1, "project_id": 1
        }))
        .unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, Priority::Normal);
        assert!(task.due_date.is_none());
    }

    #[test]
    fn due_day_strips_time() {
        let task: Task = serde_json::from_value(task_json()).unwrap();
        assert_eq!(task.due_day(), Some("2024-05-01"));
    }

    #[test]
    fn due_day_none_when_absent_or_empty() {
        let mut task: Task = serde_json::from_value(task_json()).unwrap();
        task.due_date = None;
        assert_eq!(task.due_day(), None);
        task.due_date = Some(String::new());
        assert_eq!(task.due_day(), None);
    }

    #[test]
    fn status_wire_names() {
        for status in TaskStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, json!(status.as_str()));
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
    }

    #[test]
    fn status_labels_in_column_order() {
        let labels: Vec<_> = TaskStatus::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, ["Pending", "In Progress", "Completed"]);
    }

    #[test]
    fn unknown_status_rejected() {
        assert_matches!("done".parse::<TaskStatus>(), Err(UnknownVariant(v)) if v == "done");
    }

    #[test]
    fn priority_is_capitalized_on_wire() {
        assert_eq!(serde_json::to_value(Priority::Low).unwrap(), json!("Low"));
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn priority_reads_lowercase_like_from_str() {
        for raw in ["low", "normal", "high", "Low", "Normal", "High"] {
            let decoded: Priority = serde_json::from_value(json!(raw)).unwrap();
            assert_eq!(decoded, raw.parse::<Priority>().unwrap(), "{raw}");
        }
        let task: Task = serde_json::from_value(json!({
            "id": 1, "title": "t", "status": "pending", "priority": "high",
            "user_id": 1, "project_id": 1
        }))
        .unwrap();
        assert_eq!(task.priority, Priority::High);
        assert_eq!(serde_json::to_value(task.priority).unwrap(), json!("High"));
    }

    #[test]
    fn project_members_accept_both_spellings() {
        let a: Project =
            serde_json::from_value(json!({"id": 1, "name": "A", "member_ids": [1, 2]})).unwrap();
        let b: Project =
            serde_json::from_value(json!({"id": 1, "name": "A", "memberIds": [1, 2]})).unwrap();
        assert_eq!(a, b);
        let c: Project = serde_json::from_value(json!({"id": 2, "name": "B"})).unwrap();
        assert!(c.member_ids.is_empty());
    }

    #[test]
    fn user_snapshot() {
        let user = User {
            id: UserId::new(1),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            created_at: Some("2024-01-01T00:00:00".into()),
        };
        insta::assert_json_snapshot!(user, @r#"
        {
          "id": 1,
          "name": "Ada",
          "email": "ada@example.com",
          "created_at": "2024-01-01T00:00:00"
        }
        "#);
    }
}
