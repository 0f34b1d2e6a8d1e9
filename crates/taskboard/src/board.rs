//! Kanban projection of the store snapshot.

use std::fmt;

use taskboard_core::{Project, Task, TaskStatus};
use taskboard_store::Snapshot;

/// A task with its assignee's display name resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    /// The task.
    pub task: Task,
    /// Assignee name, if the user is still known.
    pub assignee: Option<String>,
}

/// One status column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    /// Status shared by every card in the column.
    pub status: TaskStatus,
    /// Cards in server order.
    pub cards: Vec<Card>,
}

/// The active project's tasks split into Pending, In Progress and Completed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    /// Project on display, `None` when there are no projects.
    pub active: Option<Project>,
    /// Columns in [`TaskStatus::ALL`] order.
    pub columns: Vec<Column>,
}

impl Board {
    /// Project `snapshot` onto the board.
    pub fn project(snapshot: &Snapshot) -> Self {
        let columns = TaskStatus::ALL
            .iter()
            .map(|&status| Column {
                status,
                cards: snapshot
                    .active_tasks()
                    .filter(|t| t.status == status)
                    .map(|task| Card {
                        task: task.clone(),
                        assignee: snapshot.user(task.user_id).map(|u| u.name.clone()),
                    })
                    .collect(),
            })
            .collect();
        Self {
            active: snapshot.active_project.clone(),
            columns,
        }
    }

    /// Column for `status`.
    pub fn column(&self, status: TaskStatus) -> Option<&Column> {
        self.columns.iter().find(|c| c.status == status)
    }

    /// Total cards across all columns.
    pub fn len(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }

    /// Whether the board shows no cards.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(project) = &self.active else {
            return writeln!(f, "No projects yet");
        };
        writeln!(f, "{} (#{})", project.name, project.id)?;
        for column in &self.columns {
            writeln!(f, "== {} ({}) ==", column.status.label(), column.cards.len())?;
            for card in &column.cards {
                let task = &card.task;
                write!(f, "  #{} {} [{}]", task.id, task.title, task.priority)?;
                if let Some(name) = &card.assignee {
                    write!(f, " @{name}")?;
                }
                if let Some(day) = task.due_day() {
                    write!(f, " due {day}")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
