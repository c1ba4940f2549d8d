//! View projection: filters, display records, and aggregate counts.
//!
//! Everything here is a pure function of a task slice. Nothing in this
//! module mutates tasks or touches storage.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::task::{Priority, Task, TaskId};

/// Which subset of the collection is displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Pending,
    Completed,
    High,
}

impl Filter {
    pub const ALL: [Filter; 4] = [Filter::All, Filter::Pending, Filter::Completed, Filter::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Pending => "pending",
            Filter::Completed => "completed",
            Filter::High => "high",
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Pending => !task.completed,
            Filter::Completed => task.completed,
            Filter::High => task.priority == Priority::High,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "pending" => Ok(Filter::Pending),
            "completed" => Ok(Filter::Completed),
            "high" | "high-priority" => Ok(Filter::High),
            other => Err(Error::InvalidArgument(format!(
                "invalid filter '{other}': must be all, pending, completed, or high"
            ))),
        }
    }
}

/// Lazily yield the tasks matching `filter`, in collection order
///
/// The iterator is `Clone`, so a projection can be walked more than once.
pub fn filtered_view(
    tasks: &[Task],
    filter: Filter,
) -> impl Iterator<Item = &Task> + Clone + '_ {
    tasks.iter().filter(move |task| filter.matches(task))
}

/// Aggregate counts for the whole collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Length of the serialized collection; an estimate for display only
    pub approximate_storage_bytes: usize,
}

pub fn stats(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    let approximate_storage_bytes = serde_json::to_string(tasks)
        .map(|json| json.len())
        .unwrap_or(0);
    TaskStats {
        total,
        completed,
        pending: total - completed,
        approximate_storage_bytes,
    }
}

/// A task as the front end draws it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: TaskId,
    pub text: String,
    pub priority: Priority,
    pub priority_label: String,
    pub completed: bool,
    /// Label of the button that flips completion
    pub toggle_label: &'static str,
    pub created_at: DateTime<Utc>,
}

impl TaskView {
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            text: task.text.clone(),
            priority: task.priority,
            priority_label: task.priority.label(),
            completed: task.completed,
            toggle_label: if task.completed { "Undo" } else { "Complete" },
            created_at: task.created_at,
        }
    }
}

pub fn project(tasks: &[Task], filter: Filter) -> Vec<TaskView> {
    filtered_view(tasks, filter).map(TaskView::from_task).collect()
}

/// Format a byte count the way the stats line shows it
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 3] = ["bytes", "KB", "MB"];
    if bytes < 1024 {
        return format!("{bytes} bytes");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
