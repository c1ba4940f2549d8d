//! Task model and the write-through task repository.
//!
//! The whole collection is stored as one JSON array under the reserved
//! [`TASKS_KEY`]. Every mutation rewrites that value before returning, so the
//! in-memory list and the persisted one are identical between calls.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::kv::KeyValueStore;

/// Store key owned by the task repository
pub const TASKS_KEY: &str = "tasks";

pub type TaskId = u64;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Display label: the stored name with its first letter capitalized
    pub fn label(self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(Error::InvalidArgument(format!(
                "invalid priority '{other}': must be low, medium, or high"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Owns the task collection and mirrors it into a [`KeyValueStore`]
#[derive(Debug)]
pub struct TaskRepository<S> {
    store: S,
    tasks: Vec<Task>,
    last_id: TaskId,
    /// Why the stored collection could not be used, until a write replaces it
    load_warning: Option<String>,
}

impl<S: KeyValueStore> TaskRepository<S> {
    /// Load the collection from `store`
    ///
    /// A missing key, unreadable store, or malformed value all start an empty
    /// collection. The malformed value stays in the store until the next
    /// write replaces it.
    pub fn load(store: S) -> Self {
        let (tasks, load_warning) = match read_tasks(&store) {
            Ok(tasks) => (tasks, None),
            Err(warning) => {
                tracing::warn!(warning = %warning, "starting with an empty task list");
                (Vec::new(), Some(warning))
            }
        };
        let last_id = tasks.iter().map(|task| task.id).max().unwrap_or(0);
        tracing::debug!(count = tasks.len(), last_id, "tasks loaded");
        Self {
            store,
            tasks,
            last_id,
            load_warning,
        }
    }

    /// Append a new task; `text` is stored trimmed
    pub fn add(&mut self, text: &str, priority: Priority) -> Result<Task> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Validation(
                "Please enter a task description".to_string(),
            ));
        }

        let now = Utc::now();
        let id = self.next_id(now);
        let task = Task {
            id,
            text: text.to_string(),
            priority,
            completed: false,
            created_at: now.trunc_subsecs(3),
        };

        let previous = self.tasks.clone();
        self.tasks.push(task.clone());
        self.commit(previous)?;
        self.last_id = id;

        tracing::debug!(id, priority = %priority, "task added");
        Ok(task)
    }

    /// Flip the completion flag of `id`
    pub fn toggle_complete(&mut self, id: TaskId) -> Result<Task> {
        let previous = self.tasks.clone();
        let task = self.find_mut(id)?;
        task.completed = !task.completed;
        let updated = task.clone();
        self.commit(previous)?;
        Ok(updated)
    }

    /// Set the completion flag of `id`; persists even when unchanged
    pub fn set_completed(&mut self, id: TaskId, completed: bool) -> Result<Task> {
        let previous = self.tasks.clone();
        let task = self.find_mut(id)?;
        task.completed = completed;
        let updated = task.clone();
        self.commit(previous)?;
        Ok(updated)
    }

    /// Remove `id` and return it. Confirmation is the caller's job.
    pub fn delete(&mut self, id: TaskId) -> Result<Task> {
        let index = self.position(id)?;
        let previous = self.tasks.clone();
        let removed = self.tasks.remove(index);
        self.commit(previous)?;
        tracing::debug!(id, "task deleted");
        Ok(removed)
    }

    /// Remove every completed task, returning how many went away
    pub fn clear_completed(&mut self) -> Result<usize> {
        let before = self.tasks.len();
        let previous = self.tasks.clone();
        self.tasks.retain(|task| !task.completed);
        let removed = before - self.tasks.len();
        if removed == 0 {
            return Ok(0);
        }
        self.commit(previous)?;
        Ok(removed)
    }

    /// Empty the collection and delete [`TASKS_KEY`] from the store
    pub fn clear_all(&mut self) -> Result<usize> {
        self.store
            .remove(TASKS_KEY)
            .map_err(|err| storage_error("failed to clear tasks", err))?;
        let removed = self.tasks.len();
        self.tasks.clear();
        self.load_warning = None;
        tracing::debug!(removed, "all tasks cleared");
        Ok(removed)
    }

    /// The full collection in insertion order
    pub fn list_all(&self) -> &[Task] {
        &self.tasks
    }

    /// Set when load fell back to an empty collection
    pub fn load_warning(&self) -> Option<&str> {
        self.load_warning.as_deref()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access for keys other than [`TASKS_KEY`]
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn next_id(&self, now: DateTime<Utc>) -> TaskId {
        let millis = TaskId::try_from(now.timestamp_millis()).unwrap_or(0);
        millis.max(self.last_id.saturating_add(1))
    }

    fn position(&self, id: TaskId) -> Result<usize> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(Error::TaskNotFound(id))
    }

    fn find_mut(&mut self, id: TaskId) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(Error::TaskNotFound(id))
    }

    /// Write the collection through; on failure restore `previous`
    fn commit(&mut self, previous: Vec<Task>) -> Result<()> {
        if let Err(err) = self.persist() {
            self.tasks = previous;
            return Err(err);
        }
        self.load_warning = None;
        Ok(())
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.tasks)?;
        self.store
            .set(TASKS_KEY, &json)
            .map_err(|err| storage_error("failed to persist tasks", err))?;
        tracing::debug!(count = self.tasks.len(), bytes = json.len(), "tasks persisted");
        Ok(())
    }
}

fn read_tasks<S: KeyValueStore>(store: &S) -> std::result::Result<Vec<Task>, String> {
    match store.get(TASKS_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw)
            .map_err(|err| format!("stored tasks are malformed: {err}")),
        Ok(None) => Ok(Vec::new()),
        Err(err) => Err(format!("cannot read stored tasks: {err}")),
    }
}

fn storage_error(context: &str, err: Error) -> Error {
    match err {
        Error::Storage(message) => Error::Storage(format!("{context}: {message}")),
        other => Error::Storage(format!("{context}: {other}")),
    }
}
