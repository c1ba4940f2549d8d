//! Interaction layer between user gestures and the task repository.
//!
//! [`TaskApp`] owns the repository, the active filter, and a [`Confirm`]
//! capability. Destructive gestures ask for confirmation here; the
//! repository itself always acts.

use std::io::{self, BufRead, Write};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::kv::KeyValueStore;
use crate::task::{Priority, Task, TaskId, TaskRepository};
use crate::view::{self, Filter, TaskStats, TaskView};

/// Yes/no question put to the user before destructive actions
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<C: Confirm + ?Sized> Confirm for Box<C> {
    fn confirm(&mut self, message: &str) -> bool {
        (**self).confirm(message)
    }
}

/// Answers yes without asking
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _message: &str) -> bool {
        true
    }
}

/// Asks on `output` and reads one answer line from `input`
///
/// Only `y` or `yes` (any case) count as consent; end of input is a no.
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, message: &str) -> bool {
        if write!(self.output, "{message} [y/N] ").is_err() || self.output.flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        }
    }
}

/// Prompt on stderr, answer from stdin
pub type TerminalConfirm = PromptConfirm<io::StdinLock<'static>, io::Stderr>;

impl TerminalConfirm {
    pub fn terminal() -> Self {
        PromptConfirm::new(io::stdin().lock(), io::stderr())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

/// Short message shown to the user after a gesture
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    /// Notice for a failed gesture; storage and lookup failures get a
    /// generic message, validation problems are shown as-is
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::Validation(message) => Self::error(message.clone()),
            Error::TaskNotFound(_) => Self::error("That task no longer exists."),
            err if err.is_storage() => Self::error("Could not save your changes."),
            other => Self::error(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub changed: bool,
    pub notice: Notice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<usize>,
}

impl ActionOutcome {
    fn changed(notice: Notice) -> Self {
        Self {
            changed: true,
            notice,
            task: None,
            removed: None,
        }
    }

    fn unchanged(notice: Notice) -> Self {
        Self {
            changed: false,
            notice,
            task: None,
            removed: None,
        }
    }

    fn with_task(mut self, task: Task) -> Self {
        self.task = Some(task);
        self
    }

    fn with_removed(mut self, removed: usize) -> Self {
        self.removed = Some(removed);
        self
    }
}

pub struct TaskApp<S, C> {
    repo: TaskRepository<S>,
    filter: Filter,
    confirm: C,
}

impl<S: KeyValueStore, C: Confirm> TaskApp<S, C> {
    pub fn new(repo: TaskRepository<S>, confirm: C) -> Self {
        Self {
            repo,
            filter: Filter::default(),
            confirm,
        }
    }

    pub fn add_task(&mut self, text: &str, priority: Priority) -> Result<ActionOutcome> {
        let task = self.repo.add(text, priority)?;
        Ok(ActionOutcome::changed(Notice::success("Task added successfully!")).with_task(task))
    }

    pub fn toggle(&mut self, id: TaskId) -> Result<ActionOutcome> {
        let task = self.repo.toggle_complete(id)?;
        Ok(ActionOutcome::changed(completion_notice(&task)).with_task(task))
    }

    pub fn set_completed(&mut self, id: TaskId, completed: bool) -> Result<ActionOutcome> {
        let task = self.repo.set_completed(id, completed)?;
        Ok(ActionOutcome::changed(completion_notice(&task)).with_task(task))
    }

    pub fn delete(&mut self, id: TaskId) -> Result<ActionOutcome> {
        if self.repo.get(id).is_none() {
            return Err(Error::TaskNotFound(id));
        }
        if !self
            .confirm
            .confirm("Are you sure you want to delete this task?")
        {
            return Ok(ActionOutcome::unchanged(Notice::info("Task kept.")));
        }
        let task = self.repo.delete(id)?;
        Ok(ActionOutcome::changed(Notice::success("Task deleted.")).with_task(task))
    }

    pub fn clear_completed(&mut self) -> Result<ActionOutcome> {
        let count = view::stats(self.repo.list_all()).completed;
        if count == 0 {
            return Ok(ActionOutcome::unchanged(Notice::info(
                "No completed tasks to clear.",
            ))
            .with_removed(0));
        }
        let question = format!("Are you sure you want to clear {count} completed task(s)?");
        if !self.confirm.confirm(&question) {
            return Ok(ActionOutcome::unchanged(Notice::info("Nothing was cleared.")).with_removed(0));
        }
        let removed = self.repo.clear_completed()?;
        Ok(ActionOutcome::changed(Notice::success(format!(
            "Cleared {removed} completed task(s)."
        )))
        .with_removed(removed))
    }

    pub fn clear_all(&mut self) -> Result<ActionOutcome> {
        if self.repo.is_empty() {
            return Ok(ActionOutcome::unchanged(Notice::info("No tasks to clear.")).with_removed(0));
        }
        if !self.confirm.confirm(
            "Are you sure you want to delete ALL tasks and clear storage? This action cannot be undone.",
        ) {
            return Ok(ActionOutcome::unchanged(Notice::info("Nothing was cleared.")).with_removed(0));
        }
        let removed = self.repo.clear_all()?;
        Ok(ActionOutcome::changed(Notice::success(
            "All tasks cleared and storage emptied.",
        ))
        .with_removed(removed))
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Display records for the active filter
    pub fn view(&self) -> Vec<TaskView> {
        view::project(self.repo.list_all(), self.filter)
    }

    pub fn stats(&self) -> TaskStats {
        view::stats(self.repo.list_all())
    }

    pub fn repository(&self) -> &TaskRepository<S> {
        &self.repo
    }
}

fn completion_notice(task: &Task) -> Notice {
    if task.completed {
        Notice::success("Task marked complete.")
    } else {
        Notice::success("Task marked pending.")
    }
}
