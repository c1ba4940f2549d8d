//! tasklist task command implementations.

use serde::Serialize;

use super::Context;
use crate::app::{ActionOutcome, Confirm, NoticeKind, TaskApp};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::storage::FileStore;
use crate::task::{Priority, TaskId, TaskRepository};
use crate::view::{self, Filter, TaskStats, TaskView};

pub struct AddOptions {
    pub text: String,
    pub priority: Option<String>,
}

#[derive(Serialize)]
struct ListOutput {
    filter: Filter,
    tasks: Vec<TaskView>,
    stats: TaskStats,
}

pub fn run_add(ctx: Context, options: AddOptions) -> Result<()> {
    let priority = match options.priority.as_deref() {
        Some(value) => value.parse::<Priority>()?,
        None => ctx.config.tasks.priority()?,
    };

    let mut app = open_app(&ctx);
    let outcome = app.add_task(&options.text, priority)?;
    emit_outcome(&ctx, "add", &outcome)
}

pub fn run_list(ctx: Context, filter: Option<String>) -> Result<()> {
    let filter = match filter.as_deref() {
        Some(value) => value.parse::<Filter>()?,
        None => ctx.config.tasks.filter()?,
    };

    let mut app = open_app(&ctx);
    app.set_filter(filter);
    let output = ListOutput {
        filter,
        tasks: app.view(),
        stats: app.stats(),
    };

    let mut human = HumanOutput::new(format!("Tasks ({filter})"));
    human.push_summary("Total", output.stats.total.to_string());
    human.push_summary("Completed", output.stats.completed.to_string());
    human.push_summary("Pending", output.stats.pending.to_string());
    if output.stats.total == 0 {
        human.push_detail("No tasks yet. Add one to get started.");
        human.push_next_step("tasklist add \"...\" --priority high");
    } else if output.tasks.is_empty() {
        human.push_detail(format!("No {filter} tasks."));
    }
    for task in &output.tasks {
        human.push_detail(format_task_line(task));
    }
    if let Some(warning) = app.repository().load_warning() {
        human.push_warning(warning);
    }

    emit_success(ctx.output, "list", &output, Some(&human))
}

pub fn run_toggle(ctx: Context, id: TaskId) -> Result<()> {
    let mut app = open_app(&ctx);
    let outcome = app.toggle(id)?;
    emit_outcome(&ctx, "toggle", &outcome)
}

pub fn run_set_completed(ctx: Context, id: TaskId, completed: bool) -> Result<()> {
    let command = if completed { "done" } else { "reopen" };
    let mut app = open_app(&ctx);
    let outcome = app.set_completed(id, completed)?;
    emit_outcome(&ctx, command, &outcome)
}

pub fn run_rm(ctx: Context, id: TaskId) -> Result<()> {
    let mut app = open_app(&ctx);
    let outcome = app.delete(id)?;
    emit_outcome(&ctx, "rm", &outcome)
}

pub fn run_clear_completed(ctx: Context) -> Result<()> {
    let mut app = open_app(&ctx);
    let outcome = app.clear_completed()?;
    emit_outcome(&ctx, "clear-completed", &outcome)
}

pub fn run_clear_all(ctx: Context) -> Result<()> {
    let mut app = open_app(&ctx);
    let outcome = app.clear_all()?;
    emit_outcome(&ctx, "clear-all", &outcome)
}

pub fn run_stats(ctx: Context) -> Result<()> {
    let repo = TaskRepository::load(ctx.store.clone());
    let stats = view::stats(repo.list_all());

    let mut human = HumanOutput::new("Task stats");
    human.push_summary("Total", stats.total.to_string());
    human.push_summary("Completed", stats.completed.to_string());
    human.push_summary("Pending", stats.pending.to_string());
    human.push_summary("Storage", view::format_bytes(stats.approximate_storage_bytes));
    if let Some(warning) = repo.load_warning() {
        human.push_warning(warning);
    }

    emit_success(ctx.output, "stats", &stats, Some(&human))
}

fn open_app(ctx: &Context) -> TaskApp<FileStore, Box<dyn Confirm>> {
    let repo = TaskRepository::load(ctx.store.clone());
    TaskApp::new(repo, ctx.confirmer())
}

fn emit_outcome(ctx: &Context, command: &str, outcome: &ActionOutcome) -> Result<()> {
    let mut human = HumanOutput::new(outcome.notice.text.clone());
    if let Some(task) = &outcome.task {
        let view = TaskView::from_task(task);
        human.push_summary("ID", view.id.to_string());
        human.push_summary("Task", view.text);
        human.push_summary("Priority", view.priority_label);
        human.push_summary("Status", if view.completed { "completed" } else { "pending" });
    }
    if outcome.notice.kind == NoticeKind::Info && !outcome.changed {
        human.push_detail("No changes were made.");
    }

    emit_success(ctx.output, command, outcome, Some(&human))
}

fn format_task_line(task: &TaskView) -> String {
    let mark = if task.completed { "x" } else { " " };
    format!(
        "[{mark}] {id}  {priority:<6}  {text}",
        id = task.id,
        priority = task.priority_label,
        text = task.text
    )
}
