//! tasklist kv command implementations.

use super::Context;
use crate::error::Result;
use crate::inspector::{Inspector, Lookup, Removal};
use crate::output::{emit_success, HumanOutput};

pub fn run_set(ctx: Context, key: &str, value: &str) -> Result<()> {
    let mut inspector = Inspector::new(ctx.store.clone());
    let saved = inspector.save(key, value)?;

    let human = HumanOutput::new(format!("Saved: \"{}\" = \"{}\"", saved.key, saved.value));
    emit_success(ctx.output, "kv set", &saved, Some(&human))
}

pub fn run_get(ctx: Context, key: &str) -> Result<()> {
    let inspector = Inspector::new(ctx.store.clone());
    let lookup = inspector.lookup(key)?;

    let header = match &lookup {
        Lookup::Found { key, value } => format!("Value for \"{key}\": \"{value}\""),
        Lookup::Missing { key } => format!("Key \"{key}\" not found in storage"),
    };
    emit_success(ctx.output, "kv get", &lookup, Some(&HumanOutput::new(header)))
}

pub fn run_rm(ctx: Context, key: &str) -> Result<()> {
    let mut inspector = Inspector::new(ctx.store.clone());
    let removal = inspector.remove(key)?;

    let header = match &removal {
        Removal::Removed { key } => format!("Removed key \"{key}\" from storage"),
        Removal::Missing { key } => format!("Key \"{key}\" not found in storage"),
    };
    emit_success(ctx.output, "kv rm", &removal, Some(&HumanOutput::new(header)))
}

pub fn run_ls(ctx: Context) -> Result<()> {
    let inspector = Inspector::new(ctx.store.clone());
    let summary = inspector.summary()?;

    let mut human = HumanOutput::new("Current storage content:");
    human.push_detail(format!(
        "\"{}\": {} task(s) stored",
        crate::task::TASKS_KEY,
        summary.task_count
    ));
    for entry in &summary.entries {
        human.push_detail(format!("\"{}\": \"{}\"", entry.key, entry.value));
    }
    human.push_summary("Store", ctx.store.store_file().display().to_string());

    emit_success(ctx.output, "kv ls", &summary, Some(&human))
}
