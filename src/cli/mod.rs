//! Command-line interface for tasklist
//!
//! This module defines the CLI structure using clap derive macros.
//! Task commands live in `task`, inspector commands in `kv`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::app::{AssumeYes, Confirm, TerminalConfirm};
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputOptions;
use crate::storage::{self, FileStore};
use crate::task::TaskId;

mod kv;
mod task;

/// tasklist - prioritized tasks persisted to a key-value store
#[derive(Parser, Debug)]
#[command(name = "tasklist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Store directory (defaults to the platform data directory)
    #[arg(long, global = true, env = "TASKLIST_STORE")]
    pub store: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Answer yes to confirmation prompts
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task
    Add {
        /// Task description
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Priority: low, medium, high
        #[arg(short, long)]
        priority: Option<String>,
    },

    /// List tasks
    List {
        /// Filter: all, pending, completed, high
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Flip a task between pending and complete
    Toggle {
        /// Task ID
        id: TaskId,
    },

    /// Mark a task complete
    Done {
        /// Task ID
        id: TaskId,
    },

    /// Mark a task pending again
    Reopen {
        /// Task ID
        id: TaskId,
    },

    /// Delete a task
    Rm {
        /// Task ID
        id: TaskId,
    },

    /// Delete every completed task
    ClearCompleted,

    /// Delete all tasks and remove them from storage
    ClearAll,

    /// Show task counts and storage usage
    Stats,

    /// Inspect raw key-value storage
    #[command(subcommand)]
    Kv(KvCommands),
}

/// Key-value inspector subcommands
#[derive(Subcommand, Debug)]
pub enum KvCommands {
    /// Save a value under a key
    Set {
        /// Key
        key: String,

        /// Value
        #[arg(default_value = "")]
        value: String,
    },

    /// Show the value stored under a key
    Get {
        /// Key
        key: String,
    },

    /// Remove a key
    Rm {
        /// Key
        key: String,
    },

    /// Summarize storage contents
    Ls,
}

/// Store, configuration, and output settings shared by every command
pub(crate) struct Context {
    pub store: FileStore,
    pub config: Config,
    pub output: OutputOptions,
    pub assume_yes: bool,
}

impl Context {
    fn load(cli: &Cli) -> Result<Self> {
        let dir = storage::resolve_store_dir(cli.store.as_deref());
        let store = FileStore::open(&dir)?;
        let config = Config::load_from_dir(&dir);
        tracing::debug!(dir = %dir.display(), "store opened");
        Ok(Self {
            store,
            config,
            output: OutputOptions {
                json: cli.json,
                quiet: cli.quiet,
            },
            assume_yes: cli.yes,
        })
    }

    /// Confirmation source for destructive commands
    pub fn confirmer(&self) -> Box<dyn Confirm> {
        if self.assume_yes || !self.config.prompts.confirm {
            Box::new(AssumeYes)
        } else {
            Box::new(TerminalConfirm::terminal())
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let ctx = Context::load(&self)?;
        match self.command {
            Commands::Add { text, priority } => task::run_add(
                ctx,
                task::AddOptions {
                    text: text.join(" "),
                    priority,
                },
            ),
            Commands::List { filter } => task::run_list(ctx, filter),
            Commands::Toggle { id } => task::run_toggle(ctx, id),
            Commands::Done { id } => task::run_set_completed(ctx, id, true),
            Commands::Reopen { id } => task::run_set_completed(ctx, id, false),
            Commands::Rm { id } => task::run_rm(ctx, id),
            Commands::ClearCompleted => task::run_clear_completed(ctx),
            Commands::ClearAll => task::run_clear_all(ctx),
            Commands::Stats => task::run_stats(ctx),
            Commands::Kv(cmd) => match cmd {
                KvCommands::Set { key, value } => kv::run_set(ctx, &key, &value),
                KvCommands::Get { key } => kv::run_get(ctx, &key),
                KvCommands::Rm { key } => kv::run_rm(ctx, &key),
                KvCommands::Ls => kv::run_ls(ctx),
            },
        }
    }
}
