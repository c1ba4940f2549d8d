//! tasklist - prioritized task list over a key-value store
//!
//! # Core Concepts
//!
//! - **Tasks**: short text items with a priority and a completion flag
//! - **Write-through**: every mutation rewrites the stored collection
//!   before returning
//! - **Filters**: display-only projections (all, pending, completed, high)
//! - **Inspector**: raw access to the other keys in the same store
//!
//! # Module Organization
//!
//! - `kv`: key-value store contract and in-memory store
//! - `storage`: JSON file store with locking and atomic writes
//! - `lock`: file locks and atomic replace
//! - `task`: task model and repository
//! - `view`: filters, display records, stats
//! - `inspector`: generic key browsing
//! - `app`: gesture handling, confirmation, notices
//! - `cli`: command-line interface using clap
//! - `config`: `.tasklist.toml` loading
//! - `output`: human and JSON output
//! - `error`: error types and result alias

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod inspector;
pub mod kv;
pub mod lock;
pub mod output;
pub mod storage;
pub mod task;
pub mod view;

pub use error::{Error, Result};
pub use kv::{KeyValueStore, MemoryStore};
pub use storage::FileStore;
pub use task::{Priority, Task, TaskId, TaskRepository, TASKS_KEY};
pub use view::{filtered_view, stats, Filter, TaskStats, TaskView};
