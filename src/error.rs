//! Error types for tasklist
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (empty text, bad args, bad config)
//! - 3: Referenced task does not exist
//! - 4: Operation failed (storage, I/O, serialization)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the tasklist CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const NOT_FOUND: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for tasklist operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("{0}")]
    Validation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Missing tasks (exit code 3)
    #[error("Task not found: {0}")]
    TaskNotFound(u64),

    // Operation failures (exit code 4)
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_) | Error::InvalidArgument(_) | Error::InvalidConfig(_) => {
                exit_codes::USER_ERROR
            }

            Error::TaskNotFound(_) => exit_codes::NOT_FOUND,

            Error::Storage(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::LockFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured fields for machine-readable error output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::Validation(message)
            | Error::InvalidArgument(message)
            | Error::InvalidConfig(message) => Some(serde_json::json!({ "message": message })),
            Error::TaskNotFound(id) => Some(serde_json::json!({ "id": id })),
            Error::LockFailed(path) => {
                Some(serde_json::json!({ "path": path.to_string_lossy() }))
            }
            _ => None,
        }
    }

    /// True for failures of the persistence layer rather than the caller
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Error::Storage(_) | Error::Io(_) | Error::Json(_) | Error::LockFailed(_)
        )
    }
}

/// Result type alias for tasklist operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
