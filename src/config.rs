//! Configuration loading and management
//!
//! Handles parsing of `.tasklist.toml` in the store directory.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::task::Priority;
use crate::view::Filter;

/// Name of the configuration file inside the store directory
pub const CONFIG_FILE: &str = ".tasklist.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Task defaults
    #[serde(default)]
    pub tasks: TasksConfig,

    /// Confirmation prompts
    #[serde(default)]
    pub prompts: PromptsConfig,
}

/// Task-related configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TasksConfig {
    /// Priority for `add` when none is given
    #[serde(default = "default_priority")]
    pub default_priority: String,

    /// Filter for `list` when none is given
    #[serde(default = "default_filter")]
    pub default_filter: String,
}

fn default_priority() -> String {
    "medium".to_string()
}

fn default_filter() -> String {
    "all".to_string()
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            default_priority: default_priority(),
            default_filter: default_filter(),
        }
    }
}

/// Prompt configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PromptsConfig {
    /// Ask before deleting or clearing tasks
    #[serde(default = "default_true")]
    pub confirm: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            confirm: default_true(),
        }
    }
}

impl TasksConfig {
    pub fn priority(&self) -> crate::error::Result<Priority> {
        self.default_priority.parse().map_err(|_| {
            crate::error::Error::InvalidConfig(format!(
                "tasks.default_priority: invalid priority '{}' (expected low|medium|high)",
                self.default_priority
            ))
        })
    }

    pub fn filter(&self) -> crate::error::Result<Filter> {
        self.default_filter.parse().map_err(|_| {
            crate::error::Error::InvalidConfig(format!(
                "tasks.default_filter: invalid filter '{}' (expected all|pending|completed|high)",
                self.default_filter
            ))
        })
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.priority()?;
        self.filter()?;
        Ok(())
    }
}

impl Config {
    /// Load configuration from a `.tasklist.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a store directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = Self::path_in(dir);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %err,
                    "ignoring invalid configuration"
                );
                Self::default()
            }
        }
    }

    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.tasks.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.tasks.default_priority, "medium");
        assert_eq!(cfg.tasks.default_filter, "all");
        assert!(cfg.prompts.confirm);
        assert_eq!(cfg.tasks.priority().unwrap(), Priority::Medium);
        assert_eq!(cfg.tasks.filter().unwrap(), Filter::All);
    }

    #[test]
    fn load_from_dir_defaults_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from_dir(dir.path());
        assert_eq!(cfg.tasks.default_priority, "medium");
    }

    #[test]
    fn load_from_dir_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[tasks]\ndefault_priority = \"high\"\n",
        )
        .expect("write config");

        let cfg = Config::load_from_dir(dir.path());
        assert_eq!(cfg.tasks.priority().unwrap(), Priority::High);
        assert_eq!(cfg.tasks.default_filter, "all");
    }

    #[test]
    fn load_rejects_unknown_priority() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[tasks]\ndefault_priority = \"urgent\"\n").expect("write config");

        assert!(matches!(
            Config::load(&path),
            Err(crate::error::Error::InvalidConfig(_))
        ));
        // The lenient loader falls back to defaults.
        assert_eq!(
            Config::load_from_dir(dir.path()).tasks.default_priority,
            "medium"
        );
    }
}
