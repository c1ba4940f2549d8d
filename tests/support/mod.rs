#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub struct TestStore {
    dir: TempDir,
}

impl TestStore {
    pub fn init() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_file(&self) -> PathBuf {
        self.dir.path().join("store.json")
    }

    /// Command bound to this store, with logging and prompts neutralized
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tasklist").expect("tasklist binary");
        cmd.env("TASKLIST_STORE", self.dir.path());
        cmd.env_remove("RUST_LOG");
        cmd
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(".tasklist.toml");
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Raw `{key: value}` document as written by the file store
    pub fn read_document(&self) -> Value {
        match fs::read_to_string(self.store_file()) {
            Ok(raw) => serde_json::from_str(&raw).expect("store document json"),
            Err(_) => Value::Object(Default::default()),
        }
    }

    /// Tasks decoded from the reserved key, `None` when the key is absent
    pub fn stored_tasks(&self) -> Option<Vec<Value>> {
        let doc = self.read_document();
        let raw = doc.get("tasks")?.as_str()?.to_string();
        Some(serde_json::from_str(&raw).expect("tasks json"))
    }

    /// Run a command with `--json` and return the `data` payload
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let value: Value = serde_json::from_slice(&output).expect("json output");
        assert_eq!(value["status"], "success");
        value["data"].clone()
    }

    pub fn add(&self, text: &str, priority: &str) -> u64 {
        let data = self.json(&["add", text, "--priority", priority]);
        data["task"]["id"].as_u64().expect("task id")
    }
}
